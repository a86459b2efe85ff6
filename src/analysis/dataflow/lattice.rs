//! Join semi-lattices for forward "may" analyses.
//!
//! Values only ever grow during a solve: information arriving along a new path
//! is joined into what was already known, never replaces it. Termination follows
//! from the lattice having finite height.

use std::fmt::Debug;

use crate::utils::BitSet;

/// A join semi-lattice with an in-place join that reports growth.
///
/// `join_in_place` must be monotone (the receiver never loses information) and
/// idempotent (joining the same value twice reports no change the second time).
/// The solver relies on the returned flag to decide whether a node needs to be
/// revisited.
pub trait JoinSemiLattice: Clone + Debug + PartialEq {
    /// `self = self ⊔ other`. Returns `true` if `self` changed.
    fn join_in_place(&mut self, other: &Self) -> bool;
}

/// Sets ordered by inclusion, joined by union.
impl JoinSemiLattice for BitSet {
    fn join_in_place(&mut self, other: &Self) -> bool {
        self.union_with(other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bitset_join_is_union() {
        let mut a = BitSet::from_indices(8, [0, 1]);
        let b = BitSet::from_indices(8, [1, 5]);
        assert!(a.join_in_place(&b));

        assert_eq!(a.iter().collect::<Vec<_>>(), vec![0, 1, 5]);
        assert_eq!(b.count(), 2);
    }

    #[test]
    fn test_bitset_join_idempotent() {
        let mut a = BitSet::from_indices(8, [2]);
        let b = BitSet::from_indices(8, [3]);
        assert!(a.join_in_place(&b));
        assert!(!a.join_in_place(&b));
        assert!(!a.join_in_place(&a.clone()));
    }
}
