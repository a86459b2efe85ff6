//! Fixed-width bit vectors for dataflow sets.
//!
//! A [`BitSet`] holds a subset of `0..len` packed 64 indices per word. Every
//! reaching set in a procedure shares the same `len` (the size of that procedure's
//! definition universe), so the set operations are plain word-wise loops.
//!
//! The in-place operations report whether they changed the receiver. The solver
//! uses that flag from [`BitSet::union_with`] as its convergence test.
//!
//! ```rust
//! use defscope::utils::BitSet;
//!
//! let mut entry = BitSet::new(70);
//! entry.insert(3);
//!
//! let mut incoming = BitSet::new(70);
//! incoming.insert(3);
//! incoming.insert(68);
//!
//! assert!(entry.union_with(&incoming));
//! assert!(!entry.union_with(&incoming));
//! assert_eq!(entry.iter().collect::<Vec<_>>(), vec![3, 68]);
//! ```

use std::fmt;

const WORD_BITS: usize = 64;

/// A set of small integers in `0..len`.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct BitSet {
    words: Vec<u64>,
    len: usize,
}

impl BitSet {
    /// Creates an empty set over the domain `0..len`.
    #[must_use]
    pub fn new(len: usize) -> Self {
        BitSet {
            words: vec![0; len.div_ceil(WORD_BITS)],
            len,
        }
    }

    /// Creates a set over `0..len` holding the given indices.
    ///
    /// # Panics
    ///
    /// Panics if any index is `>= len`.
    #[must_use]
    pub fn from_indices(len: usize, indices: impl IntoIterator<Item = usize>) -> Self {
        let mut set = BitSet::new(len);
        for index in indices {
            set.insert(index);
        }
        set
    }

    /// Returns the size of the domain, not the number of members.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no index is a member.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&word| word == 0)
    }

    /// Returns the number of members.
    #[must_use]
    pub fn count(&self) -> usize {
        self.words.iter().map(|word| word.count_ones() as usize).sum()
    }

    /// Adds `index` and returns `true` if it was not already present.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    pub fn insert(&mut self, index: usize) -> bool {
        assert!(index < self.len, "bit {index} outside domain of {}", self.len);
        let (word, mask) = Self::locate(index);
        let was_set = self.words[word] & mask != 0;
        self.words[word] |= mask;
        !was_set
    }

    /// Removes `index` and returns `true` if it was present.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    pub fn remove(&mut self, index: usize) -> bool {
        assert!(index < self.len, "bit {index} outside domain of {}", self.len);
        let (word, mask) = Self::locate(index);
        let was_set = self.words[word] & mask != 0;
        self.words[word] &= !mask;
        was_set
    }

    /// Returns `true` if `index` is a member. Indices outside the domain never are.
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        if index >= self.len {
            return false;
        }
        let (word, mask) = Self::locate(index);
        self.words[word] & mask != 0
    }

    /// `self |= other`. Returns `true` if `self` gained a member.
    ///
    /// # Panics
    ///
    /// Panics if the two domains differ.
    pub fn union_with(&mut self, other: &Self) -> bool {
        self.combine(other, |a, b| a | b)
    }

    /// `self -= other`. Returns `true` if `self` lost a member.
    ///
    /// # Panics
    ///
    /// Panics if the two domains differ.
    pub fn difference_with(&mut self, other: &Self) -> bool {
        self.combine(other, |a, b| a & !b)
    }

    /// Iterates over the members in increasing order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            words: &self.words,
            index: 0,
            current: self.words.first().copied().unwrap_or(0),
        }
    }

    fn combine(&mut self, other: &Self, op: impl Fn(u64, u64) -> u64) -> bool {
        assert_eq!(self.len, other.len, "bit set domains differ");
        let mut changed = false;
        for (a, &b) in self.words.iter_mut().zip(&other.words) {
            let next = op(*a, b);
            changed |= next != *a;
            *a = next;
        }
        changed
    }

    #[inline]
    const fn locate(index: usize) -> (usize, u64) {
        (index / WORD_BITS, 1u64 << (index % WORD_BITS))
    }
}

impl fmt::Debug for BitSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<'a> IntoIterator for &'a BitSet {
    type Item = usize;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the members of a [`BitSet`], created by [`BitSet::iter`].
pub struct Iter<'a> {
    words: &'a [u64],
    index: usize,
    current: u64,
}

impl Iterator for Iter<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        loop {
            if self.current != 0 {
                let bit = self.current.trailing_zeros() as usize;
                // clear lowest set bit
                self.current &= self.current - 1;
                return Some(self.index * WORD_BITS + bit);
            }
            self.index += 1;
            self.current = *self.words.get(self.index)?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_remove_contains() {
        let mut set = BitSet::new(130);
        assert!(set.is_empty());
        assert!(set.insert(0));
        assert!(set.insert(64));
        assert!(set.insert(129));
        assert!(!set.insert(64));

        assert!(set.contains(129));
        assert!(!set.contains(1));
        assert!(!set.contains(500));
        assert_eq!(set.count(), 3);

        assert!(set.remove(64));
        assert!(!set.remove(64));
        assert_eq!(set.count(), 2);
    }

    #[test]
    #[should_panic(expected = "outside domain")]
    fn test_insert_out_of_domain() {
        let mut set = BitSet::new(4);
        set.insert(4);
    }

    #[test]
    fn test_union_reports_growth_only() {
        let mut a = BitSet::from_indices(10, [1, 2]);
        let b = BitSet::from_indices(10, [2]);
        assert!(!a.union_with(&b));

        let c = BitSet::from_indices(10, [7]);
        assert!(a.union_with(&c));
        assert_eq!(a.iter().collect::<Vec<_>>(), vec![1, 2, 7]);
    }

    #[test]
    fn test_difference_reports_loss_only() {
        let mut a = BitSet::from_indices(100, [1, 50, 99]);
        let mask = BitSet::from_indices(100, [50, 60]);
        assert!(a.difference_with(&mask));
        assert!(!a.difference_with(&mask));
        assert_eq!(a.iter().collect::<Vec<_>>(), vec![1, 99]);
    }

    #[test]
    fn test_iter_across_word_boundaries() {
        let set = BitSet::from_indices(200, [63, 64, 127, 128, 199]);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![63, 64, 127, 128, 199]);
        assert_eq!(BitSet::new(0).iter().count(), 0);
    }

    #[test]
    fn test_debug_format() {
        let set = BitSet::from_indices(10, [2, 5]);
        assert_eq!(format!("{set:?}"), "{2, 5}");
    }
}
