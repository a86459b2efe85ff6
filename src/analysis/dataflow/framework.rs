//! The contract between an analysis and the solver.

use crate::{analysis::dataflow::lattice::JoinSemiLattice, utils::graph::NodeId};

/// A forward dataflow problem over a rooted graph.
///
/// The solver owns the per-node states; the analysis only describes them:
/// what holds on entry to the root, what every other node starts with, and how
/// a single node turns its entry state into its exit state.
pub trait DataFlowAnalysis {
    /// The abstract value attached to each node entry and exit.
    type Lattice: JoinSemiLattice;

    /// Entry state of the root node.
    fn boundary(&self) -> Self::Lattice;

    /// Starting entry and exit state of every node. Must be the lattice bottom.
    fn initial(&self) -> Self::Lattice;

    /// Exit state of `node` given its entry state.
    ///
    /// Must be monotone in `entry`.
    fn transfer(&self, node: NodeId, entry: &Self::Lattice) -> Self::Lattice;
}

/// Fixed-point states produced by [`DataFlowSolver`](crate::analysis::DataFlowSolver).
///
/// Indexed by node. Nodes the solver never reached keep the initial value.
#[derive(Debug, Clone)]
pub struct AnalysisResults<L> {
    pub(crate) entry: Vec<L>,
    pub(crate) exit: Vec<L>,
    pub(crate) iterations: usize,
}

impl<L> AnalysisResults<L> {
    /// Entry state of `node`.
    #[must_use]
    pub fn entry(&self, node: NodeId) -> Option<&L> {
        self.entry.get(node.index())
    }

    /// Exit state of `node`.
    #[must_use]
    pub fn exit(&self, node: NodeId) -> Option<&L> {
        self.exit.get(node.index())
    }

    /// Number of transfer evaluations performed before convergence.
    #[must_use]
    pub const fn iterations(&self) -> usize {
        self.iterations
    }

    /// Number of nodes covered.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.entry.len()
    }

    /// Splits into `(entry, exit)` state vectors.
    #[must_use]
    pub fn into_states(self) -> (Vec<L>, Vec<L>) {
        (self.entry, self.exit)
    }
}
