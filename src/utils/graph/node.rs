//! Node handles for arena-indexed graphs.
//!
//! Every statement that takes part in a control-flow graph is identified by a
//! [`NodeId`], a dense index assigned when the graph is built. Per-node analysis
//! state (GEN sets, ENTRY/EXIT sets, worklist flags) is stored in plain vectors
//! indexed by the handle, so no analysis ever relies on the equality semantics of
//! the tree it was built from.

use std::fmt;

/// A strongly-typed handle to a node in a [`DirectedGraph`](crate::utils::graph::DirectedGraph).
///
/// Handles are assigned sequentially from 0 in the order nodes are added. Two
/// handles are equal exactly when they name the same node, which is what gives a
/// statement its identity: two syntactically identical statements at different
/// source positions receive different handles.
///
/// # Examples
///
/// ```rust
/// use defscope::utils::graph::NodeId;
///
/// let node = NodeId::new(3);
/// assert_eq!(node.index(), 3);
/// assert_eq!(format!("{node}"), "n3");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Creates a handle from a raw index.
    ///
    /// Handles are normally obtained from [`DirectedGraph::add_node`](crate::utils::graph::DirectedGraph::add_node);
    /// constructing one by hand is useful in tests and when iterating `0..node_count`.
    #[must_use]
    #[inline]
    pub const fn new(index: usize) -> Self {
        NodeId(index)
    }

    /// Returns the raw index, suitable for indexing per-node vectors.
    #[must_use]
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

impl From<usize> for NodeId {
    #[inline]
    fn from(index: usize) -> Self {
        NodeId(index)
    }
}

impl From<NodeId> for usize {
    #[inline]
    fn from(node: NodeId) -> Self {
        node.0
    }
}
