//! Trait seams between graph storage and graph algorithms.
//!
//! Algorithms in [`crate::utils::graph::algorithms`] are written against these
//! traits rather than a concrete graph type, so the same traversal code runs over
//! the raw [`DirectedGraph`](crate::utils::graph::DirectedGraph) and over the
//! [`ControlFlowGraph`](crate::analysis::ControlFlowGraph) that wraps it.

use crate::utils::graph::NodeId;

/// Node count and node enumeration.
pub trait GraphBase {
    /// Returns the number of nodes in the graph.
    fn node_count(&self) -> usize;

    /// Returns an iterator over every node handle, in allocation order.
    fn node_ids(&self) -> impl Iterator<Item = NodeId>;
}

/// Forward adjacency.
pub trait Successors: GraphBase {
    /// Returns the direct successors of `node`.
    ///
    /// Implementations yield nothing for a handle that is not in the graph.
    fn successors(&self, node: NodeId) -> impl Iterator<Item = NodeId>;
}

/// Backward adjacency.
pub trait Predecessors: GraphBase {
    /// Returns the direct predecessors of `node`.
    ///
    /// Implementations yield nothing for a handle that is not in the graph.
    fn predecessors(&self, node: NodeId) -> impl Iterator<Item = NodeId>;
}

/// A graph with a designated entry node.
pub trait RootedGraph: Successors + Predecessors {
    /// Returns the entry node.
    fn entry(&self) -> NodeId;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EdgeList {
        nodes: usize,
        edges: Vec<(usize, usize)>,
    }

    impl GraphBase for EdgeList {
        fn node_count(&self) -> usize {
            self.nodes
        }

        fn node_ids(&self) -> impl Iterator<Item = NodeId> {
            (0..self.nodes).map(NodeId::new)
        }
    }

    impl Successors for EdgeList {
        fn successors(&self, node: NodeId) -> impl Iterator<Item = NodeId> {
            self.edges
                .iter()
                .filter(move |(src, _)| *src == node.index())
                .map(|(_, dst)| NodeId::new(*dst))
        }
    }

    impl Predecessors for EdgeList {
        fn predecessors(&self, node: NodeId) -> impl Iterator<Item = NodeId> {
            self.edges
                .iter()
                .filter(move |(_, dst)| *dst == node.index())
                .map(|(src, _)| NodeId::new(*src))
        }
    }

    impl RootedGraph for EdgeList {
        fn entry(&self) -> NodeId {
            NodeId::new(0)
        }
    }

    #[test]
    fn test_trait_adjacency() {
        let graph = EdgeList {
            nodes: 3,
            edges: vec![(0, 1), (0, 2), (1, 2)],
        };

        assert_eq!(graph.node_ids().count(), 3);
        assert_eq!(graph.successors(NodeId::new(0)).count(), 2);
        assert_eq!(graph.predecessors(NodeId::new(2)).count(), 2);
        assert_eq!(graph.successors(NodeId::new(9)).count(), 0);
        assert_eq!(graph.entry(), NodeId::new(0));
    }
}
