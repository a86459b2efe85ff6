//! Graph traversals.
//!
//! [`dfs`] is lazy and yields nodes in pre-order. [`postorder`] and
//! [`reverse_postorder`] need the whole reachable region before the first node can
//! be placed, so they return vectors.
//!
//! Every traversal starts from a single root and only visits what that root
//! reaches. Statements that follow a `return` in the same block are therefore
//! never produced by any function here.

use crate::utils::{
    bitset::BitSet,
    graph::{NodeId, Successors},
};

/// Lazy pre-order depth-first walk. Created by [`dfs`].
pub struct Dfs<'g, G: Successors> {
    graph: &'g G,
    stack: Vec<NodeId>,
    seen: BitSet,
}

impl<G: Successors> Iterator for Dfs<'_, G> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;

        // Reversed so the first successor is popped first.
        let successors: Vec<NodeId> = self.graph.successors(node).collect();
        for succ in successors.into_iter().rev() {
            if succ.index() < self.seen.len() && !self.seen.contains(succ.index()) {
                self.seen.insert(succ.index());
                self.stack.push(succ);
            }
        }

        Some(node)
    }
}

/// Walks every node reachable from `root` in depth-first pre-order.
///
/// A root outside the graph produces an empty walk.
///
/// # Examples
///
/// ```rust
/// use defscope::utils::graph::{algorithms::dfs, DirectedGraph};
///
/// let mut graph: DirectedGraph<(), ()> = DirectedGraph::new();
/// let a = graph.add_node(());
/// let b = graph.add_node(());
/// let c = graph.add_node(());
/// graph.add_edge(a, b, ())?;
/// graph.add_edge(a, c, ())?;
///
/// assert_eq!(dfs(&graph, a).collect::<Vec<_>>(), vec![a, b, c]);
/// assert_eq!(dfs(&graph, c).count(), 1);
/// # Ok::<(), defscope::Error>(())
/// ```
pub fn dfs<G: Successors>(graph: &G, root: NodeId) -> Dfs<'_, G> {
    let count = graph.node_count();
    let mut seen = BitSet::new(count);
    let mut stack = Vec::new();
    if root.index() < count {
        seen.insert(root.index());
        stack.push(root);
    }

    Dfs { graph, stack, seen }
}

/// Returns the set of node indices reachable from `root`, `root` included.
#[must_use]
pub fn reachable<G: Successors>(graph: &G, root: NodeId) -> BitSet {
    let mut walk = dfs(graph, root);
    while walk.next().is_some() {}
    walk.seen
}

/// Returns the nodes reachable from `root` in depth-first postorder.
///
/// Every node appears after all of the nodes it reaches through tree edges,
/// so on an acyclic region a node always follows its successors.
#[must_use]
pub fn postorder<G: Successors>(graph: &G, root: NodeId) -> Vec<NodeId> {
    enum Step {
        Visit(NodeId),
        Finish(NodeId),
    }

    let count = graph.node_count();
    if root.index() >= count {
        return Vec::new();
    }

    let mut seen = BitSet::new(count);
    let mut order = Vec::with_capacity(count);
    let mut stack = vec![Step::Visit(root)];

    while let Some(step) = stack.pop() {
        match step {
            Step::Visit(node) => {
                if seen.contains(node.index()) {
                    continue;
                }
                seen.insert(node.index());
                stack.push(Step::Finish(node));

                let successors: Vec<NodeId> = graph.successors(node).collect();
                for succ in successors.into_iter().rev() {
                    if succ.index() < count && !seen.contains(succ.index()) {
                        stack.push(Step::Visit(succ));
                    }
                }
            }
            Step::Finish(node) => order.push(node),
        }
    }

    order
}

/// Returns the nodes reachable from `root` in reverse postorder.
///
/// This is the natural visiting order for forward dataflow problems: outside of
/// back edges, every node is placed before its successors.
#[must_use]
pub fn reverse_postorder<G: Successors>(graph: &G, root: NodeId) -> Vec<NodeId> {
    let mut order = postorder(graph, root);
    order.reverse();
    order
}
