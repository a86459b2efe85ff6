//! The statement-level control-flow graph.

use std::{collections::HashMap, fmt::Write, sync::Arc};

use crate::{
    analysis::cfg::{CfgEdgeKind, CfgNode, Scopes, StatementKind, Variable, VariableId},
    ast::Stmt,
    utils::{
        escape_dot,
        graph::{
            algorithms, DirectedGraph, GraphBase, NodeId, Predecessors, RootedGraph, Successors,
        },
        BitSet,
    },
};

/// Control-flow graph of one procedure.
///
/// Every non-block statement of the body is a node, allocated in source
/// pre-order, so the first statement of a non-empty body is node 0 and is the
/// [`start`](Self::start) node. A synthetic [`end`](Self::end) node is always
/// allocated last. For an empty body the two coincide and the graph has no edges.
///
/// The graph borrows the procedure it was built from and is immutable once built.
///
/// # Examples
///
/// ```rust
/// use defscope::{analysis::ControlFlowBuilder, ast::{Expr, Procedure, Stmt}};
///
/// let proc = Procedure::new("f", ["a"], Stmt::block([
///     Stmt::decl("x", Expr::name("a")),
///     Stmt::ret_value(Expr::name("x")),
/// ]));
/// let cfg = ControlFlowBuilder::new().build(&proc)?;
///
/// assert_eq!(cfg.node_count(), 3);
/// let first = cfg.start();
/// let ret = cfg.successors(first).next().unwrap();
/// assert!(cfg.has_edge(ret, cfg.end()));
/// # Ok::<(), defscope::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct ControlFlowGraph<'a> {
    name: String,
    parameters: Vec<String>,
    graph: DirectedGraph<CfgNode<'a>, CfgEdgeKind>,
    variables: Vec<Variable>,
    scopes: Arc<Scopes>,
    start: NodeId,
    end: NodeId,
    /// Tree boundary only; nodes are identified by their handles.
    by_address: HashMap<usize, NodeId>,
    reachable: BitSet,
}

impl<'a> ControlFlowGraph<'a> {
    pub(crate) fn from_parts(
        name: String,
        parameters: Vec<String>,
        graph: DirectedGraph<CfgNode<'a>, CfgEdgeKind>,
        variables: Vec<Variable>,
        scopes: Scopes,
        start: NodeId,
        end: NodeId,
    ) -> Self {
        let by_address = graph
            .nodes()
            .filter_map(|(id, node)| node.stmt.map(|stmt| (address(stmt), id)))
            .collect();
        let reachable = algorithms::reachable(&graph, start);

        ControlFlowGraph {
            name,
            parameters,
            graph,
            variables,
            scopes: Arc::new(scopes),
            start,
            end,
            by_address,
            reachable,
        }
    }

    /// Name of the procedure this graph was built from.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Formal parameter names, in declaration order.
    #[must_use]
    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }

    /// The node where execution begins.
    #[must_use]
    pub const fn start(&self) -> NodeId {
        self.start
    }

    /// The synthetic exit node.
    #[must_use]
    pub const fn end(&self) -> NodeId {
        self.end
    }

    /// Number of nodes, the end node included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// All node handles, in allocation order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.graph.node_ids()
    }

    /// Metadata of `node`.
    #[must_use]
    pub fn node(&self, node: NodeId) -> Option<&CfgNode<'a>> {
        self.graph.node(node)
    }

    /// Looks up the node of a tree statement.
    ///
    /// The match is by address, so `stmt` must be a reference into the procedure
    /// this graph was built from. Blocks and foreign statements yield `None`.
    /// This is only a way into the graph: everything inside it, the analyses
    /// included, identifies statements by [`NodeId`].
    #[must_use]
    pub fn node_for(&self, stmt: &Stmt) -> Option<NodeId> {
        self.by_address.get(&address(stmt)).copied()
    }

    /// Nodes of the given kind, in source order.
    pub fn statements_of_kind(&self, kind: StatementKind) -> impl Iterator<Item = NodeId> + '_ {
        self.graph
            .nodes()
            .filter(move |(_, node)| node.kind == kind)
            .map(|(id, _)| id)
    }

    /// Direct successors of `node`. Empty for unknown handles.
    pub fn successors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.graph.successors(node)
    }

    /// Direct predecessors of `node`. Empty for unknown handles.
    pub fn predecessors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.graph.predecessors(node)
    }

    /// Outgoing edges of `node` with their kinds.
    pub fn outgoing_edges(
        &self,
        node: NodeId,
    ) -> impl Iterator<Item = (NodeId, CfgEdgeKind)> + '_ {
        self.graph
            .outgoing_edges(node)
            .map(|(target, &kind)| (target, kind))
    }

    /// Returns `true` if control can move directly from `from` to `to`.
    #[must_use]
    pub fn has_edge(&self, from: NodeId, to: NodeId) -> bool {
        self.graph.contains_edge(from, to)
    }

    /// Kind of the edge `from -> to`, if there is one.
    #[must_use]
    pub fn edge_kind(&self, from: NodeId, to: NodeId) -> Option<CfgEdgeKind> {
        self.outgoing_edges(from)
            .find(|&(target, _)| target == to)
            .map(|(_, kind)| kind)
    }

    /// Every resolved variable of the procedure. Parameters come first, in
    /// parameter order.
    #[must_use]
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// A single resolved variable.
    #[must_use]
    pub fn variable(&self, id: VariableId) -> Option<&Variable> {
        self.variables.get(id.index())
    }

    /// The variable a read of `name` at `node` refers to.
    ///
    /// This is the innermost declaration of `name` visible where `node` appears
    /// in the tree, falling back to the procedure-wide free variable. A
    /// declaration does not see its own binding, so in `var x = x;` the read
    /// resolves to the outer `x`. Returns `None` for unknown nodes and for names
    /// the procedure never binds.
    ///
    /// ```rust
    /// use defscope::{analysis::ControlFlowBuilder, ast::{Expr, Procedure, Stmt}, utils::graph::NodeId};
    ///
    /// let proc = Procedure::nullary("f", Stmt::block([
    ///     Stmt::decl("x", 1),
    ///     Stmt::block([Stmt::decl("x", 2), Stmt::ret_value(Expr::name("x"))]),
    /// ]));
    /// let cfg = ControlFlowBuilder::new().build(&proc)?;
    ///
    /// let inner = cfg.node(NodeId::new(1)).and_then(|n| n.variable());
    /// assert_eq!(cfg.resolve(NodeId::new(2), "x"), inner);
    /// # Ok::<(), defscope::Error>(())
    /// ```
    #[must_use]
    pub fn resolve(&self, node: NodeId, name: &str) -> Option<VariableId> {
        self.scopes.resolve(node, name)
    }

    pub(crate) fn scopes(&self) -> &Arc<Scopes> {
        &self.scopes
    }

    /// Returns `true` if `node` can be reached from [`start`](Self::start).
    ///
    /// Statements following a `return` in the same block are not.
    #[must_use]
    pub fn is_reachable(&self, node: NodeId) -> bool {
        self.reachable.contains(node.index())
    }

    /// Reachable nodes in reverse postorder from the start node.
    #[must_use]
    pub fn reverse_postorder(&self) -> Vec<NodeId> {
        algorithms::reverse_postorder(&self.graph, self.start)
    }

    /// Reachable nodes in postorder from the start node.
    #[must_use]
    pub fn postorder(&self) -> Vec<NodeId> {
        algorithms::postorder(&self.graph, self.start)
    }

    /// Renders the graph in Graphviz DOT format.
    ///
    /// Each node is labelled with its handle and statement text. Edges other than
    /// plain fall-through carry their kind, and unreachable nodes are dashed.
    /// Branch outcomes are coloured, and loop back edges do not constrain the
    /// layout so loop bodies stay below their header.
    #[must_use]
    pub fn to_dot(&self, title: Option<&str>) -> String {
        let mut dot = String::new();

        dot.push_str("digraph CFG {\n");
        let title = title.unwrap_or(self.name.as_str());
        let _ = writeln!(dot, "    label=\"{}\";", escape_dot(title));
        dot.push_str("    labelloc=t;\n");
        dot.push_str("    node [shape=box, fontname=\"Courier\", fontsize=10];\n\n");

        for (id, node) in self.graph.nodes() {
            let text = match node.stmt {
                Some(stmt) => stmt.to_string(),
                None => "end".to_string(),
            };
            let mut attrs = format!("label=\"{id}: {}\"", escape_dot(&text));
            if id == self.start {
                attrs.push_str(", penwidth=2");
            }
            if id == self.end {
                attrs.push_str(", shape=doublecircle");
            }
            if !self.is_reachable(id) {
                attrs.push_str(", style=dashed");
            }
            let _ = writeln!(dot, "    {id} [{attrs}];");
        }
        dot.push('\n');

        for source in self.graph.node_ids() {
            for (target, kind) in self.outgoing_edges(source) {
                if kind == CfgEdgeKind::Sequential {
                    let _ = writeln!(dot, "    {source} -> {target};");
                    continue;
                }
                let mut attrs = format!("label=\"{kind}\"");
                if kind.is_conditional() {
                    let color = if kind == CfgEdgeKind::BranchTrue {
                        "darkgreen"
                    } else {
                        "red"
                    };
                    let _ = write!(attrs, ", color={color}");
                }
                if kind.is_back_edge() {
                    attrs.push_str(", color=blue, constraint=false");
                }
                let _ = writeln!(dot, "    {source} -> {target} [{attrs}];");
            }
        }

        dot.push_str("}\n");
        dot
    }
}

fn address(stmt: &Stmt) -> usize {
    stmt as *const Stmt as usize
}

impl GraphBase for ControlFlowGraph<'_> {
    fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        self.graph.node_ids()
    }
}

impl Successors for ControlFlowGraph<'_> {
    fn successors(&self, node: NodeId) -> impl Iterator<Item = NodeId> {
        self.graph.successors(node)
    }
}

impl Predecessors for ControlFlowGraph<'_> {
    fn predecessors(&self, node: NodeId) -> impl Iterator<Item = NodeId> {
        self.graph.predecessors(node)
    }
}

impl RootedGraph for ControlFlowGraph<'_> {
    fn entry(&self) -> NodeId {
        self.start
    }
}
