//! Lowering of structured procedure bodies into control-flow graphs.
//!
//! Lowering is a single recursive walk. Each call receives the *pending* edges
//! that must flow into the next node created (source node plus edge kind) and
//! returns the pending edges that leave the lowered statement. A sequence simply
//! threads the pending list through its children, which is why empty blocks and
//! nested blocks need no special handling: they return their input untouched.
//!
//! `return` consumes its incoming edges and leaves nothing pending. Statements
//! after it in the same block are still allocated but start with an empty
//! pending list and so never get a predecessor.

use rayon::prelude::*;
use tracing::debug;

use crate::{
    analysis::cfg::{
        scope::{ScopePoint, Scopes},
        CfgEdgeKind, CfgNode, ControlFlowGraph, StatementKind, Variable, VariableId, VariableKind,
    },
    ast::{CompilationUnit, Procedure, Stmt},
    config::AnalysisConfig,
    utils::graph::{DirectedGraph, NodeId},
    Result,
};

/// Edges waiting for their target: `(source, kind)`.
type Pending = Vec<(NodeId, CfgEdgeKind)>;

/// Builds [`ControlFlowGraph`]s from procedures.
///
/// # Examples
///
/// ```rust
/// use defscope::{analysis::{CfgEdgeKind, ControlFlowBuilder}, ast::{Expr, Procedure, Stmt}};
///
/// let proc = Procedure::nullary("spin", Stmt::block([
///     Stmt::while_loop(Expr::opaque("busy()"), Stmt::block([])),
/// ]));
/// let cfg = ControlFlowBuilder::new().build(&proc)?;
///
/// let header = cfg.start();
/// assert_eq!(cfg.edge_kind(header, header), Some(CfgEdgeKind::LoopBack));
/// assert_eq!(cfg.edge_kind(header, cfg.end()), Some(CfgEdgeKind::BranchFalse));
/// # Ok::<(), defscope::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ControlFlowBuilder {
    config: AnalysisConfig,
}

impl ControlFlowBuilder {
    /// Creates a builder with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder with the given configuration.
    ///
    /// Only [`AnalysisConfig::parallel`] affects CFG construction.
    #[must_use]
    pub fn with_config(config: AnalysisConfig) -> Self {
        ControlFlowBuilder { config }
    }

    /// Builds the graph of one procedure.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Precondition`](crate::Error::Precondition) if a parameter,
    /// declaration or assignment has an empty name, or if two parameters share a
    /// name.
    pub fn build<'a>(&self, procedure: &'a Procedure) -> Result<ControlFlowGraph<'a>> {
        let mut lowering = Lowering::new(procedure.parameters())?;

        let pending = lowering.lower_scoped(procedure.body(), Vec::new())?;

        let end = lowering.add_end();
        lowering.connect(&pending, end)?;
        let returns: Pending = lowering
            .returns
            .iter()
            .map(|&node| (node, CfgEdgeKind::Return))
            .collect();
        lowering.connect(&returns, end)?;

        let start = if end.index() == 0 {
            end
        } else {
            NodeId::new(0)
        };

        debug!(
            procedure = procedure.name(),
            nodes = lowering.graph.node_count(),
            edges = lowering.graph.edge_count(),
            variables = lowering.variables.len(),
            "built control-flow graph"
        );

        Ok(ControlFlowGraph::from_parts(
            procedure.name().to_string(),
            procedure.parameters().to_vec(),
            lowering.graph,
            lowering.variables,
            lowering.scopes,
            start,
            end,
        ))
    }

    /// Builds one graph per procedure, in declaration order.
    ///
    /// Procedures are independent, so with [`AnalysisConfig::parallel`] set they
    /// are lowered on the rayon pool.
    ///
    /// # Errors
    ///
    /// Fails as a whole with the first precondition violation found. Call
    /// [`build`](Self::build) per procedure to skip malformed ones instead.
    pub fn build_unit<'a>(&self, unit: &'a CompilationUnit) -> Result<Vec<ControlFlowGraph<'a>>> {
        if self.config.parallel {
            unit.procedures()
                .par_iter()
                .map(|procedure| self.build(procedure))
                .collect()
        } else {
            unit.procedures()
                .iter()
                .map(|procedure| self.build(procedure))
                .collect()
        }
    }
}

/// Mutable state of one lowering run.
struct Lowering<'a> {
    graph: DirectedGraph<CfgNode<'a>, CfgEdgeKind>,
    variables: Vec<Variable>,
    scopes: Scopes,
    /// Innermost open scope position. Starts in the parameter frame.
    point: ScopePoint,
    returns: Vec<NodeId>,
}

impl<'a> Lowering<'a> {
    fn new(parameters: &'a [String]) -> Result<Self> {
        let (scopes, point) = Scopes::new();
        let mut lowering = Lowering {
            graph: DirectedGraph::new(),
            variables: Vec::with_capacity(parameters.len()),
            scopes,
            point,
            returns: Vec::new(),
        };

        for (position, name) in parameters.iter().enumerate() {
            if name.is_empty() {
                return Err(precondition_error!(
                    "parameter {} has an empty name",
                    position
                ));
            }
            if lowering.scopes.lookup(lowering.point, name).is_some() {
                return Err(precondition_error!("duplicate parameter name '{}'", name));
            }
            let id = lowering.new_variable(name, VariableKind::Parameter, None);
            lowering.scopes.declare(&mut lowering.point, name, id);
        }

        Ok(lowering)
    }

    fn new_variable(
        &mut self,
        name: &str,
        kind: VariableKind,
        declared_at: Option<NodeId>,
    ) -> VariableId {
        let id = VariableId(self.variables.len());
        self.variables.push(Variable {
            name: name.to_string(),
            kind,
            declared_at,
        });
        id
    }

    /// Lowers `stmt` inside a fresh lexical scope.
    fn lower_scoped(&mut self, stmt: &'a Stmt, incoming: Pending) -> Result<Pending> {
        let outer = self.point;
        self.point = self.scopes.open(outer);
        let outgoing = self.lower(stmt, incoming);
        self.point = outer;
        outgoing
    }

    fn lower(&mut self, stmt: &'a Stmt, incoming: Pending) -> Result<Pending> {
        match stmt {
            Stmt::Block(stmts) => {
                let outer = self.point;
                self.point = self.scopes.open(outer);
                let outgoing = stmts
                    .iter()
                    .try_fold(incoming, |pending, child| self.lower(child, pending));
                self.point = outer;
                outgoing
            }
            Stmt::VarDecl { name, .. } => {
                check_name(name, "declaration")?;
                let node = self.add_node(stmt, StatementKind::VarDecl, &incoming)?;
                let id = self.new_variable(name, VariableKind::Local, Some(node));
                self.scopes.declare(&mut self.point, name, id);
                self.bind(node, id);
                Ok(vec![(node, CfgEdgeKind::Sequential)])
            }
            Stmt::Assign { name, .. } => {
                check_name(name, "assignment")?;
                let node = self.add_node(stmt, StatementKind::Assign, &incoming)?;
                let id = self.resolve(name);
                self.bind(node, id);
                Ok(vec![(node, CfgEdgeKind::Sequential)])
            }
            Stmt::If {
                then_branch,
                else_branch,
                ..
            } => {
                let node = self.add_node(stmt, StatementKind::If, &incoming)?;
                let mut exits =
                    self.lower_scoped(then_branch, vec![(node, CfgEdgeKind::BranchTrue)])?;
                match else_branch {
                    Some(else_branch) => exits.extend(
                        self.lower_scoped(else_branch, vec![(node, CfgEdgeKind::BranchFalse)])?,
                    ),
                    None => exits.push((node, CfgEdgeKind::BranchFalse)),
                }
                Ok(exits)
            }
            Stmt::While { body, .. } => {
                let node = self.add_node(stmt, StatementKind::While, &incoming)?;
                let body_exits = self.lower_scoped(body, vec![(node, CfgEdgeKind::BranchTrue)])?;
                let back: Pending = body_exits
                    .into_iter()
                    .map(|(source, _)| (source, CfgEdgeKind::LoopBack))
                    .collect();
                self.connect(&back, node)?;
                Ok(vec![(node, CfgEdgeKind::BranchFalse)])
            }
            Stmt::Return(_) => {
                let node = self.add_node(stmt, StatementKind::Return, &incoming)?;
                self.returns.push(node);
                Ok(Vec::new())
            }
            Stmt::Expr(_) => {
                let node = self.add_node(stmt, StatementKind::Expr, &incoming)?;
                Ok(vec![(node, CfgEdgeKind::Sequential)])
            }
        }
    }

    /// Allocates a statement node, wires `incoming` into it and records the
    /// scope it sees. A declaration's own binding is not yet visible there.
    fn add_node(
        &mut self,
        stmt: &'a Stmt,
        kind: StatementKind,
        incoming: &Pending,
    ) -> Result<NodeId> {
        let node = self.graph.add_node(CfgNode {
            stmt: Some(stmt),
            kind,
            variable: None,
        });
        self.scopes.record(self.point);
        self.connect(incoming, node)?;
        Ok(node)
    }

    fn add_end(&mut self) -> NodeId {
        let end = self.graph.add_node(CfgNode::end());
        self.scopes.record(self.point);
        end
    }

    fn bind(&mut self, node: NodeId, variable: VariableId) {
        if let Some(payload) = self.graph.node_mut(node) {
            payload.variable = Some(variable);
        }
    }

    /// Innermost visible binding of `name`, or the procedure's free variable.
    fn resolve(&mut self, name: &str) -> VariableId {
        if let Some(id) = self.scopes.lookup(self.point, name) {
            return id;
        }
        if let Some(id) = self.scopes.free(name) {
            return id;
        }
        let id = self.new_variable(name, VariableKind::Free, None);
        self.scopes.insert_free(name, id);
        id
    }

    /// Adds `source -> target` for every pending edge, skipping pairs that are
    /// already connected.
    fn connect(&mut self, pending: &Pending, target: NodeId) -> Result<()> {
        for &(source, kind) in pending {
            if !self.graph.contains_edge(source, target) {
                self.graph.add_edge(source, target, kind)?;
            }
        }
        Ok(())
    }
}

fn check_name(name: &str, what: &str) -> Result<()> {
    if name.is_empty() {
        return Err(precondition_error!("{} with an empty variable name", what));
    }
    Ok(())
}
