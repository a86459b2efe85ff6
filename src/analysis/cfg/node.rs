//! Per-node metadata: the statement behind a node and the variable it touches.

use std::fmt;

use strum::{Display, EnumIter, IntoStaticStr};

use crate::{ast::Stmt, utils::graph::NodeId};

/// The syntactic form of the statement behind a CFG node.
///
/// Blocks never become nodes, so there is no block kind. [`StatementKind::End`]
/// is the synthetic exit node that every procedure graph carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum StatementKind {
    /// `var x;` or `var x = e;`
    VarDecl,
    /// `x = e;`
    Assign,
    /// `if (c) ...`
    If,
    /// `while (c) ...`
    While,
    /// `return;` or `return e;`
    Return,
    /// `e;`
    Expr,
    /// Synthetic procedure exit.
    End,
}

impl StatementKind {
    /// Classifies a tree statement. Returns `None` for blocks.
    #[must_use]
    pub fn of(stmt: &Stmt) -> Option<Self> {
        match stmt {
            Stmt::Block(_) => None,
            Stmt::VarDecl { .. } => Some(Self::VarDecl),
            Stmt::Assign { .. } => Some(Self::Assign),
            Stmt::If { .. } => Some(Self::If),
            Stmt::While { .. } => Some(Self::While),
            Stmt::Return(_) => Some(Self::Return),
            Stmt::Expr(_) => Some(Self::Expr),
        }
    }
}

/// Handle to a lexically resolved variable of one procedure.
///
/// Two declarations of the same name in different scopes get different ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VariableId(pub(crate) usize);

impl VariableId {
    /// Returns the raw index into [`ControlFlowGraph::variables`](crate::analysis::ControlFlowGraph::variables).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for VariableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Where a variable's binding comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum VariableKind {
    /// A formal parameter.
    Parameter,
    /// A `var` declaration in the body.
    Local,
    /// Assigned somewhere without any visible declaration. There is at most one
    /// free variable per name in a procedure.
    Free,
}

/// A resolved variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    pub(crate) name: String,
    pub(crate) kind: VariableKind,
    pub(crate) declared_at: Option<NodeId>,
}

impl Variable {
    /// Source name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Binding kind.
    #[must_use]
    pub fn kind(&self) -> VariableKind {
        self.kind
    }

    /// The declaring node, for locals.
    #[must_use]
    pub fn declared_at(&self) -> Option<NodeId> {
        self.declared_at
    }
}

/// The payload of one CFG node.
#[derive(Debug, Clone, Copy)]
pub struct CfgNode<'a> {
    pub(crate) stmt: Option<&'a Stmt>,
    pub(crate) kind: StatementKind,
    pub(crate) variable: Option<VariableId>,
}

impl<'a> CfgNode<'a> {
    pub(crate) fn end() -> Self {
        CfgNode {
            stmt: None,
            kind: StatementKind::End,
            variable: None,
        }
    }

    /// The tree statement, or `None` for the synthetic end node.
    #[must_use]
    pub fn stmt(&self) -> Option<&'a Stmt> {
        self.stmt
    }

    /// The statement form.
    #[must_use]
    pub fn kind(&self) -> StatementKind {
        self.kind
    }

    /// The variable declared or assigned, if any.
    ///
    /// Set for every declaration, initialized or not, and every assignment.
    #[must_use]
    pub fn variable(&self) -> Option<VariableId> {
        self.variable
    }

    /// Returns `true` if executing this node creates a definition: an
    /// initialized declaration or an assignment.
    #[must_use]
    pub fn is_definition(&self) -> bool {
        self.variable.is_some() && self.stmt.is_some_and(|s| s.defined_name().is_some())
    }
}
