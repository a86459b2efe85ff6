use std::fmt;

use crate::ast::Expr;

/// A statement in a structured procedure body.
///
/// Statements are compared structurally by `PartialEq`, which is never used for
/// identity: the control-flow graph assigns each statement occurrence its own
/// [`NodeId`](crate::utils::graph::NodeId).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    /// A sequence of statements with its own lexical scope.
    Block(Vec<Stmt>),

    /// A variable declaration, optionally initialized.
    VarDecl {
        /// Declared name.
        name: String,
        /// Initializer, if any. Only an initialized declaration defines the variable.
        init: Option<Expr>,
    },

    /// An assignment to a whole variable.
    Assign {
        /// Assigned name.
        name: String,
        /// Assigned value.
        value: Expr,
    },

    /// A two-way branch.
    If {
        /// Branch condition.
        cond: Expr,
        /// Taken when the condition holds.
        then_branch: Box<Stmt>,
        /// Taken otherwise; `None` falls through to the following statement.
        else_branch: Option<Box<Stmt>>,
    },

    /// A pre-tested loop.
    While {
        /// Loop condition.
        cond: Expr,
        /// Loop body.
        body: Box<Stmt>,
    },

    /// Leaves the procedure.
    Return(Option<Expr>),

    /// An expression evaluated for its side effects.
    Expr(Expr),
}

impl Stmt {
    /// `{ stmts }`
    pub fn block(stmts: impl IntoIterator<Item = Stmt>) -> Self {
        Stmt::Block(stmts.into_iter().collect())
    }

    /// `var name = init;`
    pub fn decl(name: impl Into<String>, init: impl Into<Expr>) -> Self {
        Stmt::VarDecl {
            name: name.into(),
            init: Some(init.into()),
        }
    }

    /// `var name;`
    pub fn declare(name: impl Into<String>) -> Self {
        Stmt::VarDecl {
            name: name.into(),
            init: None,
        }
    }

    /// `name = value;`
    pub fn assign(name: impl Into<String>, value: impl Into<Expr>) -> Self {
        Stmt::Assign {
            name: name.into(),
            value: value.into(),
        }
    }

    /// `if (cond) then_branch`
    pub fn if_then(cond: impl Into<Expr>, then_branch: Stmt) -> Self {
        Stmt::If {
            cond: cond.into(),
            then_branch: Box::new(then_branch),
            else_branch: None,
        }
    }

    /// `if (cond) then_branch else else_branch`
    pub fn if_else(cond: impl Into<Expr>, then_branch: Stmt, else_branch: Stmt) -> Self {
        Stmt::If {
            cond: cond.into(),
            then_branch: Box::new(then_branch),
            else_branch: Some(Box::new(else_branch)),
        }
    }

    /// `while (cond) body`
    pub fn while_loop(cond: impl Into<Expr>, body: Stmt) -> Self {
        Stmt::While {
            cond: cond.into(),
            body: Box::new(body),
        }
    }

    /// `return;`
    #[must_use]
    pub fn ret() -> Self {
        Stmt::Return(None)
    }

    /// `return value;`
    pub fn ret_value(value: impl Into<Expr>) -> Self {
        Stmt::Return(Some(value.into()))
    }

    /// `expr;`
    pub fn expr(expr: impl Into<Expr>) -> Self {
        Stmt::Expr(expr.into())
    }

    /// Direct children of a block. Empty for every other statement.
    #[must_use]
    pub fn children(&self) -> &[Stmt] {
        match self {
            Stmt::Block(stmts) => stmts,
            _ => &[],
        }
    }

    /// The variable this statement writes, if it writes one.
    ///
    /// Declarations without an initializer introduce a name but write nothing.
    #[must_use]
    pub fn defined_name(&self) -> Option<&str> {
        match self {
            Stmt::VarDecl {
                name,
                init: Some(_),
            }
            | Stmt::Assign { name, .. } => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for Stmt {
    /// Single-line rendering used for graph labels. Nested statements are elided.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stmt::Block(stmts) => write!(f, "{{ {} statements }}", stmts.len()),
            Stmt::VarDecl { name, init: None } => write!(f, "var {name};"),
            Stmt::VarDecl {
                name,
                init: Some(init),
            } => write!(f, "var {name} = {init};"),
            Stmt::Assign { name, value } => write!(f, "{name} = {value};"),
            Stmt::If { cond, .. } => write!(f, "if ({cond})"),
            Stmt::While { cond, .. } => write!(f, "while ({cond})"),
            Stmt::Return(None) => f.write_str("return;"),
            Stmt::Return(Some(value)) => write!(f, "return {value};"),
            Stmt::Expr(expr) => write!(f, "{expr};"),
        }
    }
}
