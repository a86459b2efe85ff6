//! Structured procedure trees.
//!
//! This is the input side of the analysis: the shape a parser hands over after it
//! has turned source text into procedures made of nested statements. Expressions
//! are kept opaque because neither CFG construction nor reaching definitions look
//! inside them.
//!
//! # Building a tree
//!
//! ```rust
//! use defscope::ast::{CompilationUnit, Expr, Procedure, Stmt};
//!
//! let body = Stmt::block([
//!     Stmt::decl("x", 1),
//!     Stmt::while_loop(
//!         Expr::opaque("x < n"),
//!         Stmt::block([Stmt::assign("x", Expr::opaque("x * 2"))]),
//!     ),
//!     Stmt::ret_value(Expr::name("x")),
//! ]);
//! let unit = CompilationUnit::new([Procedure::new("grow", ["n"], body)]);
//!
//! assert_eq!(unit.procedures().len(), 1);
//! assert_eq!(unit.procedures()[0].parameters(), ["n"]);
//! ```

mod expr;
mod procedure;
mod stmt;

pub use expr::Expr;
pub use procedure::{CompilationUnit, Procedure};
pub use stmt::Stmt;
