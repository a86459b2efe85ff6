//! Forward dataflow analysis over control-flow graphs.
//!
//! The framework has three parts:
//!
//! - [`JoinSemiLattice`]: the value domain, joined at control-flow merges
//! - [`DataFlowAnalysis`]: boundary value, initial value and transfer function
//! - [`DataFlowSolver`]: the worklist iteration that finds the fixed point
//!
//! Reaching definitions is the analysis built on top of it. It is driven through
//! [`ReachingDefinitionsBuilder`] and queried through [`ReachingDefinitions`].
//!
//! # Example
//!
//! ```rust
//! use defscope::{
//!     analysis::{ControlFlowBuilder, ReachingDefinitionsBuilder},
//!     ast::{CompilationUnit, Expr, Procedure, Stmt},
//! };
//!
//! let unit = CompilationUnit::new([Procedure::new("count", ["n"], Stmt::block([
//!     Stmt::decl("i", 0),
//!     Stmt::while_loop(
//!         Expr::opaque("i < n"),
//!         Stmt::assign("i", Expr::opaque("i + 1")),
//!     ),
//!     Stmt::ret_value(Expr::name("i")),
//! ]))]);
//!
//! let cfgs = ControlFlowBuilder::new().build_unit(&unit)?;
//! let results = ReachingDefinitionsBuilder::new().build(&cfgs);
//!
//! // Both the initial value and the increment reach the loop header.
//! let header = cfgs[0].node_ids().nth(1).unwrap();
//! assert_eq!(results[0].definitions_of(header, "i").count(), 2);
//! # Ok::<(), defscope::Error>(())
//! ```
//!
//! # Thread Safety
//!
//! Results own their data and are `Send` and `Sync`.

mod framework;
mod lattice;
mod reaching;
mod results;
mod solver;

pub use framework::{AnalysisResults, DataFlowAnalysis};
pub use lattice::JoinSemiLattice;
pub use reaching::ReachingDefinitionsBuilder;
pub use results::{Definition, ReachingDefinitions, ReachingSet};
pub use solver::DataFlowSolver;
