//! # defscope Prelude
//!
//! The types needed to build a graph, solve it and query the result.
//!
//! ```rust
//! use defscope::prelude::*;
//!
//! let proc = Procedure::nullary("f", Stmt::block([Stmt::decl("x", 1)]));
//! let cfg = ControlFlowBuilder::with_config(AnalysisConfig::sequential()).build(&proc)?;
//! let rd = ReachingDefinitionsBuilder::new().analyze(&cfg);
//! assert!(rd.get(cfg.end()).contains_origin("x", cfg.start()));
//! # Ok::<(), defscope::Error>(())
//! ```

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all defscope operations
pub use crate::Error;

/// The result type used throughout defscope
pub use crate::Result;

/// Analysis settings
pub use crate::config::{AnalysisConfig, VariableIdentity, WorklistOrder};

// ================================================================================================
// Input Trees
// ================================================================================================

/// Statement tree types
pub use crate::ast::{CompilationUnit, Expr, Procedure, Stmt};

// ================================================================================================
// Analysis
// ================================================================================================

/// Control-flow graph construction
pub use crate::analysis::{CfgEdgeKind, ControlFlowBuilder, ControlFlowGraph, StatementKind};

/// Reaching definitions
pub use crate::analysis::{
    Definition, ReachingDefinitions, ReachingDefinitionsBuilder, ReachingSet,
};

/// Node handles
pub use crate::utils::graph::NodeId;
