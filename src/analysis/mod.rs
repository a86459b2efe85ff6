//! Control-flow and dataflow analysis of structured procedures.
//!
//! - [`cfg`]: lowering procedure bodies into statement-level control-flow graphs
//! - [`dataflow`]: the forward worklist framework and reaching definitions
//!
//! The usual pipeline is [`ControlFlowBuilder::build_unit`] followed by
//! [`ReachingDefinitionsBuilder::build`]. Both accept an
//! [`AnalysisConfig`](crate::config::AnalysisConfig).

pub mod cfg;
pub mod dataflow;

pub use cfg::{
    CfgEdgeKind, CfgNode, ControlFlowBuilder, ControlFlowGraph, StatementKind, Variable,
    VariableId, VariableKind,
};
pub use dataflow::{
    AnalysisResults, DataFlowAnalysis, DataFlowSolver, Definition, JoinSemiLattice,
    ReachingDefinitions, ReachingDefinitionsBuilder, ReachingSet,
};
