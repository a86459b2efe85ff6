//! Analysis configuration.
//!
//! [`AnalysisConfig`] controls how variables are identified for killing, in which
//! order the worklist is drained, and whether independent procedures are processed
//! on the rayon thread pool. The result of the analysis does not depend on the
//! worklist order; the other two settings do change what is computed or how.

use strum::{Display, EnumIter, IntoStaticStr};

/// How definitions are grouped for the kill step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, IntoStaticStr, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum VariableIdentity {
    /// Definitions kill each other only when they write the same lexically
    /// resolved variable. A declaration in an inner block that shadows an outer
    /// name leaves the outer definitions alone.
    #[default]
    Scoped,

    /// Definitions kill each other whenever their names are equal, regardless
    /// of scope.
    Name,
}

/// Order in which pending nodes are taken off the worklist.
///
/// All orders converge to the same fixed point. They differ only in how many
/// transfer evaluations that takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, IntoStaticStr, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum WorklistOrder {
    /// Most recently pushed node first.
    Lifo,

    /// Oldest pushed node first.
    Fifo,

    /// Pending node with the smallest reverse-postorder number first.
    #[default]
    ReversePostorder,
}

/// Configuration shared by [`ControlFlowBuilder`](crate::analysis::ControlFlowBuilder)
/// and [`ReachingDefinitionsBuilder`](crate::analysis::ReachingDefinitionsBuilder).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisConfig {
    /// Variable identity used when computing KILL (default: scoped).
    pub identity: VariableIdentity,

    /// Worklist discipline (default: reverse postorder).
    pub order: WorklistOrder,

    /// Process independent procedures concurrently (default: true).
    pub parallel: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            identity: VariableIdentity::Scoped,
            order: WorklistOrder::ReversePostorder,
            parallel: true,
        }
    }
}

impl AnalysisConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Default configuration with parallelism disabled.
    ///
    /// Useful when the caller already runs on a thread pool, or when log output
    /// should stay in procedure order.
    #[must_use]
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }

    /// Name-based killing with a plain LIFO worklist.
    #[must_use]
    pub fn compatible() -> Self {
        Self {
            identity: VariableIdentity::Name,
            order: WorklistOrder::Lifo,
            parallel: false,
        }
    }

    /// Sets the variable identity used for killing.
    #[must_use]
    pub fn with_identity(mut self, identity: VariableIdentity) -> Self {
        self.identity = identity;
        self
    }

    /// Sets the worklist order.
    #[must_use]
    pub fn with_order(mut self, order: WorklistOrder) -> Self {
        self.order = order;
        self
    }

    /// Enables or disables per-procedure parallelism.
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}
