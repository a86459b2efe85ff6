use thiserror::Error;

/// Builds an [`Error::Precondition`] that records the call site.
///
/// Accepts either a single message expression or a format string with arguments.
macro_rules! precondition_error {
    ($msg:expr) => {
        crate::Error::Precondition {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Precondition {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// Errors reported by CFG construction.
///
/// The dataflow solver itself never fails: structural anomalies such as dangling
/// node handles are treated as empty sets. Only malformed input trees are
/// reported, and only by the builders.
///
/// # Examples
///
/// ```rust
/// use defscope::{analysis::ControlFlowBuilder, ast::{Procedure, Stmt}, Error};
///
/// let proc = Procedure::new("f", ["a", "a"], Stmt::block([]));
/// match ControlFlowBuilder::new().build(&proc) {
///     Err(Error::Precondition { message, .. }) => assert!(message.contains("duplicate")),
///     other => panic!("unexpected {other:?}"),
/// }
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The input tree violates a structural precondition.
    ///
    /// Raised for an empty variable name in a declaration, assignment or parameter
    /// list, and for a formal parameter that is declared twice.
    #[error("Precondition violated - {file}:{line}: {message}")]
    Precondition {
        /// What was wrong with the input
        message: String,
        /// Source file where the violation was detected
        file: &'static str,
        /// Source line where the violation was detected
        line: u32,
    },

    /// A graph operation referenced a node that does not exist.
    #[error("{0}")]
    GraphError(String),
}
