//! Edge classification for statement-level control-flow graphs.

use strum::{Display, EnumIter, IntoStaticStr};

/// Why control can move along an edge.
///
/// The kind is informational: the dataflow solver treats every edge alike. It is
/// shown in DOT output and lets callers tell loop back edges and early exits
/// apart from ordinary sequencing.
///
/// Between any ordered pair of nodes there is at most one edge. When lowering
/// would produce a second one, as in `if (c) {}` where both arms reach the same
/// successor, the first kind recorded is kept.
///
/// # Examples
///
/// ```rust
/// use defscope::analysis::CfgEdgeKind;
///
/// assert!(CfgEdgeKind::BranchTrue.is_conditional());
/// assert!(!CfgEdgeKind::LoopBack.is_conditional());
/// assert_eq!(CfgEdgeKind::LoopBack.to_string(), "loop");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr, EnumIter)]
pub enum CfgEdgeKind {
    /// Fall-through from one statement to the next.
    #[strum(serialize = "seq")]
    Sequential,

    /// From an `if` into its then-branch, or from a `while` into its body.
    #[strum(serialize = "true")]
    BranchTrue,

    /// From an `if` into its else-branch or past it, or from a `while` to the
    /// statement after the loop.
    #[strum(serialize = "false")]
    BranchFalse,

    /// From the end of a loop body back to the loop header.
    #[strum(serialize = "loop")]
    LoopBack,

    /// From a `return` to the procedure exit.
    #[strum(serialize = "return")]
    Return,
}

impl CfgEdgeKind {
    /// Returns `true` for the two outcomes of a condition.
    #[must_use]
    pub const fn is_conditional(self) -> bool {
        matches!(self, Self::BranchTrue | Self::BranchFalse)
    }

    /// Returns `true` for edges that close a loop.
    #[must_use]
    pub const fn is_back_edge(self) -> bool {
        matches!(self, Self::LoopBack)
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_only_loop_back_closes_a_loop() {
        let back: Vec<CfgEdgeKind> = CfgEdgeKind::iter().filter(|k| k.is_back_edge()).collect();
        assert_eq!(back, vec![CfgEdgeKind::LoopBack]);
        assert!(CfgEdgeKind::iter().all(|k| !(k.is_back_edge() && k.is_conditional())));
    }
}
