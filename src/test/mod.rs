//! Shared procedure fixtures for unit tests.
//!
//! Each fixture documents the node numbering the builder assigns, so tests can
//! address statements with `NodeId::new(..)` directly.

use crate::{
    analysis::{ControlFlowBuilder, ControlFlowGraph, ReachingDefinitions, ReachingDefinitionsBuilder},
    ast::{Expr, Procedure, Stmt},
    config::AnalysisConfig,
};

/// ```text
/// f(a) {
///     var x = a;   // n0
///     x = 2;       // n1
///     var y = x;   // n2
///     return y;    // n3
/// }                // n4 end
/// ```
pub fn straight_line() -> Procedure {
    Procedure::new(
        "straight_line",
        ["a"],
        Stmt::block([
            Stmt::decl("x", Expr::name("a")),
            Stmt::assign("x", 2),
            Stmt::decl("y", Expr::name("x")),
            Stmt::ret_value(Expr::name("y")),
        ]),
    )
}

/// ```text
/// f(a) {
///     var x = 1;   // n0
///     if (a) {     // n1
///         x = 2;   // n2
///     } else {
///         x = 3;   // n3
///     }
///     return x;    // n4
/// }                // n5 end
/// ```
pub fn diamond() -> Procedure {
    Procedure::new(
        "diamond",
        ["a"],
        Stmt::block([
            Stmt::decl("x", 1),
            Stmt::if_else(
                Expr::name("a"),
                Stmt::block([Stmt::assign("x", 2)]),
                Stmt::block([Stmt::assign("x", 3)]),
            ),
            Stmt::ret_value(Expr::name("x")),
        ]),
    )
}

/// ```text
/// f(n) {
///     var i = 0;       // n0
///     var s = 0;       // n1
///     while (i < n) {  // n2
///         s = s + i;   // n3
///         i = i + 1;   // n4
///     }
///     return s;        // n5
/// }                    // n6 end
/// ```
pub fn counting_loop() -> Procedure {
    Procedure::new(
        "counting_loop",
        ["n"],
        Stmt::block([
            Stmt::decl("i", 0),
            Stmt::decl("s", 0),
            Stmt::while_loop(
                Expr::opaque("i < n"),
                Stmt::block([
                    Stmt::assign("s", Expr::opaque("s + i")),
                    Stmt::assign("i", Expr::opaque("i + 1")),
                ]),
            ),
            Stmt::ret_value(Expr::name("s")),
        ]),
    )
}

/// ```text
/// f() {
///     var x = 1;       // n0
///     {
///         var x = 2;   // n1
///         g(x);        // n2
///     }
///     return x;        // n3
///     x = 3;           // n4 (dead)
/// }                    // n5 end
/// ```
pub fn shadowing_with_dead_code() -> Procedure {
    Procedure::nullary(
        "shadowing_with_dead_code",
        Stmt::block([
            Stmt::decl("x", 1),
            Stmt::block([Stmt::decl("x", 2), Stmt::expr(Expr::opaque("g(x)"))]),
            Stmt::ret_value(Expr::name("x")),
            Stmt::assign("x", 3),
        ]),
    )
}

/// Builds the graph of `procedure`, panicking on malformed input.
pub fn cfg_of(procedure: &Procedure) -> ControlFlowGraph<'_> {
    ControlFlowBuilder::new()
        .build(procedure)
        .unwrap_or_else(|e| panic!("fixture {} failed to build: {e}", procedure.name()))
}

/// Runs reaching definitions over `cfg` with `config`.
pub fn reaching(cfg: &ControlFlowGraph<'_>, config: AnalysisConfig) -> ReachingDefinitions {
    ReachingDefinitionsBuilder::with_config(config).analyze(cfg)
}
