//! Statement-level control-flow graphs.
//!
//! [`ControlFlowBuilder`] lowers a structured [`Procedure`](crate::ast::Procedure)
//! into a [`ControlFlowGraph`] whose nodes are individual statements. Blocks are
//! transparent and produce no node; every other statement produces exactly one.
//!
//! # Translation rules
//!
//! | Construct | Edges |
//! |-----------|-------|
//! | `s1; s2` | `s1 -> s2` |
//! | `if (c) T else E` | `if -> T`, `if -> E`, exits of `T` and `E` to the next statement |
//! | `if (c) T` | `if -> T`, `if -> next`, exits of `T` to the next statement |
//! | `while (c) B` | `while -> B`, exits of `B` back to `while`, `while -> next` |
//! | `return` | `return -> end` only |
//!
//! "next" is the first statement that follows in an enclosing block, or the
//! synthetic end node when nothing follows.
//!
//! # Variable resolution
//!
//! While lowering, declared and assigned names are resolved to [`VariableId`]s
//! through lexical scopes: parameters, then one scope per block and per branch or
//! loop body. A declaration shadows outer bindings of the same name; an
//! assignment with no visible declaration binds a procedure-wide free variable.
//! The scope each node was lowered in is kept, so
//! [`ControlFlowGraph::resolve`] answers the same question for reads.

mod builder;
mod edge;
mod graph;
mod node;
mod scope;

pub use builder::ControlFlowBuilder;
pub use edge::CfgEdgeKind;
pub use graph::ControlFlowGraph;
pub use node::{CfgNode, StatementKind, Variable, VariableId, VariableKind};
pub(crate) use scope::Scopes;

#[cfg(test)]
mod tests {
    use crate::{
        analysis::{CfgEdgeKind, ControlFlowBuilder, StatementKind, VariableKind},
        ast::{Expr, Procedure, Stmt},
        utils::graph::NodeId,
        Error,
    };

    #[test]
    fn test_nested_blocks_are_transparent() {
        let proc = Procedure::nullary(
            "f",
            Stmt::block([
                Stmt::block([Stmt::block([Stmt::decl("x", 1)])]),
                Stmt::block([]),
                Stmt::assign("x", 2),
            ]),
        );
        let cfg = ControlFlowBuilder::new().build(&proc).unwrap();

        assert_eq!(cfg.node_count(), 3);
        assert!(cfg.has_edge(NodeId::new(0), NodeId::new(1)));
        assert!(cfg.has_edge(NodeId::new(1), cfg.end()));
    }

    #[test]
    fn test_end_is_last_node() {
        let proc = Procedure::nullary("f", Stmt::block([Stmt::expr(Expr::opaque("g()"))]));
        let cfg = ControlFlowBuilder::new().build(&proc).unwrap();

        assert_eq!(cfg.end(), NodeId::new(cfg.node_count() - 1));
        assert_eq!(cfg.node(cfg.end()).unwrap().kind(), StatementKind::End);
        assert!(cfg.node(cfg.end()).unwrap().stmt().is_none());
    }

    #[test]
    fn test_shadowing_declaration_gets_new_variable() {
        let proc = Procedure::new(
            "f",
            ["x"],
            Stmt::block([
                Stmt::assign("x", 1),
                Stmt::if_then(
                    Expr::opaque("c"),
                    Stmt::block([Stmt::decl("x", 2), Stmt::assign("x", 3)]),
                ),
                Stmt::assign("x", 4),
            ]),
        );
        let cfg = ControlFlowBuilder::new().build(&proc).unwrap();
        let var = |n: usize| cfg.node(NodeId::new(n)).unwrap().variable().unwrap();

        let param = var(0);
        assert_eq!(cfg.variable(param).unwrap().kind(), VariableKind::Parameter);
        assert_ne!(var(2), param);
        assert_eq!(var(3), var(2));
        assert_eq!(var(4), param);
        assert_eq!(
            cfg.variable(var(2)).unwrap().declared_at(),
            Some(NodeId::new(2))
        );
    }

    #[test]
    fn test_undeclared_assignments_share_free_variable() {
        let proc = Procedure::nullary(
            "f",
            Stmt::block([
                Stmt::assign("y", 1),
                Stmt::while_loop(Expr::opaque("c"), Stmt::assign("y", 2)),
            ]),
        );
        let cfg = ControlFlowBuilder::new().build(&proc).unwrap();
        let first = cfg.node(NodeId::new(0)).unwrap().variable().unwrap();
        let second = cfg.node(NodeId::new(2)).unwrap().variable().unwrap();

        assert_eq!(first, second);
        assert_eq!(cfg.variable(first).unwrap().kind(), VariableKind::Free);
        assert_eq!(cfg.variables().len(), 1);
    }

    #[test]
    fn test_branch_local_does_not_leak() {
        let proc = Procedure::nullary(
            "f",
            Stmt::block([
                Stmt::if_then(Expr::opaque("c"), Stmt::decl("t", 1)),
                Stmt::assign("t", 2),
            ]),
        );
        let cfg = ControlFlowBuilder::new().build(&proc).unwrap();
        let local = cfg.node(NodeId::new(1)).unwrap().variable().unwrap();
        let outer = cfg.node(NodeId::new(2)).unwrap().variable().unwrap();

        assert_ne!(local, outer);
        assert_eq!(cfg.variable(outer).unwrap().kind(), VariableKind::Free);
    }

    #[test]
    fn test_empty_names_are_rejected() {
        let builder = ControlFlowBuilder::new();

        let empty_param = Procedure::new("f", [""], Stmt::block([]));
        assert!(matches!(
            builder.build(&empty_param),
            Err(Error::Precondition { .. })
        ));

        let empty_decl = Procedure::nullary("f", Stmt::block([Stmt::declare("")]));
        assert!(matches!(
            builder.build(&empty_decl),
            Err(Error::Precondition { .. })
        ));

        let nested = Procedure::nullary(
            "f",
            Stmt::block([Stmt::while_loop(
                Expr::opaque("c"),
                Stmt::block([Stmt::assign("", 1)]),
            )]),
        );
        assert!(matches!(
            builder.build(&nested),
            Err(Error::Precondition { .. })
        ));
    }

    #[test]
    fn test_to_dot_output() {
        let proc = Procedure::new(
            "abs",
            ["a"],
            Stmt::block([
                Stmt::if_then(Expr::opaque("a < 0"), Stmt::assign("a", Expr::opaque("-a"))),
                Stmt::ret_value(Expr::name("a")),
                Stmt::expr(Expr::opaque("unreachable()")),
            ]),
        );
        let cfg = ControlFlowBuilder::new().build(&proc).unwrap();
        let dot = cfg.to_dot(None);

        assert!(dot.starts_with("digraph CFG {"));
        assert!(dot.contains("label=\"abs\""));
        assert!(dot.contains("if (a \\< 0)"));
        assert!(dot.contains("n0 -> n1 [label=\"true\", color=darkgreen]"));
        assert!(dot.contains("n0 -> n2 [label=\"false\", color=red]"));
        assert!(dot.contains("n2 -> n4 [label=\"return\"]"));
        assert!(dot.contains("style=dashed"));
        assert!(dot.trim_end().ends_with('}'));
    }

    #[test]
    fn test_to_dot_loop_back_edge() {
        let proc = Procedure::nullary(
            "spin",
            Stmt::block([Stmt::while_loop(
                Expr::opaque("c"),
                Stmt::assign("x", 1),
            )]),
        );
        let cfg = ControlFlowBuilder::new().build(&proc).unwrap();
        let dot = cfg.to_dot(Some("loop"));

        assert!(dot.contains("label=\"loop\";"));
        assert!(dot.contains("n1 -> n0 [label=\"loop\", color=blue, constraint=false]"));
        assert!(dot.contains("n0 -> n2 [label=\"false\", color=red]"));
    }

    #[test]
    fn test_resolve_reads_by_position() {
        let proc = Procedure::new(
            "f",
            ["x"],
            Stmt::block([
                Stmt::decl("y", Expr::name("x")),
                Stmt::if_then(
                    Expr::opaque("c"),
                    Stmt::block([
                        Stmt::decl("x", Expr::name("x")),
                        Stmt::ret_value(Expr::name("x")),
                    ]),
                ),
                Stmt::ret_value(Expr::name("x")),
                Stmt::assign("z", 1),
            ]),
        );
        let cfg = ControlFlowBuilder::new().build(&proc).unwrap();
        let var = |n: usize| cfg.node(NodeId::new(n)).unwrap().variable().unwrap();
        let param = cfg.resolve(NodeId::new(0), "x").unwrap();
        assert_eq!(cfg.variable(param).unwrap().kind(), VariableKind::Parameter);

        // The shadowing declaration reads the outer `x`.
        assert_eq!(cfg.resolve(NodeId::new(2), "x"), Some(param));
        assert_eq!(cfg.resolve(NodeId::new(3), "x"), Some(var(2)));
        assert_eq!(cfg.resolve(NodeId::new(4), "x"), Some(param));

        // `y` is only visible after its declaration.
        assert_eq!(cfg.resolve(NodeId::new(0), "y"), None);
        assert_eq!(cfg.resolve(NodeId::new(4), "y"), Some(var(0)));

        // Undeclared names resolve to the free variable everywhere.
        assert_eq!(cfg.resolve(NodeId::new(0), "z"), Some(var(5)));
        assert_eq!(cfg.resolve(cfg.end(), "z"), Some(var(5)));
        assert_eq!(cfg.resolve(cfg.end(), "nope"), None);
        assert_eq!(cfg.resolve(NodeId::new(99), "x"), None);
    }

    #[test]
    fn test_edge_kinds() {
        let proc = Procedure::nullary(
            "f",
            Stmt::block([
                Stmt::while_loop(
                    Expr::opaque("c"),
                    Stmt::block([Stmt::if_else(
                        Expr::opaque("d"),
                        Stmt::assign("x", 1),
                        Stmt::ret(),
                    )]),
                ),
                Stmt::assign("x", 2),
            ]),
        );
        let cfg = ControlFlowBuilder::new().build(&proc).unwrap();
        let n = NodeId::new;

        assert_eq!(cfg.edge_kind(n(0), n(1)), Some(CfgEdgeKind::BranchTrue));
        assert_eq!(cfg.edge_kind(n(1), n(2)), Some(CfgEdgeKind::BranchTrue));
        assert_eq!(cfg.edge_kind(n(1), n(3)), Some(CfgEdgeKind::BranchFalse));
        assert_eq!(cfg.edge_kind(n(2), n(0)), Some(CfgEdgeKind::LoopBack));
        assert_eq!(cfg.edge_kind(n(3), cfg.end()), Some(CfgEdgeKind::Return));
        assert_eq!(cfg.edge_kind(n(0), n(4)), Some(CfgEdgeKind::BranchFalse));
        assert_eq!(cfg.edge_kind(n(4), cfg.end()), Some(CfgEdgeKind::Sequential));
        assert!(!cfg.has_edge(n(3), n(0)));
    }
}
