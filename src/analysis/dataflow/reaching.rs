//! Reaching definitions.
//!
//! For every statement, the set of definitions that may reach its entry along
//! some path from the procedure start without being overwritten on the way.
//!
//! # Equations
//!
//! For a node `n`:
//! - `GEN[n]` = `{(v, n)}` if `n` is an initialized declaration or an assignment
//!   of `v`, otherwise `∅`
//! - `KILL[n]` = the definitions in `ENTRY[n]` of the same variable as `GEN[n]`
//! - `EXIT[n]` = `(ENTRY[n] \ KILL[n]) ∪ GEN[n]`
//! - `ENTRY[m]` = `∪ { EXIT[p] | p ∈ pred(m) }`, with `ENTRY[start]` holding one
//!   definition per formal parameter
//!
//! # Representation
//!
//! Each procedure numbers its definitions once: parameters first in parameter
//! order, then one per defining node in node order. Sets are [`BitSet`]s over
//! that numbering. For every variable key a mask of all of its definitions is
//! precomputed, so KILL is a single word-wise difference during transfer and is
//! never stored.
//!
//! What counts as "the same variable" is [`VariableIdentity`]: the lexically
//! resolved variable by default, or just the name.

use std::{collections::HashMap, sync::Arc};

use rayon::prelude::*;
use tracing::debug;

use crate::{
    analysis::{
        cfg::{ControlFlowGraph, VariableId},
        dataflow::{
            framework::DataFlowAnalysis,
            results::{Definition, ReachingDefinitions},
            solver::DataFlowSolver,
        },
    },
    config::{AnalysisConfig, VariableIdentity},
    utils::{graph::NodeId, BitSet},
};

/// The reaching-definitions problem for one procedure, ready to solve.
pub(crate) struct ReachingAnalysis {
    universe: Vec<Definition>,
    variables: Vec<VariableId>,
    /// Universe index generated by each node.
    gen: Vec<Option<usize>>,
    /// Kill key of each universe entry.
    keys: Vec<usize>,
    /// All universe entries sharing a kill key.
    masks: Vec<BitSet>,
    parameters: BitSet,
}

impl ReachingAnalysis {
    pub(crate) fn new(cfg: &ControlFlowGraph<'_>, identity: VariableIdentity) -> Self {
        let mut universe = Vec::new();
        let mut variables = Vec::new();
        let mut gen = vec![None; cfg.node_count()];

        // Parameters are the first variables the builder creates.
        for (position, name) in cfg.parameters().iter().enumerate() {
            universe.push(Definition::parameter(name.clone()));
            variables.push(VariableId(position));
        }
        let parameter_count = universe.len();

        for node in cfg.node_ids() {
            let Some(payload) = cfg.node(node) else {
                continue;
            };
            if !payload.is_definition() {
                continue;
            }
            let (Some(variable), Some(name)) = (
                payload.variable(),
                payload.stmt().and_then(|stmt| stmt.defined_name()),
            ) else {
                continue;
            };
            gen[node.index()] = Some(universe.len());
            universe.push(Definition::at(name, node));
            variables.push(variable);
        }

        let mut key_of: HashMap<KillKey<'_>, usize> = HashMap::new();
        let keys: Vec<usize> = universe
            .iter()
            .zip(&variables)
            .map(|(definition, &variable)| {
                let key = match identity {
                    VariableIdentity::Scoped => KillKey::Variable(variable),
                    VariableIdentity::Name => KillKey::Name(definition.name.as_str()),
                };
                let next = key_of.len();
                *key_of.entry(key).or_insert(next)
            })
            .collect();

        let mut masks = vec![BitSet::new(universe.len()); key_of.len()];
        for (index, &key) in keys.iter().enumerate() {
            masks[key].insert(index);
        }
        let parameters = BitSet::from_indices(universe.len(), 0..parameter_count);

        ReachingAnalysis {
            universe,
            variables,
            gen,
            keys,
            masks,
            parameters,
        }
    }

    pub(crate) fn definitions(&self) -> &[Definition] {
        &self.universe
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum KillKey<'a> {
    Variable(VariableId),
    Name(&'a str),
}

impl DataFlowAnalysis for ReachingAnalysis {
    type Lattice = BitSet;

    fn boundary(&self) -> BitSet {
        self.parameters.clone()
    }

    fn initial(&self) -> BitSet {
        BitSet::new(self.universe.len())
    }

    fn transfer(&self, node: NodeId, entry: &BitSet) -> BitSet {
        let mut exit = entry.clone();
        if let Some(&Some(definition)) = self.gen.get(node.index()) {
            exit.difference_with(&self.masks[self.keys[definition]]);
            exit.insert(definition);
        }
        exit
    }
}

/// Computes [`ReachingDefinitions`] for control-flow graphs.
///
/// # Examples
///
/// ```rust
/// use defscope::{
///     analysis::{ControlFlowBuilder, Definition, ReachingDefinitionsBuilder},
///     ast::{Expr, Procedure, Stmt},
/// };
///
/// let proc = Procedure::new("f", ["a"], Stmt::block([
///     Stmt::decl("x", 1),
///     Stmt::if_then(Expr::name("a"), Stmt::assign("x", 2)),
///     Stmt::ret_value(Expr::name("x")),
/// ]));
/// let cfg = ControlFlowBuilder::new().build(&proc)?;
/// let ret = cfg.node_for(&proc.body().children()[2]).unwrap();
///
/// let rd = ReachingDefinitionsBuilder::new().analyze(&cfg);
/// let at_return = rd.get(ret);
/// assert!(at_return.contains_parameter("a"));
/// assert_eq!(rd.definitions_of(ret, "x").count(), 2);
/// assert!(rd.unique_definition(ret, "x").is_none());
/// # Ok::<(), defscope::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ReachingDefinitionsBuilder {
    config: AnalysisConfig,
}

impl ReachingDefinitionsBuilder {
    /// Creates a builder with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder with the given configuration.
    #[must_use]
    pub fn with_config(config: AnalysisConfig) -> Self {
        ReachingDefinitionsBuilder { config }
    }

    /// Returns the configuration in use.
    #[must_use]
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyzes each graph independently. Results are in input order.
    ///
    /// With [`AnalysisConfig::parallel`] set, graphs are solved on the rayon pool.
    #[must_use]
    pub fn build(&self, cfgs: &[ControlFlowGraph<'_>]) -> Vec<ReachingDefinitions> {
        if self.config.parallel {
            cfgs.par_iter().map(|cfg| self.analyze(cfg)).collect()
        } else {
            cfgs.iter().map(|cfg| self.analyze(cfg)).collect()
        }
    }

    /// Analyzes a single graph.
    #[must_use]
    pub fn analyze(&self, cfg: &ControlFlowGraph<'_>) -> ReachingDefinitions {
        let analysis = ReachingAnalysis::new(cfg, self.config.identity);
        let solver = DataFlowSolver::new(analysis, self.config.order);
        let results = solver.solve(cfg);
        let iterations = results.iterations();
        let (entry, exit) = results.into_states();

        let analysis = solver.into_analysis();
        debug!(
            procedure = cfg.name(),
            iterations,
            definitions = analysis.definitions().len(),
            identity = %self.config.identity,
            order = %self.config.order,
            "reaching definitions converged"
        );

        ReachingDefinitions {
            procedure: cfg.name().to_string(),
            empty: BitSet::new(analysis.universe.len()),
            universe: analysis.universe,
            variables: analysis.variables,
            entry,
            exit,
            iterations,
            identity: self.config.identity,
            scopes: Arc::clone(cfg.scopes()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        analysis::ControlFlowBuilder,
        ast::{Expr, Procedure, Stmt},
        test as fixtures,
    };

    #[test]
    fn test_universe_layout() {
        let proc = Procedure::new(
            "f",
            ["p", "q"],
            Stmt::block([
                Stmt::declare("x"),
                Stmt::assign("x", 1),
                Stmt::expr(Expr::opaque("g()")),
                Stmt::decl("y", Expr::name("x")),
            ]),
        );
        let cfg = ControlFlowBuilder::new().build(&proc).unwrap();
        let analysis = ReachingAnalysis::new(&cfg, VariableIdentity::Scoped);

        assert_eq!(
            analysis.definitions(),
            &[
                Definition::parameter("p"),
                Definition::parameter("q"),
                Definition::at("x", NodeId::new(1)),
                Definition::at("y", NodeId::new(3)),
            ]
        );
        assert_eq!(analysis.gen[0], None);
        assert_eq!(analysis.gen[1], Some(2));
        assert_eq!(analysis.gen[2], None);
        assert_eq!(analysis.boundary().iter().collect::<Vec<_>>(), vec![0, 1]);
        assert!(analysis.initial().is_empty());
    }

    #[test]
    fn test_transfer_kills_same_variable_only() {
        let proc = Procedure::new(
            "f",
            ["x"],
            Stmt::block([Stmt::assign("x", 1), Stmt::decl("y", 2), Stmt::assign("x", 3)]),
        );
        let cfg = ControlFlowBuilder::new().build(&proc).unwrap();
        let analysis = ReachingAnalysis::new(&cfg, VariableIdentity::Scoped);

        let entry = BitSet::from_indices(4, [0, 1, 2]);
        let exit = analysis.transfer(NodeId::new(2), &entry);
        assert_eq!(exit.iter().collect::<Vec<_>>(), vec![2, 3]);

        let untouched = analysis.transfer(cfg.end(), &entry);
        assert_eq!(untouched, entry);
    }

    #[test]
    fn test_name_identity_merges_shadowed_variables() {
        let proc = Procedure::nullary(
            "f",
            Stmt::block([
                Stmt::decl("x", 1),
                Stmt::block([Stmt::decl("x", 2)]),
            ]),
        );
        let cfg = ControlFlowBuilder::new().build(&proc).unwrap();

        let scoped = ReachingAnalysis::new(&cfg, VariableIdentity::Scoped);
        assert_ne!(scoped.keys[0], scoped.keys[1]);

        let by_name = ReachingAnalysis::new(&cfg, VariableIdentity::Name);
        assert_eq!(by_name.keys[0], by_name.keys[1]);
        assert_eq!(by_name.masks.len(), 1);
    }

    #[test]
    fn test_build_preserves_input_order() {
        let procs = [
            Procedure::nullary("a", Stmt::block([Stmt::decl("x", 1)])),
            Procedure::new("b", ["p"], Stmt::block([])),
            Procedure::nullary("c", Stmt::block([Stmt::assign("y", 2), Stmt::ret()])),
        ];
        let cfgs: Vec<_> = procs
            .iter()
            .map(|p| ControlFlowBuilder::new().build(p).unwrap())
            .collect();

        for config in [AnalysisConfig::new(), AnalysisConfig::sequential()] {
            let results = ReachingDefinitionsBuilder::with_config(config).build(&cfgs);
            let names: Vec<&str> = results.iter().map(ReachingDefinitions::procedure).collect();
            assert_eq!(names, vec!["a", "b", "c"]);
        }
    }

    #[test]
    fn test_straight_line_keeps_latest_write() {
        let proc = fixtures::straight_line();
        let cfg = fixtures::cfg_of(&proc);
        let rd = fixtures::reaching(&cfg, AnalysisConfig::default());

        let ret = rd.get(NodeId::new(3));
        assert!(ret.contains_parameter("a"));
        assert!(!ret.contains_origin("x", NodeId::new(0)));
        assert!(ret.contains_origin("x", NodeId::new(1)));
        assert!(ret.contains_origin("y", NodeId::new(2)));
        assert_eq!(ret.len(), 3);
        assert_eq!(rd.get(cfg.end()).to_set(), ret.to_set());
    }

    #[test]
    fn test_diamond_merges_both_branches() {
        let proc = fixtures::diamond();
        let cfg = fixtures::cfg_of(&proc);
        let rd = fixtures::reaching(&cfg, AnalysisConfig::sequential());

        let ret = rd.get(NodeId::new(4));
        assert!(ret.contains_origin("x", NodeId::new(2)));
        assert!(ret.contains_origin("x", NodeId::new(3)));
        assert!(!ret.contains_origin("x", NodeId::new(0)));
        assert!(ret.contains_parameter("a"));
        assert_eq!(ret.len(), 3);
    }

    #[test]
    fn test_shadowing_depends_on_identity() {
        let proc = fixtures::shadowing_with_dead_code();
        let cfg = fixtures::cfg_of(&proc);
        let ret = NodeId::new(3);

        let scoped = fixtures::reaching(&cfg, AnalysisConfig::sequential());
        assert!(scoped.get(ret).contains_origin("x", NodeId::new(0)));
        assert!(scoped.get(ret).contains_origin("x", NodeId::new(1)));

        let by_name = fixtures::reaching(&cfg, AnalysisConfig::compatible());
        assert!(!by_name.get(ret).contains_origin("x", NodeId::new(0)));
        assert!(by_name.get(ret).contains_origin("x", NodeId::new(1)));

        let dead = NodeId::new(4);
        assert!(scoped.get(dead).is_empty());
        assert!(by_name.get(dead).is_empty());
    }

    #[test]
    fn test_reads_resolve_to_innermost_declaration() {
        let proc = Procedure::nullary(
            "f",
            Stmt::block([
                Stmt::decl("x", 1),
                Stmt::block([Stmt::decl("x", 2), Stmt::ret_value(Expr::name("x"))]),
            ]),
        );
        let cfg = fixtures::cfg_of(&proc);
        let ret = NodeId::new(2);
        let inner = Definition::at("x", NodeId::new(1));

        let scoped = fixtures::reaching(&cfg, AnalysisConfig::sequential());
        assert_eq!(scoped.get(ret).len(), 2);
        assert_eq!(scoped.definitions_of(ret, "x").collect::<Vec<_>>(), vec![&inner]);
        assert_eq!(scoped.unique_definition(ret, "x"), Some(&inner));

        let by_name = fixtures::reaching(&cfg, AnalysisConfig::compatible());
        assert_eq!(by_name.get(ret).len(), 1);
        assert_eq!(by_name.unique_definition(ret, "x"), Some(&inner));
    }

    #[test]
    fn test_outer_read_after_block_ignores_inner_declaration() {
        let proc = fixtures::shadowing_with_dead_code();
        let cfg = fixtures::cfg_of(&proc);
        let ret = NodeId::new(3);

        let rd = fixtures::reaching(&cfg, AnalysisConfig::sequential());
        assert_eq!(rd.get(ret).len(), 2);
        assert_eq!(
            rd.unique_definition(ret, "x"),
            Some(&Definition::at("x", NodeId::new(0)))
        );
        assert_eq!(rd.definitions_of(ret, "y").count(), 0);
    }

    #[test]
    fn test_analysis_is_idempotent() {
        let proc = fixtures::counting_loop();
        let first_cfg = fixtures::cfg_of(&proc);
        let second_cfg = fixtures::cfg_of(&proc);
        let first = fixtures::reaching(&first_cfg, AnalysisConfig::sequential());
        let second = fixtures::reaching(&second_cfg, AnalysisConfig::sequential());

        assert_eq!(first.entry, second.entry);
        assert_eq!(first.exit, second.exit);
        assert_eq!(first.universe, second.universe);
        assert_eq!(first.variables, second.variables);
    }
}
