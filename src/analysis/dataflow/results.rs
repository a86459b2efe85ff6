//! Queryable reaching-definition results.

use std::{collections::BTreeSet, fmt, sync::Arc};

use crate::{
    analysis::cfg::{Scopes, VariableId},
    config::VariableIdentity,
    utils::{graph::NodeId, BitSet},
};

/// A definition of a variable: its name plus the node that wrote it.
///
/// `origin` is `None` for the implicit definition a formal parameter receives on
/// entry. Definitions compare by `(name, origin)`, so two definitions of the same
/// name from different statements are distinct and can reach a node together.
///
/// ```rust
/// use defscope::{analysis::Definition, utils::graph::NodeId};
///
/// let param = Definition::parameter("a");
/// let local = Definition::at("a", NodeId::new(2));
/// assert_ne!(param, local);
/// assert!(param.is_parameter());
/// assert_eq!(local.to_string(), "a@n2");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Definition {
    /// Variable name.
    pub name: String,
    /// Defining node, or `None` for a formal parameter.
    pub origin: Option<NodeId>,
}

impl Definition {
    /// The entry definition of a formal parameter.
    pub fn parameter(name: impl Into<String>) -> Self {
        Definition {
            name: name.into(),
            origin: None,
        }
    }

    /// A definition written by `node`.
    pub fn at(name: impl Into<String>, node: NodeId) -> Self {
        Definition {
            name: name.into(),
            origin: Some(node),
        }
    }

    /// Returns `true` for parameter definitions.
    #[must_use]
    pub fn is_parameter(&self) -> bool {
        self.origin.is_none()
    }
}

impl fmt::Display for Definition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.origin {
            Some(node) => write!(f, "{}@{node}", self.name),
            None => write!(f, "{}@param", self.name),
        }
    }
}

/// A borrowed view of one reaching set.
#[derive(Clone, Copy)]
pub struct ReachingSet<'r> {
    bits: &'r BitSet,
    universe: &'r [Definition],
}

impl<'r> ReachingSet<'r> {
    /// Number of definitions in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bits.count()
    }

    /// Returns `true` if no definition reaches.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Definitions in the set, parameters first and then in node order.
    pub fn iter(&self) -> impl Iterator<Item = &'r Definition> + 'r {
        let (bits, universe) = (self.bits, self.universe);
        bits.iter().filter_map(move |index| universe.get(index))
    }

    /// Returns `true` if `definition` is in the set.
    #[must_use]
    pub fn contains(&self, definition: &Definition) -> bool {
        self.iter().any(|d| d == definition)
    }

    /// Returns `true` if the entry definition of parameter `name` is in the set.
    #[must_use]
    pub fn contains_parameter(&self, name: &str) -> bool {
        self.iter().any(|d| d.is_parameter() && d.name == name)
    }

    /// Returns `true` if the definition of `name` written by `node` is in the set.
    #[must_use]
    pub fn contains_origin(&self, name: &str, node: NodeId) -> bool {
        self.iter().any(|d| d.origin == Some(node) && d.name == name)
    }

    /// Copies the set out.
    #[must_use]
    pub fn to_set(&self) -> BTreeSet<Definition> {
        self.iter().cloned().collect()
    }
}

impl fmt::Debug for ReachingSet<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<'r> IntoIterator for ReachingSet<'r> {
    type Item = &'r Definition;
    type IntoIter = Box<dyn Iterator<Item = &'r Definition> + 'r>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

/// Reaching definitions of one procedure.
///
/// Owns its sets and does not borrow the control-flow graph it was computed
/// from. Nodes are the graph's [`NodeId`]s; any handle the graph does not know
/// maps to an empty set.
#[derive(Debug, Clone)]
pub struct ReachingDefinitions {
    pub(crate) procedure: String,
    pub(crate) universe: Vec<Definition>,
    /// Variable written by each universe entry.
    pub(crate) variables: Vec<VariableId>,
    pub(crate) entry: Vec<BitSet>,
    pub(crate) exit: Vec<BitSet>,
    pub(crate) empty: BitSet,
    pub(crate) iterations: usize,
    pub(crate) identity: VariableIdentity,
    /// Scope tree of the analyzed graph, for resolving reads.
    pub(crate) scopes: Arc<Scopes>,
}

/// Which definitions a read of a name at some node can observe.
#[derive(Clone, Copy)]
enum Visible {
    /// Any definition with that name.
    ByName,
    /// Definitions of one resolved variable.
    Variable(VariableId),
    /// The name is not bound there.
    Nothing,
}

impl ReachingDefinitions {
    /// Definitions reaching the entry of `node`.
    #[must_use]
    pub fn get(&self, node: NodeId) -> ReachingSet<'_> {
        self.view(self.entry.get(node.index()))
    }

    /// Definitions reaching the exit of `node`.
    #[must_use]
    pub fn exit(&self, node: NodeId) -> ReachingSet<'_> {
        self.view(self.exit.get(node.index()))
    }

    /// Every definition in the procedure: parameters in parameter order, then
    /// one per defining node in node order.
    #[must_use]
    pub fn definitions(&self) -> &[Definition] {
        &self.universe
    }

    /// Definitions that a read of `name` at `node` may observe.
    ///
    /// With [`VariableIdentity::Scoped`] the read is resolved the way the tree
    /// scopes it, so definitions of a shadowed outer variable are left out even
    /// though they still reach. With [`VariableIdentity::Name`] every reaching
    /// definition of that name is returned.
    pub fn definitions_of<'r, 'n>(
        &'r self,
        node: NodeId,
        name: &'n str,
    ) -> impl Iterator<Item = &'r Definition> + 'n
    where
        'r: 'n,
    {
        let visible = self.visible(node, name);
        let bits = self.entry.get(node.index()).unwrap_or(&self.empty);
        bits.iter()
            .filter(move |&index| match visible {
                Visible::ByName => self.universe.get(index).is_some_and(|d| d.name == name),
                Visible::Variable(variable) => self.variables.get(index) == Some(&variable),
                Visible::Nothing => false,
            })
            .filter_map(move |index| self.universe.get(index))
    }

    /// Definitions of the resolved variable `variable` reaching the entry of `node`.
    pub fn definitions_of_variable(
        &self,
        node: NodeId,
        variable: VariableId,
    ) -> impl Iterator<Item = &Definition> + '_ {
        let bits = self.entry.get(node.index()).unwrap_or(&self.empty);
        bits.iter()
            .filter(move |&index| self.variables.get(index) == Some(&variable))
            .filter_map(move |index| self.universe.get(index))
    }

    /// The single definition a read of `name` at `node` may observe, if there
    /// is exactly one.
    ///
    /// This is the question constant propagation asks before replacing a read.
    #[must_use]
    pub fn unique_definition(&self, node: NodeId, name: &str) -> Option<&Definition> {
        let mut matches = self.definitions_of(node, name);
        let first = matches.next()?;
        match matches.next() {
            Some(_) => None,
            None => Some(first),
        }
    }

    /// Number of transfer evaluations the solve took.
    #[must_use]
    pub const fn iterations(&self) -> usize {
        self.iterations
    }

    /// Name of the analyzed procedure.
    #[must_use]
    pub fn procedure(&self) -> &str {
        &self.procedure
    }

    /// Number of nodes covered.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.entry.len()
    }

    fn visible(&self, node: NodeId, name: &str) -> Visible {
        match self.identity {
            VariableIdentity::Name => Visible::ByName,
            VariableIdentity::Scoped => match self.scopes.resolve(node, name) {
                Some(variable) => Visible::Variable(variable),
                None => Visible::Nothing,
            },
        }
    }

    fn view<'r>(&'r self, bits: Option<&'r BitSet>) -> ReachingSet<'r> {
        ReachingSet {
            bits: bits.unwrap_or(&self.empty),
            universe: &self.universe,
        }
    }
}
