//! Node factories keyed by kind name.

use crate::graph::{NodeBehavior, NodeState};
use crate::nodes;
use crate::value::{Value, ValueType};
use ahash::AHashMap;
use itertools::Itertools;

/// Defines the contract for creating nodes of one kind.
///
/// `spawn` declares the node's pins on the [`NodeBuilder`] and returns the
/// behavior that will execute it. The graph allocates ids and stores the node.
pub trait NodeFactory {
    fn kind(&self) -> &str;

    /// The name a freshly spawned node is displayed under.
    fn display_name(&self) -> &str {
        self.kind()
    }

    /// The palette section this kind is listed in.
    fn category(&self) -> &str {
        "General"
    }

    fn spawn(&self, builder: &mut NodeBuilder) -> Box<dyn NodeBehavior>;
}

/// Collects the pin declarations of a node being spawned.
pub struct NodeBuilder {
    name: String,
    inputs: Vec<(String, Value)>,
    outputs: Vec<(String, ValueType)>,
    state: NodeState,
}

impl NodeBuilder {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            state: NodeState::Empty,
        }
    }

    /// Overrides the display name.
    pub fn name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = name.into();
        self
    }

    /// Declares the next input; its type is the type of `default`.
    pub fn input(&mut self, label: impl Into<String>, default: impl Into<Value>) -> &mut Self {
        self.inputs.push((label.into(), default.into()));
        self
    }

    /// Declares the next output.
    pub fn output(&mut self, label: impl Into<String>, value_type: ValueType) -> &mut Self {
        self.outputs.push((label.into(), value_type));
        self
    }

    /// Sets the state the node starts with. Most nodes create state lazily instead.
    pub fn state(&mut self, state: NodeState) -> &mut Self {
        self.state = state;
        self
    }

    pub(crate) fn finish(
        self,
    ) -> (
        String,
        Vec<(String, Value)>,
        Vec<(String, ValueType)>,
        NodeState,
    ) {
        (self.name, self.inputs, self.outputs, self.state)
    }
}

/// One palette entry, as listed for the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteEntry {
    pub kind: String,
    pub display_name: String,
    pub category: String,
}

/// Maps kind names to factories.
///
/// Built once at start-up and passed by reference to whatever spawns nodes.
#[derive(Default)]
pub struct NodeRegistry {
    factories: AHashMap<String, Box<dyn NodeFactory>>,
    aliases: AHashMap<String, String>,
    order: Vec<String>,
}

impl NodeRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in node kind.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        nodes::register_builtin_nodes(&mut registry);
        registry
    }

    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Adds or replaces the factory for its kind.
    pub fn register(&mut self, factory: Box<dyn NodeFactory>) {
        let kind = factory.kind().to_string();
        if self.factories.insert(kind.clone(), factory).is_none() {
            self.order.push(kind);
        }
    }

    /// Makes `alias` resolve to the factory registered under `kind`.
    pub fn alias(&mut self, alias: impl Into<String>, kind: impl Into<String>) {
        self.aliases.insert(alias.into(), kind.into());
    }

    pub fn get(&self, kind: &str) -> Option<&dyn NodeFactory> {
        let kind = self.aliases.get(kind).map(String::as_str).unwrap_or(kind);
        self.factories.get(kind).map(|f| f.as_ref())
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.get(kind).is_some()
    }

    /// Kinds in registration order.
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Entries grouped by category, categories sorted by name, kinds kept in
    /// registration order within each category.
    pub fn palette(&self) -> Vec<(String, Vec<PaletteEntry>)> {
        self.order
            .iter()
            .filter_map(|kind| self.factories.get(kind))
            .map(|factory| PaletteEntry {
                kind: factory.kind().to_string(),
                display_name: factory.display_name().to_string(),
                category: factory.category().to_string(),
            })
            .into_group_map_by(|entry| entry.category.clone())
            .into_iter()
            .sorted_by(|(a, _), (b, _)| a.cmp(b))
            .collect()
    }
}

/// Builder for a customised [`NodeRegistry`].
pub struct RegistryBuilder {
    registry: NodeRegistry,
}

impl RegistryBuilder {
    /// Starts from the built-in node kinds.
    pub fn new() -> Self {
        Self {
            registry: NodeRegistry::with_defaults(),
        }
    }

    /// Starts from an empty registry.
    pub fn empty() -> Self {
        Self {
            registry: NodeRegistry::new(),
        }
    }

    pub fn with_factory(mut self, factory: Box<dyn NodeFactory>) -> Self {
        self.registry.register(factory);
        self
    }

    /// Lets documents refer to a built-in kind by another name.
    pub fn with_alias(mut self, alias: &str, kind: &str) -> Self {
        if self.registry.contains(kind) {
            self.registry.alias(alias, kind);
        } else if let Some(factory) = nodes::create_factory_by_name(kind) {
            self.registry.register(factory);
            self.registry.alias(alias, kind);
        }
        self
    }

    pub fn build(self) -> NodeRegistry {
        self.registry
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
