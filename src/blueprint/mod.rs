//! Blueprint documents: a JSON description of a graph that tools can load.

pub mod conversion;
pub mod definition;

pub use conversion::*;
pub use definition::*;

use conversion::literal_from_json;
use crate::error::BlueprintError;
use crate::graph::{Graph, NodeId, Pin, PinId, PinRole};
use crate::registry::NodeRegistry;
use ahash::AHashMap;
use itertools::Itertools;
use std::fs;
use std::path::Path;

impl BlueprintDefinition {
    pub fn from_json(json: &str) -> Result<Self, BlueprintError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, BlueprintError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn to_json(&self) -> Result<String, BlueprintError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Spawns every node, applies literals and wires links.
    ///
    /// Nodes are spawned in document order; literals are applied in label
    /// order so that the first reported error is stable.
    pub fn build(&self, registry: &NodeRegistry) -> Result<LoadedBlueprint, BlueprintError> {
        let mut graph = Graph::new();
        let mut nodes: AHashMap<String, NodeId> = AHashMap::with_capacity(self.nodes.len());

        for definition in &self.nodes {
            if nodes.contains_key(&definition.id) {
                return Err(BlueprintError::DuplicateNode(definition.id.clone()));
            }
            let id = graph
                .spawn(registry, &definition.kind)
                .map_err(|_| BlueprintError::UnknownKind {
                    node_id: definition.id.clone(),
                    kind: definition.kind.clone(),
                })?;
            if let (Some(name), Some(node)) = (&definition.name, graph.node_mut(id)) {
                node.set_name(name.clone());
            }

            for (label, json) in definition
                .literals
                .iter()
                .sorted_by(|(a, _), (b, _)| a.cmp(b))
            {
                let pin = resolve_pin(&graph, id, label, PinRole::Input).ok_or_else(|| {
                    BlueprintError::PinNotFound {
                        node_id: definition.id.clone(),
                        pin: label.clone(),
                    }
                })?;
                let value = literal_from_json(json, graph[pin].literal()).map_err(|source| {
                    BlueprintError::Literal {
                        node_id: definition.id.clone(),
                        pin: label.clone(),
                        source,
                    }
                })?;
                graph.set_literal(pin, value);
            }
            nodes.insert(definition.id.clone(), id);
        }

        for link in &self.links {
            let source_pin = format!("{}.{}", link.source, link.source_pin);
            let target_pin = format!("{}.{}", link.target, link.target_pin);
            let lookup = |node_id: &str| {
                nodes
                    .get(node_id)
                    .copied()
                    .ok_or_else(|| BlueprintError::NodeNotFound {
                        missing_node_id: node_id.to_string(),
                        referenced_by: format!("link {} -> {}", source_pin, target_pin),
                    })
            };
            let source = lookup(&link.source)?;
            let target = lookup(&link.target)?;

            let output = resolve_pin(&graph, source, &link.source_pin, PinRole::Output)
                .ok_or_else(|| BlueprintError::PinNotFound {
                    node_id: link.source.clone(),
                    pin: link.source_pin.clone(),
                })?;
            let input = resolve_pin(&graph, target, &link.target_pin, PinRole::Input)
                .ok_or_else(|| BlueprintError::PinNotFound {
                    node_id: link.target.clone(),
                    pin: link.target_pin.clone(),
                })?;

            graph
                .connect(output, input)
                .map_err(|source| BlueprintError::Connection {
                    source_pin: source_pin.clone(),
                    target_pin: target_pin.clone(),
                    source,
                })?;
        }

        tracing::debug!(
            nodes = graph.len(),
            links = self.links.len(),
            "built graph from blueprint"
        );
        Ok(LoadedBlueprint { graph, nodes })
    }
}

/// Builds a graph from anything convertible into a blueprint.
pub fn load_blueprint(
    source: impl IntoBlueprint,
    registry: &NodeRegistry,
) -> Result<LoadedBlueprint, BlueprintError> {
    source.into_blueprint()?.build(registry)
}

/// Finds a pin by label, falling back to a positional `"input-N"` /
/// `"output-N"` handle.
fn resolve_pin(graph: &Graph, node: NodeId, reference: &str, role: PinRole) -> Option<PinId> {
    let node = graph.node(node)?;
    let (pins, prefix) = match role {
        PinRole::Input => (node.inputs(), "input-"),
        PinRole::Output => (node.outputs(), "output-"),
    };
    pins.iter()
        .find(|pin| pin.label() == reference)
        .or_else(|| {
            let index = reference.strip_prefix(prefix)?.parse::<usize>().ok()?;
            pins.get(index)
        })
        .map(Pin::id)
}

/// A graph built from a blueprint, with the document ids of its nodes.
#[derive(Debug)]
pub struct LoadedBlueprint {
    pub graph: Graph,
    pub nodes: AHashMap<String, NodeId>,
}

impl LoadedBlueprint {
    pub fn node(&self, id: &str) -> Option<NodeId> {
        self.nodes.get(id).copied()
    }

    /// Resolves `"node.pin"`, trying outputs before inputs.
    pub fn pin(&self, reference: &str) -> Result<PinId, BlueprintError> {
        let (node_id, pin) = reference.rsplit_once('.').ok_or_else(|| {
            BlueprintError::Validation(format!(
                "pin reference '{}' must look like 'node.pin'",
                reference
            ))
        })?;
        let node = self
            .node(node_id)
            .ok_or_else(|| BlueprintError::NodeNotFound {
                missing_node_id: node_id.to_string(),
                referenced_by: format!("pin reference '{}'", reference),
            })?;
        resolve_pin(&self.graph, node, pin, PinRole::Output)
            .or_else(|| resolve_pin(&self.graph, node, pin, PinRole::Input))
            .ok_or_else(|| BlueprintError::PinNotFound {
                node_id: node_id.to_string(),
                pin: pin.to_string(),
            })
    }

    /// Every output of nodes whose outputs feed nothing, in spawn order.
    pub fn terminal_outputs(&self) -> Vec<PinId> {
        self.graph
            .nodes()
            .filter(|node| {
                node.outputs()
                    .iter()
                    .all(|pin| self.graph.consumers(pin.id()).is_empty())
            })
            .flat_map(|node| node.outputs().iter().map(Pin::id))
            .collect()
    }

    pub fn into_graph(self) -> Graph {
        self.graph
    }
}
