//! The node graph: nodes, their pins, and the links between them.

use crate::error::GraphError;
use crate::registry::{NodeBuilder, NodeFactory, NodeRegistry};
use crate::value::Value;
use ahash::AHashMap;
use std::ops::Index;

mod node;
mod pin;
mod state;

pub use node::{ExecuteContext, Node, NodeBehavior, NodeId};
pub use pin::{Pin, PinId, PinRole};
pub use state::{CaptureSession, NodeState};

/// Where a pin lives inside the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PinSlot {
    node: NodeId,
    role: PinRole,
    index: usize,
}

/// An output-to-input edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Connection {
    pub from: PinId,
    pub to: PinId,
}

/// Owns every node and tracks which outputs feed which inputs.
///
/// Links are stored on the input pins themselves; the graph keeps indexes so
/// that node and pin lookups stay O(1). Nodes are kept in spawn order.
#[derive(Debug, Default)]
pub struct Graph {
    nodes: Vec<Node>,
    node_index: AHashMap<NodeId, usize>,
    pin_index: AHashMap<PinId, PinSlot>,
    next_id: u64,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Spawns a node of `kind` using the factory registered under that name.
    pub fn spawn(&mut self, registry: &NodeRegistry, kind: &str) -> Result<NodeId, GraphError> {
        let factory = registry
            .get(kind)
            .ok_or_else(|| GraphError::UnknownKind(kind.to_string()))?;
        Ok(self.add_node(factory))
    }

    /// Spawns a node directly from a factory.
    pub fn add_node(&mut self, factory: &dyn NodeFactory) -> NodeId {
        let mut builder = NodeBuilder::new(factory.display_name());
        let behavior = factory.spawn(&mut builder);
        let (name, inputs, outputs, state) = builder.finish();

        let id = NodeId(self.allocate_id());
        let inputs: Vec<Pin> = inputs
            .into_iter()
            .map(|(label, literal)| Pin::input(PinId(self.allocate_id()), id, label, literal))
            .collect();
        let outputs: Vec<Pin> = outputs
            .into_iter()
            .map(|(label, ty)| Pin::output(PinId(self.allocate_id()), id, label, ty))
            .collect();

        for (index, pin) in inputs.iter().enumerate() {
            self.pin_index.insert(
                pin.id(),
                PinSlot {
                    node: id,
                    role: PinRole::Input,
                    index,
                },
            );
        }
        for (index, pin) in outputs.iter().enumerate() {
            self.pin_index.insert(
                pin.id(),
                PinSlot {
                    node: id,
                    role: PinRole::Output,
                    index,
                },
            );
        }

        tracing::debug!(
            node = %id,
            kind = factory.kind(),
            inputs = inputs.len(),
            outputs = outputs.len(),
            "spawned node"
        );

        self.node_index.insert(id, self.nodes.len());
        self.nodes.push(Node {
            id,
            name,
            kind: factory.kind().to_string(),
            inputs,
            outputs,
            state,
            behavior,
            last_result: None,
        });
        id
    }

    /// Removes a node, unlinking every input it fed and dropping its state.
    ///
    /// Returns `false` if the node was not part of the graph.
    pub fn remove_node(&mut self, id: NodeId) -> bool {
        let Some(position) = self.node_index.remove(&id) else {
            return false;
        };
        let node = self.nodes.remove(position);

        for pin in node.inputs.iter().chain(node.outputs.iter()) {
            self.pin_index.remove(&pin.id());
        }
        let removed_outputs: Vec<PinId> = node.outputs.iter().map(Pin::id).collect();
        for other in &mut self.nodes {
            for input in &mut other.inputs {
                if input.link().is_some_and(|src| removed_outputs.contains(&src)) {
                    input.set_link(None);
                }
            }
        }
        for (index, node) in self.nodes.iter().enumerate().skip(position) {
            self.node_index.insert(node.id, index);
        }

        tracing::debug!(node = %id, state = node.state.kind(), "removed node");
        drop(node);
        true
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.node_index.contains_key(&id)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.node_index.get(&id).map(|&i| &self.nodes[i])
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.node_index.get(&id).map(|&i| &mut self.nodes[i])
    }

    /// Nodes in spawn order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn pin(&self, id: PinId) -> Option<&Pin> {
        let slot = self.pin_index.get(&id)?;
        let node = self.node(slot.node)?;
        match slot.role {
            PinRole::Input => node.inputs.get(slot.index),
            PinRole::Output => node.outputs.get(slot.index),
        }
    }

    fn pin_mut(&mut self, id: PinId) -> Option<&mut Pin> {
        let slot = *self.pin_index.get(&id)?;
        let node = self.node_mut(slot.node)?;
        match slot.role {
            PinRole::Input => node.inputs.get_mut(slot.index),
            PinRole::Output => node.outputs.get_mut(slot.index),
        }
    }

    /// The id of input `index` on `node`.
    pub fn input_pin(&self, node: NodeId, index: usize) -> Option<PinId> {
        self.node(node)?.input(index).map(Pin::id)
    }

    /// The id of output `index` on `node`.
    pub fn output_pin(&self, node: NodeId, index: usize) -> Option<PinId> {
        self.node(node)?.output(index).map(Pin::id)
    }

    /// Looks a pin up by its label, inputs first.
    pub fn find_pin(&self, node: NodeId, label: &str) -> Option<PinId> {
        let node = self.node(node)?;
        node.find_input(label)
            .or_else(|| node.find_output(label))
            .map(Pin::id)
    }

    /// Wires `output` into `input`, replacing any existing link on `input`.
    ///
    /// Returns the output that was previously linked, if any.
    pub fn connect(&mut self, output: PinId, input: PinId) -> Result<Option<PinId>, GraphError> {
        let source = self.pin(output).ok_or(GraphError::PinNotFound(output))?;
        let target = self.pin(input).ok_or(GraphError::PinNotFound(input))?;

        if source.role() != PinRole::Output {
            return Err(GraphError::RoleMismatch {
                pin: output,
                expected: "output",
            });
        }
        if target.role() != PinRole::Input {
            return Err(GraphError::RoleMismatch {
                pin: input,
                expected: "input",
            });
        }
        if source.value_type() != target.value_type() {
            return Err(GraphError::TypeMismatch {
                output,
                output_type: source.value_type(),
                input,
                input_type: target.value_type(),
            });
        }

        tracing::debug!(%output, %input, "connected pins");
        let target = self.pin_mut(input).ok_or(GraphError::PinNotFound(input))?;
        Ok(target.set_link(Some(output)))
    }

    /// Removes the link feeding `input`, returning the output it came from.
    pub fn disconnect(&mut self, input: PinId) -> Option<PinId> {
        let pin = self.pin_mut(input)?;
        if pin.role() != PinRole::Input {
            return None;
        }
        pin.set_link(None)
    }

    /// Every link, ordered by consumer node and input position.
    pub fn connections(&self) -> impl Iterator<Item = Connection> + '_ {
        self.nodes.iter().flat_map(|node| {
            node.inputs.iter().filter_map(|pin| {
                pin.link().map(|from| Connection {
                    from,
                    to: pin.id(),
                })
            })
        })
    }

    /// The inputs fed by `output`.
    pub fn consumers(&self, output: PinId) -> Vec<PinId> {
        self.connections()
            .filter(|c| c.from == output)
            .map(|c| c.to)
            .collect()
    }

    /// Sets the literal of an unconnected-input slot, as the editor does.
    ///
    /// # Panics
    ///
    /// Panics if the pin does not exist, is an output, or `value` has the wrong type.
    pub fn set_literal(&mut self, input: PinId, value: impl Into<Value>) {
        match self.pin_mut(input) {
            Some(pin) => pin.set_literal(value.into()),
            None => panic!("{} is not part of this graph", input),
        }
    }

    /// Mutable access to a node's pins for the evaluator.
    pub(crate) fn node_at_mut(&mut self, id: NodeId) -> &mut Node {
        match self.node_index.get(&id) {
            Some(&i) => &mut self.nodes[i],
            None => panic!("{} is not part of this graph", id),
        }
    }

    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

impl Index<NodeId> for Graph {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        match self.node(id) {
            Some(node) => node,
            None => panic!("{} is not part of this graph", id),
        }
    }
}

impl Index<PinId> for Graph {
    type Output = Pin;

    fn index(&self, id: PinId) -> &Pin {
        match self.pin(id) {
            Some(pin) => pin,
            None => panic!("{} is not part of this graph", id),
        }
    }
}
