use super::{NodeState, Pin};
use crate::error::NodeError;
use crate::platform::Platform;
use crate::result::ExecuteResult;
use crate::value::{EnumChoice, Handle, ImageBuffer, Point, Rect, Size, Value, ValueType};
use std::fmt;

/// Identifies a node; unique within one [`Graph`](super::Graph).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u64);

impl NodeId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// The computation behind one node kind.
///
/// Implementations read resolved inputs and stage outputs through the
/// [`ExecuteContext`]. Domain failures are returned as `Err`; the node turns
/// them into an [`ExecuteResult`] naming itself. Staged outputs are only
/// committed when `execute` returns `Ok`.
pub trait NodeBehavior {
    fn execute(&mut self, ctx: &mut ExecuteContext<'_>) -> Result<(), NodeError>;
}

impl<F> NodeBehavior for F
where
    F: FnMut(&mut ExecuteContext<'_>) -> Result<(), NodeError>,
{
    fn execute(&mut self, ctx: &mut ExecuteContext<'_>) -> Result<(), NodeError> {
        self(ctx)
    }
}

/// A unit of computation living in a graph.
pub struct Node {
    pub(crate) id: NodeId,
    pub(crate) name: String,
    pub(crate) kind: String,
    pub(crate) inputs: Vec<Pin>,
    pub(crate) outputs: Vec<Pin>,
    pub(crate) state: NodeState,
    pub(crate) behavior: Box<dyn NodeBehavior>,
    pub(crate) last_result: Option<ExecuteResult>,
}

impl Node {
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The display name shown in the editor.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// The registry kind this node was spawned from.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn inputs(&self) -> &[Pin] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[Pin] {
        &self.outputs
    }

    pub fn input(&self, index: usize) -> Option<&Pin> {
        self.inputs.get(index)
    }

    pub fn output(&self, index: usize) -> Option<&Pin> {
        self.outputs.get(index)
    }

    pub fn find_input(&self, label: &str) -> Option<&Pin> {
        self.inputs.iter().find(|p| p.label() == label)
    }

    pub fn find_output(&self, label: &str) -> Option<&Pin> {
        self.outputs.iter().find(|p| p.label() == label)
    }

    pub fn state(&self) -> &NodeState {
        &self.state
    }

    /// The outcome of the most recent pass that reached this node.
    pub fn last_result(&self) -> Option<&ExecuteResult> {
        self.last_result.as_ref()
    }

    /// Runs the behavior against the already-resolved inputs.
    ///
    /// Always returns a result: behavior errors become an error attributed to
    /// this node, and outputs keep their previous values on failure.
    pub(crate) fn execute(&mut self, platform: &Platform) -> ExecuteResult {
        let mut ctx = ExecuteContext {
            node: self.id,
            inputs: &self.inputs,
            outputs: &self.outputs,
            staged: vec![None; self.outputs.len()],
            state: &mut self.state,
            platform,
        };
        let outcome = self.behavior.execute(&mut ctx);
        let staged = ctx.staged;

        let result = match outcome {
            Ok(()) => {
                for (pin, value) in self.outputs.iter_mut().zip(staged) {
                    if let Some(value) = value {
                        pin.set_value(value);
                    }
                }
                ExecuteResult::Ok
            }
            Err(err) => ExecuteResult::error_node(self.id, err.to_string()),
        };
        self.last_result = Some(result.clone());
        result
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("inputs", &self.inputs)
            .field("outputs", &self.outputs)
            .field("state", &self.state)
            .field("last_result", &self.last_result)
            .finish_non_exhaustive()
    }
}

/// What a behavior sees while executing: its inputs, its outputs, its state
/// and the platform capabilities.
pub struct ExecuteContext<'a> {
    node: NodeId,
    inputs: &'a [Pin],
    outputs: &'a [Pin],
    staged: Vec<Option<Value>>,
    state: &'a mut NodeState,
    platform: &'a Platform,
}

impl<'a> ExecuteContext<'a> {
    pub fn node_id(&self) -> NodeId {
        self.node
    }

    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    pub fn output_count(&self) -> usize {
        self.outputs.len()
    }

    /// The resolved value of input `index`.
    ///
    /// # Panics
    ///
    /// Panics if the node declares no such input.
    pub fn input(&self, index: usize) -> &'a Value {
        match self.inputs.get(index) {
            Some(pin) => pin.value(),
            None => panic!(
                "{} has {} inputs, index {} requested",
                self.node,
                self.inputs.len(),
                index
            ),
        }
    }

    pub fn bool(&self, index: usize) -> Result<bool, NodeError> {
        self.typed(index, ValueType::Bool, Value::as_bool)
    }

    pub fn int(&self, index: usize) -> Result<i64, NodeError> {
        self.typed(index, ValueType::Int, Value::as_int)
    }

    pub fn string(&self, index: usize) -> Result<&'a str, NodeError> {
        let value = self.input(index);
        value.as_str().ok_or(NodeError::InputType {
            index,
            expected: ValueType::String,
            found: value.value_type(),
        })
    }

    pub fn choice(&self, index: usize) -> Result<&'a EnumChoice, NodeError> {
        let value = self.input(index);
        value.as_enum().ok_or(NodeError::InputType {
            index,
            expected: ValueType::Enum,
            found: value.value_type(),
        })
    }

    pub fn point(&self, index: usize) -> Result<Point, NodeError> {
        self.typed(index, ValueType::Point, Value::as_point)
    }

    pub fn size(&self, index: usize) -> Result<Size, NodeError> {
        self.typed(index, ValueType::Size, Value::as_size)
    }

    pub fn rect(&self, index: usize) -> Result<Rect, NodeError> {
        self.typed(index, ValueType::Rect, Value::as_rect)
    }

    pub fn image(&self, index: usize) -> Result<&'a ImageBuffer, NodeError> {
        let value = self.input(index);
        value.as_image().ok_or(NodeError::InputType {
            index,
            expected: ValueType::Image,
            found: value.value_type(),
        })
    }

    pub fn handle(&self, index: usize) -> Result<Handle, NodeError> {
        self.typed(index, ValueType::Handle, Value::as_handle)
    }

    /// Stages `value` for output `index`; it is written once execution succeeds.
    ///
    /// # Panics
    ///
    /// Panics if the output does not exist or is declared with another type.
    pub fn set_output(&mut self, index: usize, value: impl Into<Value>) {
        let value = value.into();
        let Some(pin) = self.outputs.get(index) else {
            panic!(
                "{} has {} outputs, index {} written",
                self.node,
                self.outputs.len(),
                index
            );
        };
        assert_eq!(
            value.value_type(),
            pin.value_type(),
            "{} output '{}' is declared {} but was assigned a {} value",
            self.node,
            pin.label(),
            pin.value_type(),
            value.value_type()
        );
        self.staged[index] = Some(value);
    }

    /// The node's persistent state.
    pub fn state(&mut self) -> &mut NodeState {
        &mut *self.state
    }

    pub fn platform(&self) -> &'a Platform {
        self.platform
    }

    fn typed<T>(
        &self,
        index: usize,
        expected: ValueType,
        read: impl FnOnce(&Value) -> Option<T>,
    ) -> Result<T, NodeError> {
        let value = self.input(index);
        read(value).ok_or(NodeError::InputType {
            index,
            expected,
            found: value.value_type(),
        })
    }
}
