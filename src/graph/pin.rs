use super::NodeId;
use crate::value::{Value, ValueType};
use std::fmt;

/// Identifies a pin; unique within one [`Graph`](super::Graph).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PinId(pub(crate) u64);

impl PinId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pin#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PinRole {
    Input,
    Output,
}

impl fmt::Display for PinRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PinRole::Input => f.write_str("input"),
            PinRole::Output => f.write_str("output"),
        }
    }
}

/// A named, typed slot on a node.
///
/// Inputs carry a `literal` (the editor-supplied default used when the pin is
/// unconnected) and a live `value` (whatever was resolved during the last
/// pass). Outputs only use `value`, the last successfully computed result.
#[derive(Debug, Clone)]
pub struct Pin {
    id: PinId,
    node: NodeId,
    label: String,
    value_type: ValueType,
    role: PinRole,
    literal: Value,
    value: Value,
    link: Option<PinId>,
}

impl Pin {
    pub(crate) fn input(id: PinId, node: NodeId, label: String, literal: Value) -> Self {
        Self {
            id,
            node,
            label,
            value_type: literal.value_type(),
            role: PinRole::Input,
            value: literal.clone(),
            literal,
            link: None,
        }
    }

    pub(crate) fn output(id: PinId, node: NodeId, label: String, value_type: ValueType) -> Self {
        let value = Value::default_for(value_type);
        Self {
            id,
            node,
            label,
            value_type,
            role: PinRole::Output,
            literal: value.clone(),
            value,
            link: None,
        }
    }

    pub fn id(&self) -> PinId {
        self.id
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    pub fn role(&self) -> PinRole {
        self.role
    }

    /// The live value: last resolved input, or last computed output.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// The editor-supplied value used while the input is unconnected.
    pub fn literal(&self) -> &Value {
        &self.literal
    }

    /// The output this input is wired to, if any.
    pub fn link(&self) -> Option<PinId> {
        self.link
    }

    pub fn is_connected(&self) -> bool {
        self.link.is_some()
    }

    /// Stores a new live value.
    ///
    /// # Panics
    ///
    /// Panics if `value` is not of the pin's declared type.
    pub fn set_value(&mut self, value: Value) {
        self.assert_type(&value);
        self.value = value;
    }

    /// Replaces the literal of an input pin.
    ///
    /// # Panics
    ///
    /// Panics on output pins and on values of the wrong type.
    pub fn set_literal(&mut self, value: Value) {
        assert!(
            self.role == PinRole::Input,
            "{} '{}' is an output; only inputs hold literals",
            self.id,
            self.label
        );
        self.assert_type(&value);
        self.literal = value;
    }

    pub(crate) fn set_link(&mut self, link: Option<PinId>) -> Option<PinId> {
        std::mem::replace(&mut self.link, link)
    }

    fn assert_type(&self, value: &Value) {
        assert_eq!(
            value.value_type(),
            self.value_type,
            "{} '{}' is declared {} but was assigned a {} value",
            self.id,
            self.label,
            self.value_type,
            value.value_type()
        );
    }
}
