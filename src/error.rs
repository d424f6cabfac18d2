use crate::graph::{NodeId, PinId};
use crate::value::{Handle, ValueType};
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by editor-driven graph mutations (spawning, wiring).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("no node factory is registered for kind '{0}'")]
    UnknownKind(String),

    #[error("node {0} is not part of this graph")]
    NodeNotFound(NodeId),

    #[error("pin {0} is not part of this graph")]
    PinNotFound(PinId),

    #[error("pin {pin} cannot be used as {expected} end of a connection")]
    RoleMismatch { pin: PinId, expected: &'static str },

    #[error(
        "cannot connect {output} ({output_type}) to {input} ({input_type}): declared types differ"
    )]
    TypeMismatch {
        output: PinId,
        output_type: ValueType,
        input: PinId,
        input_type: ValueType,
    },
}

/// Domain failures reported by a node while executing.
///
/// These never escape the node: `Node::execute` turns them into an
/// `ExecuteResult` attributed to the failing node.
#[derive(Error, Debug)]
pub enum NodeError {
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unsupported image format: {0}")]
    Decode(#[from] image::ImageError),

    #[error("input {index} expected a {expected} value but held {found}")]
    InputType {
        index: usize,
        expected: ValueType,
        found: ValueType,
    },

    #[error("window not found: {0}")]
    WindowNotFound(String),

    #[error("buffer size mismatch: needed {expected} bytes, found {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("{name} is out of range: {value}")]
    OutOfRange { name: &'static str, value: i64 },

    #[error("region {region} lies outside the {width}x{height} image")]
    OutOfBounds {
        region: crate::value::Rect,
        width: u32,
        height: u32,
    },

    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error(transparent)]
    Image(#[from] ImageBufferError),

    #[error("{0}")]
    Custom(String),
}

/// Errors returned by platform capability calls.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlatformError {
    #[error("operation '{0}' is not supported on this platform")]
    Unsupported(&'static str),

    #[error("window handle {0} is no longer valid")]
    InvalidHandle(Handle),

    #[error("platform call '{call}' failed with error code {code}")]
    Os { call: &'static str, code: u32 },

    #[error("capture failed: {0}")]
    Capture(String),

    #[error("pixel buffer is empty")]
    EmptyBuffer,
}

/// Errors from explicit conversions between value tags.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    #[error("cannot convert {from} to {to}")]
    Unsupported { from: ValueType, to: ValueType },

    #[error("cannot parse '{text}' as {to}")]
    Parse { text: String, to: ValueType },

    #[error("{value} does not fit into {to}")]
    Overflow { value: i64, to: &'static str },

    #[error("enum choice has no label '{0}'")]
    UnknownLabel(String),

    #[error("literal {found} does not describe a {expected} value")]
    Literal { expected: ValueType, found: String },
}

/// Errors raised when assembling an image buffer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageBufferError {
    #[error(
        "pixel buffer holds {actual} bytes but a {width}x{height}x{channels} image needs {expected}"
    )]
    SizeMismatch {
        width: u32,
        height: u32,
        channels: u8,
        expected: usize,
        actual: usize,
    },

    #[error("unsupported channel count {0}, expected 1 to 4")]
    Channels(u8),

    #[error("a {width}x{height}x{channels} image is too large to address")]
    TooLarge { width: u32, height: u32, channels: u8 },
}

/// Errors that can occur when building a graph from a blueprint document.
#[derive(Error, Debug)]
pub enum BlueprintError {
    #[error("failed to parse blueprint JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read blueprint: {0}")]
    Io(#[from] std::io::Error),

    #[error("node '{node_id}' has an unregistered kind: '{kind}'")]
    UnknownKind { node_id: String, kind: String },

    #[error("node id '{0}' is declared more than once")]
    DuplicateNode(String),

    #[error("node '{missing_node_id}' not found, which is referenced by {referenced_by}")]
    NodeNotFound {
        missing_node_id: String,
        referenced_by: String,
    },

    #[error("node '{node_id}' has no pin '{pin}'")]
    PinNotFound { node_id: String, pin: String },

    #[error("invalid literal for '{node_id}.{pin}': {source}")]
    Literal {
        node_id: String,
        pin: String,
        source: ConversionError,
    },

    #[error("cannot link '{source_pin}' to '{target_pin}': {source}")]
    Connection {
        source_pin: String,
        target_pin: String,
        source: GraphError,
    },

    #[error("invalid blueprint: {0}")]
    Validation(String),
}
