use crate::graph::NodeId;
use std::fmt;

/// Message carried by results produced for re-entered nodes.
pub const CYCLE_DETECTED: &str = "cycle detected";

/// Message carried by results produced when a chain exceeds the evaluator's depth limit.
pub const DEPTH_LIMIT_EXCEEDED: &str = "evaluation depth limit exceeded";

/// The outcome of executing a node, or of resolving a pin.
///
/// Errors are plain data naming the node that failed, so the editor can
/// highlight it. Consumers that short-circuit on an upstream failure pass the
/// same result on unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ExecuteResult {
    #[default]
    Ok,
    Error { node: NodeId, message: String },
}

impl ExecuteResult {
    pub fn error_node(node: NodeId, message: impl Into<String>) -> Self {
        ExecuteResult::Error {
            node,
            message: message.into(),
        }
    }

    pub fn cycle(node: NodeId) -> Self {
        Self::error_node(node, CYCLE_DETECTED)
    }

    pub fn has_error(&self) -> bool {
        matches!(self, ExecuteResult::Error { .. })
    }

    pub fn is_ok(&self) -> bool {
        !self.has_error()
    }

    /// The node the failure is attributed to.
    pub fn failed_node(&self) -> Option<NodeId> {
        match self {
            ExecuteResult::Error { node, .. } => Some(*node),
            ExecuteResult::Ok => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            ExecuteResult::Error { message, .. } => Some(message),
            ExecuteResult::Ok => None,
        }
    }

    pub fn is_cycle(&self) -> bool {
        self.message() == Some(CYCLE_DETECTED)
    }

    /// Runs `next` only if this result is `Ok`.
    pub fn and_then(self, next: impl FnOnce() -> ExecuteResult) -> ExecuteResult {
        match self {
            ExecuteResult::Ok => next(),
            err => err,
        }
    }
}

impl fmt::Display for ExecuteResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecuteResult::Ok => f.write_str("ok"),
            ExecuteResult::Error { node, message } => write!(f, "{} failed: {}", node, message),
        }
    }
}
