use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// A serialized node graph, ready to be built against a registry.
/// This is the target structure for any custom document conversion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlueprintDefinition {
    #[serde(default)]
    pub nodes: Vec<BlueprintNode>,
    #[serde(default)]
    pub links: Vec<BlueprintLink>,
}

/// A single node: its document id, the registry kind to spawn, and literal
/// overrides for its inputs keyed by input label (or `"input-N"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlueprintNode {
    pub id: String,
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub literals: AHashMap<String, serde_json::Value>,
}

/// An output-to-input link between two document nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlueprintLink {
    pub source: String,
    pub source_pin: String,
    pub target: String,
    pub target_pin: String,
}
