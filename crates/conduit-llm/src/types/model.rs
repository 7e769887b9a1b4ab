use serde::{Deserialize, Serialize};

/// Metadata describing a model a vendor serves
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    /// Vendor model identifier
    pub id: String,
    /// Human-readable name
    pub display_name: String,
    /// Context window in tokens, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_length: Option<u32>,
    pub supports_tools: bool,
    pub supports_vision: bool,
    pub supports_json_output: bool,
}
