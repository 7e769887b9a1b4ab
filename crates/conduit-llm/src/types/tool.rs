use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Definition of a tool the model can call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Function name
    pub name: String,
    /// Human-readable description
    #[serde(default)]
    pub description: String,
    /// JSON Schema for the function parameters
    #[serde(default)]
    pub parameters: ParametersSchema,
}

/// Parameter schema as supplied by the caller
///
/// Tool definitions stored by user-facing settings often keep the schema as
/// text; it is parsed only when the request body is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParametersSchema {
    /// Schema text awaiting parsing
    Raw(String),
    /// Already-structured schema
    Json(Value),
}

impl Default for ParametersSchema {
    fn default() -> Self {
        Self::Json(Value::Object(serde_json::Map::new()))
    }
}

impl ParametersSchema {
    /// Schema as JSON, with unparseable text replaced by an empty object
    pub fn resolve(&self, tool_name: &str) -> Value {
        match self {
            Self::Json(value) => value.clone(),
            Self::Raw(text) => serde_json::from_str(text).unwrap_or_else(|e| {
                tracing::warn!(tool = tool_name, error = %e, "tool parameter schema is not valid JSON, sending empty schema");
                Value::Object(serde_json::Map::new())
            }),
        }
    }
}

impl ToolDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>, parameters: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: ParametersSchema::Json(parameters),
        }
    }

    /// Tool whose schema is still text
    pub fn with_raw_schema(name: impl Into<String>, description: impl Into<String>, schema: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: ParametersSchema::Raw(schema.into()),
        }
    }
}
