//! watsonx.ai chat and model catalog wire format
//!
//! Chat messages, tools and response choices share the `OpenAI` shapes; the
//! request envelope differs and errors arrive as an `errors` array.

use serde::{Deserialize, Serialize};

use super::openai::{OpenAiMessage, OpenAiResponseFormat, OpenAiTool};

/// Chat request for `/ml/v1/text/chat` and `/ml/v1/text/chat_stream`
#[derive(Debug, Clone, Serialize)]
pub struct WatsonxChatRequest {
    /// Foundation model identifier
    pub model_id: String,
    /// Project the call is billed to
    pub project_id: String,
    /// Conversation messages
    pub messages: Vec<OpenAiMessage>,
    /// Tool definitions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<OpenAiTool>>,
    /// Structured output mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<OpenAiResponseFormat>,
    /// Maximum tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Sampling temperature
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Server-side generation bound in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_limit: Option<u64>,
}

/// Response of `/ml/v1/foundation_model_specs`
#[derive(Debug, Clone, Deserialize)]
pub struct WatsonxModelSpecs {
    #[serde(default)]
    pub resources: Vec<WatsonxModelSpec>,
}

/// One foundation model
#[derive(Debug, Clone, Deserialize)]
pub struct WatsonxModelSpec {
    pub model_id: String,
    /// Human-readable name
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub model_limits: Option<WatsonxModelLimits>,
    /// Capabilities such as `text_chat` or `image_chat`
    #[serde(default)]
    pub functions: Vec<WatsonxFunction>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct WatsonxModelLimits {
    #[serde(default)]
    pub max_sequence_length: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WatsonxFunction {
    pub id: String,
}

impl WatsonxModelSpec {
    pub fn has_function(&self, id: &str) -> bool {
        self.functions.iter().any(|f| f.id == id)
    }
}
