//! Chat completion wire format shared by `OpenAI`, xAI, Perplexity, LM Studio
//! and generic compatible servers

use serde::{Deserialize, Serialize};
use serde_json::Value;

// -- Request types --

/// Chat completion request
#[derive(Debug, Clone, Serialize)]
pub struct OpenAiRequest {
    /// Model identifier
    pub model: String,
    /// Conversation messages
    pub messages: Vec<OpenAiMessage>,
    /// Sampling temperature
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Generation cap
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Ask for an event stream
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub stream: bool,
    /// Only honoured by the canonical `OpenAI` host
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream_options: Option<OpenAiStreamOptions>,
    /// Tool definitions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<OpenAiTool>>,
    /// Structured output mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<OpenAiResponseFormat>,
}

/// Stream options
#[derive(Debug, Clone, Serialize)]
pub struct OpenAiStreamOptions {
    /// Include usage statistics in the final chunk
    pub include_usage: bool,
}

/// Message within a request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpenAiMessage {
    /// Message role
    pub role: &'static str,
    /// Plain string or ordered parts
    pub content: OpenAiContent,
    /// Calls requested in an assistant turn
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<OpenAiToolCall>>,
    /// Set on `tool` role messages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

/// Content can be a string or array of content parts
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OpenAiContent {
    /// Plain text content
    Text(String),
    /// Text first, then images
    Parts(Vec<OpenAiContentPart>),
}

/// Individual content part in a message
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OpenAiContentPart {
    /// Text content
    Text {
        /// The text string
        text: String,
    },
    /// Image content via URL
    ImageUrl {
        /// Image URL wrapper
        image_url: OpenAiImageUrl,
    },
}

/// Image URL wrapper
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpenAiImageUrl {
    /// `https://` or `data:` URI
    pub url: String,
}

/// Tool definition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpenAiTool {
    /// Always `function`
    #[serde(rename = "type")]
    pub tool_type: &'static str,
    /// Function declaration
    pub function: OpenAiFunction,
}

/// Function declaration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpenAiFunction {
    /// Function name
    pub name: String,
    /// Shown to the model
    pub description: String,
    /// Argument schema
    pub parameters: Value,
}

/// Structured output request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OpenAiResponseFormat {
    /// Any syntactically valid JSON object
    JsonObject,
    /// Output conforming to a schema
    JsonSchema {
        /// Schema wrapper
        json_schema: OpenAiJsonSchema,
    },
}

/// Named schema for structured output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpenAiJsonSchema {
    pub name: String,
    pub schema: Value,
    pub strict: bool,
}

/// Tool call within a message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenAiToolCall {
    /// Vendor-assigned call id
    #[serde(default)]
    pub id: String,
    /// Always `function`
    #[serde(rename = "type", default = "function_type")]
    pub tool_type: String,
    /// Function call details
    pub function: OpenAiFunctionCall,
}

fn function_type() -> String {
    "function".to_owned()
}

/// Function call details within a tool call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenAiFunctionCall {
    /// Function name
    #[serde(default)]
    pub name: String,
    /// JSON-encoded arguments
    #[serde(default)]
    pub arguments: String,
}

// -- Response types --
//
// Compatible servers omit fields freely, so everything the normalizer does
// not strictly need is defaulted.

/// Chat completion response
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiResponse {
    /// Generated choices
    #[serde(default)]
    pub choices: Vec<OpenAiChoice>,
    /// Token usage
    #[serde(default)]
    pub usage: Option<OpenAiUsage>,
}

/// Choice within a response
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiChoice {
    /// Generated message
    #[serde(default)]
    pub message: OpenAiChoiceMessage,
    /// Why generation stopped
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Message within a response choice
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OpenAiChoiceMessage {
    /// Text content
    #[serde(default)]
    pub content: Option<String>,
    /// Tool calls
    #[serde(default)]
    pub tool_calls: Option<Vec<OpenAiToolCall>>,
}

/// Token usage
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct OpenAiUsage {
    /// Prompt tokens
    #[serde(default)]
    pub prompt_tokens: u32,
    /// Completion tokens
    #[serde(default)]
    pub completion_tokens: u32,
    /// Total tokens
    #[serde(default)]
    pub total_tokens: u32,
}

// -- Streaming types --

/// Streaming chunk
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiStreamChunk {
    /// Delta choices
    #[serde(default)]
    pub choices: Vec<OpenAiStreamChoice>,
    /// Usage (final chunk when `stream_options.include_usage` is set)
    #[serde(default)]
    pub usage: Option<OpenAiUsage>,
}

/// Choice within a streaming chunk
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiStreamChoice {
    /// Choice position; absent on vendors that only ever send one
    #[serde(default)]
    pub index: u32,
    /// Incremental delta
    #[serde(default)]
    pub delta: OpenAiStreamDelta,
    /// Finish reason (present on final chunk)
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Delta content within a streaming choice
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OpenAiStreamDelta {
    /// Incremental text content
    #[serde(default)]
    pub content: Option<String>,
    /// Incremental tool calls
    #[serde(default)]
    pub tool_calls: Option<Vec<OpenAiStreamToolCall>>,
}

/// Tool call within a streaming delta
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiStreamToolCall {
    /// Index within the `tool_calls` array; some servers leave it out
    #[serde(default)]
    pub index: Option<u32>,
    /// Tool call ID (first chunk only)
    #[serde(default)]
    pub id: Option<String>,
    /// Partial function call
    #[serde(default)]
    pub function: Option<OpenAiStreamFunctionCall>,
}

/// Partial function call within a streaming tool call
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiStreamFunctionCall {
    /// Function name (first chunk only)
    #[serde(default)]
    pub name: Option<String>,
    /// Incremental arguments fragment
    #[serde(default)]
    pub arguments: Option<String>,
}

// -- Models list types --

/// Models list response
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiModelList {
    /// List of models
    #[serde(default)]
    pub data: Vec<OpenAiModel>,
}

/// Model entry
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiModel {
    /// Model identifier
    pub id: String,
    /// Context window, reported by some compatible servers
    #[serde(default, alias = "max_context_length")]
    pub context_length: Option<u32>,
}
