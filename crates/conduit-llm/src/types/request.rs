use std::fmt;

use conduit_config::ProviderParams;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use super::message::{ChatMessage, ContentPart};
use super::tool::ToolDefinition;

/// Callback receiving each streamed content fragment in arrival order
///
/// Runs on the calling task between stream reads, so it must return quickly.
pub type ChunkCallback = Box<dyn FnMut(&str) + Send>;

/// Canonical prompt request
///
/// Supplying [`PromptRequest::on_chunk`] switches the call to streaming.
pub struct PromptRequest {
    /// Vendor model identifier
    pub model: String,
    /// System instruction; omitted from the conversation when empty
    pub system_prompt: String,
    /// Trailing user turn; omitted when empty
    pub user_prompt: String,
    /// Prior conversation turns, in order
    pub context: Vec<ChatMessage>,
    /// Image attachments for the trailing user turn
    pub images: Vec<ContentPart>,
    /// Tools the model may call
    pub tools: Vec<ToolDefinition>,
    /// Schema the output must conform to
    pub json_schema: Option<Value>,
    /// Request syntactically valid JSON output without a schema
    pub json_valid: bool,
    /// Ask the vendor to enforce `json_schema` strictly
    pub json_strict: bool,
    /// Vendor credentials, endpoint and generation settings
    pub provider_params: ProviderParams,
    /// Aborts the call when cancelled
    pub cancel: CancellationToken,
    /// Receives streamed content fragments
    pub on_chunk: Option<ChunkCallback>,
}

impl PromptRequest {
    pub fn new(model: impl Into<String>, provider_params: ProviderParams) -> Self {
        Self {
            model: model.into(),
            system_prompt: String::new(),
            user_prompt: String::new(),
            context: Vec::new(),
            images: Vec::new(),
            tools: Vec::new(),
            json_schema: None,
            json_valid: false,
            json_strict: false,
            provider_params,
            cancel: CancellationToken::new(),
            on_chunk: None,
        }
    }

    #[must_use]
    pub fn system(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    #[must_use]
    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.user_prompt = prompt.into();
        self
    }

    #[must_use]
    pub fn context(mut self, context: Vec<ChatMessage>) -> Self {
        self.context = context;
        self
    }

    #[must_use]
    pub fn image(mut self, url: impl Into<String>) -> Self {
        self.images.push(ContentPart::image(url));
        self
    }

    #[must_use]
    pub fn tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = tools;
        self
    }

    #[must_use]
    pub fn json_schema(mut self, schema: Value, strict: bool) -> Self {
        self.json_schema = Some(schema);
        self.json_strict = strict;
        self
    }

    #[must_use]
    pub const fn json_valid(mut self) -> Self {
        self.json_valid = true;
        self
    }

    #[must_use]
    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Stream the response, handing each content fragment to `callback`
    #[must_use]
    pub fn on_chunk(mut self, callback: impl FnMut(&str) + Send + 'static) -> Self {
        self.on_chunk = Some(Box::new(callback));
        self
    }

    pub const fn is_streaming(&self) -> bool {
        self.on_chunk.is_some()
    }
}

impl fmt::Debug for PromptRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PromptRequest")
            .field("model", &self.model)
            .field("vendor", &self.provider_params.vendor())
            .field("context", &self.context.len())
            .field("images", &self.images.len())
            .field("tools", &self.tools.len())
            .field("json_schema", &self.json_schema.is_some())
            .field("json_valid", &self.json_valid)
            .field("streaming", &self.is_streaming())
            .finish_non_exhaustive()
    }
}
