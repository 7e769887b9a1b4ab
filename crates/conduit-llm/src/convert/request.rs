//! Canonical prompt request to vendor request body

use conduit_config::ProviderParams;
use conduit_core::{BodyStyle, Capability, ProviderError, VendorProfile};
use serde::Serialize;
use serde_json::Value;

use crate::protocol::openai::{
    OpenAiContent, OpenAiContentPart, OpenAiJsonSchema, OpenAiMessage, OpenAiRequest, OpenAiResponseFormat,
    OpenAiStreamOptions, OpenAiTool,
};
use crate::protocol::watsonx::WatsonxChatRequest;
use crate::types::PromptRequest;

/// Name sent with a JSON schema that carries no usable `title`
const DEFAULT_SCHEMA_NAME: &str = "response";

/// Request body in the dialect of the target vendor
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum WireRequest {
    OpenAi(OpenAiRequest),
    Watsonx(WatsonxChatRequest),
}

/// Builds vendor request bodies from a [`PromptRequest`]
///
/// Pure: no I/O, the same input always yields the same body.
#[derive(Debug, Clone, Copy)]
pub struct RequestBuilder {
    profile: &'static VendorProfile,
    stream_usage: bool,
}

impl RequestBuilder {
    pub const fn new(profile: &'static VendorProfile) -> Self {
        Self {
            profile,
            stream_usage: false,
        }
    }

    /// Ask for a usage summary at the end of streamed responses
    #[must_use]
    pub const fn stream_usage(mut self, enabled: bool) -> Self {
        self.stream_usage = enabled;
        self
    }

    /// Build the body for `request`
    ///
    /// # Errors
    ///
    /// Returns `Capability` when the vendor cannot express a requested
    /// feature, and `InvalidRequest` when the request itself is unusable
    pub fn build(&self, request: &PromptRequest) -> Result<WireRequest, ProviderError> {
        let messages = self.build_messages(request)?;
        let tools = self.build_tools(request)?;
        let response_format = self.build_response_format(request)?;
        let generation = request.provider_params.generation();

        match self.profile.body {
            BodyStyle::OpenAi => {
                let stream = request.is_streaming();
                Ok(WireRequest::OpenAi(OpenAiRequest {
                    model: request.model.clone(),
                    messages,
                    temperature: generation.temperature,
                    max_tokens: generation.max_tokens,
                    stream,
                    stream_options: (stream && self.stream_usage).then_some(OpenAiStreamOptions { include_usage: true }),
                    tools,
                    response_format,
                }))
            }
            BodyStyle::Watsonx => {
                let ProviderParams::Watsonx(params) = &request.provider_params else {
                    return Err(self.profile.invalid(
                        &request.model,
                        format!("received parameters for {}", request.provider_params.vendor()),
                    ));
                };
                Ok(WireRequest::Watsonx(WatsonxChatRequest {
                    model_id: request.model.clone(),
                    project_id: params.project_id.clone(),
                    messages,
                    tools,
                    response_format,
                    max_tokens: generation.max_tokens,
                    temperature: generation.temperature,
                    time_limit: params.time_limit,
                }))
            }
        }
    }

    /// Conversation in wire order: system, context, then the user turn
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` when images are attached without a prompt
    pub fn build_messages(&self, request: &PromptRequest) -> Result<Vec<OpenAiMessage>, ProviderError> {
        let mut messages = Vec::with_capacity(request.context.len() + 2);

        if !request.system_prompt.is_empty() {
            messages.push(text_message("system", request.system_prompt.clone()));
        }

        messages.extend(request.context.iter().map(OpenAiMessage::from));

        if request.user_prompt.is_empty() {
            if !request.images.is_empty() {
                return Err(self
                    .profile
                    .invalid(&request.model, "images require a non-empty prompt to attach to"));
            }
            return Ok(messages);
        }

        if request.images.is_empty() {
            messages.push(text_message("user", request.user_prompt.clone()));
        } else {
            let mut parts = Vec::with_capacity(request.images.len() + 1);
            parts.push(OpenAiContentPart::Text {
                text: request.user_prompt.clone(),
            });
            parts.extend(request.images.iter().map(OpenAiContentPart::from));
            messages.push(OpenAiMessage {
                role: "user",
                content: OpenAiContent::Parts(parts),
                tool_calls: None,
                tool_call_id: None,
            });
        }

        Ok(messages)
    }

    fn build_tools(&self, request: &PromptRequest) -> Result<Option<Vec<OpenAiTool>>, ProviderError> {
        if request.tools.is_empty() {
            return Ok(None);
        }
        self.profile
            .require(self.profile.capabilities.tools, Capability::Tools, &request.model)?;
        Ok(Some(request.tools.iter().map(OpenAiTool::from).collect()))
    }

    fn build_response_format(&self, request: &PromptRequest) -> Result<Option<OpenAiResponseFormat>, ProviderError> {
        if let Some(schema) = &request.json_schema {
            self.profile
                .require(self.profile.capabilities.json_schema, Capability::JsonSchema, &request.model)?;
            return Ok(Some(OpenAiResponseFormat::JsonSchema {
                json_schema: OpenAiJsonSchema {
                    name: schema_name(schema),
                    schema: schema.clone(),
                    strict: request.json_strict,
                },
            }));
        }

        if request.json_valid {
            self.profile
                .require(self.profile.capabilities.json_object, Capability::JsonObject, &request.model)?;
            return Ok(Some(OpenAiResponseFormat::JsonObject));
        }

        Ok(None)
    }
}

fn text_message(role: &'static str, text: String) -> OpenAiMessage {
    OpenAiMessage {
        role,
        content: OpenAiContent::Text(text),
        tool_calls: None,
        tool_call_id: None,
    }
}

/// Schema `title` when it is a valid response format name
fn schema_name(schema: &Value) -> String {
    schema
        .get("title")
        .and_then(Value::as_str)
        .filter(|title| {
            !title.is_empty()
                && title.len() <= 64
                && title.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        })
        .unwrap_or(DEFAULT_SCHEMA_NAME)
        .to_owned()
}

#[cfg(test)]
mod tests {
    use conduit_config::{OpenAiParams, PerplexityParams, Vendor, WatsonxParams, XaiParams};
    use conduit_core::{ErrorKind, profile};
    use serde_json::json;

    use super::*;
    use crate::types::{ChatMessage, ToolDefinition};

    fn openai_request() -> PromptRequest {
        PromptRequest::new("gpt-4o", ProviderParams::OpenAi(OpenAiParams::new("sk-test")))
    }

    fn body(builder: RequestBuilder, request: &PromptRequest) -> Value {
        serde_json::to_value(builder.build(request).unwrap()).unwrap()
    }

    #[test]
    fn messages_follow_system_context_user_order() {
        let request = openai_request()
            .system("s")
            .context(vec![ChatMessage::user("a"), ChatMessage::assistant("b")])
            .prompt("hi");

        let wire = body(RequestBuilder::new(profile(Vendor::OpenAi)), &request);

        assert_eq!(
            wire["messages"],
            json!([
                {"role": "system", "content": "s"},
                {"role": "user", "content": "a"},
                {"role": "assistant", "content": "b"},
                {"role": "user", "content": "hi"}
            ])
        );
    }

    #[test]
    fn empty_prompt_leaves_tool_message_last() {
        let request = openai_request().system("s").context(vec![
            ChatMessage::assistant_tool_calls("", vec![crate::types::ToolCall::function("t1", "f", "{}")]),
            ChatMessage::tool("t1", "r"),
        ]);

        let wire = body(RequestBuilder::new(profile(Vendor::OpenAi)), &request);
        let messages = wire["messages"].as_array().unwrap();

        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[2], json!({"role": "tool", "content": "r", "tool_call_id": "t1"}));
    }

    #[test]
    fn empty_system_prompt_is_omitted() {
        let request = openai_request().prompt("hi");
        let wire = body(RequestBuilder::new(profile(Vendor::OpenAi)), &request);
        assert_eq!(wire["messages"], json!([{"role": "user", "content": "hi"}]));
    }

    #[test]
    fn images_attach_to_user_turn_after_text() {
        let request = openai_request()
            .prompt("describe")
            .image("https://example.com/a.png")
            .image("https://example.com/b.png");

        let wire = body(RequestBuilder::new(profile(Vendor::OpenAi)), &request);

        assert_eq!(
            wire["messages"][0]["content"],
            json!([
                {"type": "text", "text": "describe"},
                {"type": "image_url", "image_url": {"url": "https://example.com/a.png"}},
                {"type": "image_url", "image_url": {"url": "https://example.com/b.png"}}
            ])
        );
    }

    #[test]
    fn images_without_prompt_are_rejected() {
        let request = openai_request().image("https://example.com/a.png");
        let err = RequestBuilder::new(profile(Vendor::OpenAi)).build(&request).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRequest);
    }

    #[test]
    fn schema_wins_over_json_valid() {
        let schema = json!({"title": "weather_report", "type": "object"});
        let request = openai_request().prompt("x").json_valid().json_schema(schema.clone(), true);

        let wire = body(RequestBuilder::new(profile(Vendor::OpenAi)), &request);

        assert_eq!(
            wire["response_format"],
            json!({
                "type": "json_schema",
                "json_schema": {"name": "weather_report", "schema": schema, "strict": true}
            })
        );
    }

    #[test]
    fn json_valid_requests_json_object() {
        let request = openai_request().prompt("x").json_valid();
        let wire = body(RequestBuilder::new(profile(Vendor::OpenAi)), &request);
        assert_eq!(wire["response_format"], json!({"type": "json_object"}));
    }

    #[test]
    fn untitled_schema_gets_default_name() {
        let request = openai_request().prompt("x").json_schema(json!({"title": "has spaces"}), false);
        let wire = body(RequestBuilder::new(profile(Vendor::OpenAi)), &request);
        assert_eq!(wire["response_format"]["json_schema"]["name"], "response");
        assert_eq!(wire["response_format"]["json_schema"]["strict"], false);
    }

    #[test]
    fn stream_flag_follows_callback_and_usage_is_opt_in() {
        let plain = openai_request().prompt("x");
        let wire = body(RequestBuilder::new(profile(Vendor::OpenAi)).stream_usage(true), &plain);
        assert!(wire.get("stream").is_none());
        assert!(wire.get("stream_options").is_none());

        let streaming = openai_request().prompt("x").on_chunk(|_| {});
        let wire = body(RequestBuilder::new(profile(Vendor::OpenAi)).stream_usage(true), &streaming);
        assert_eq!(wire["stream"], true);
        assert_eq!(wire["stream_options"], json!({"include_usage": true}));

        let wire = body(RequestBuilder::new(profile(Vendor::OpenAi)), &streaming);
        assert_eq!(wire["stream"], true);
        assert!(wire.get("stream_options").is_none());
    }

    #[test]
    fn generation_params_are_copied() {
        let mut params = XaiParams::new("xai-key");
        params.max_tokens = Some(256);
        params.temperature = Some(0.2);
        let request = PromptRequest::new("grok-3", ProviderParams::Xai(params)).prompt("x");

        let wire = body(RequestBuilder::new(profile(Vendor::Xai)), &request);

        assert_eq!(wire["model"], "grok-3");
        assert_eq!(wire["max_tokens"], 256);
        assert_eq!(wire["temperature"], 0.2);
    }

    #[test]
    fn watsonx_body_uses_model_id_and_project() {
        let mut params = WatsonxParams::new("ibm-key", "proj-1");
        params.time_limit = Some(10_000);
        params.max_tokens = Some(100);
        let request = PromptRequest::new("ibm/granite-3-8b-instruct", ProviderParams::Watsonx(params))
            .system("s")
            .prompt("hi");

        let wire = body(RequestBuilder::new(profile(Vendor::Watsonx)), &request);

        assert_eq!(wire["model_id"], "ibm/granite-3-8b-instruct");
        assert_eq!(wire["project_id"], "proj-1");
        assert_eq!(wire["time_limit"], 10_000);
        assert_eq!(wire["max_tokens"], 100);
        assert!(wire.get("model").is_none());
        assert!(wire.get("stream").is_none());
        assert_eq!(wire["messages"][1], json!({"role": "user", "content": "hi"}));
    }

    #[test]
    fn perplexity_rejects_tools_and_json_object() {
        let params = || ProviderParams::Perplexity(PerplexityParams::new("pplx-key"));
        let builder = RequestBuilder::new(profile(Vendor::Perplexity));

        let with_tools = PromptRequest::new("sonar", params())
            .prompt("x")
            .tools(vec![ToolDefinition::new("f", "", json!({}))]);
        let err = builder.build(&with_tools).unwrap_err();
        assert!(matches!(err, ProviderError::Capability { capability: Capability::Tools, .. }));
        assert_eq!(err.model(), "sonar");

        let with_json = PromptRequest::new("sonar", params()).prompt("x").json_valid();
        let err = builder.build(&with_json).unwrap_err();
        assert!(matches!(err, ProviderError::Capability { capability: Capability::JsonObject, .. }));

        let with_schema = PromptRequest::new("sonar", params())
            .prompt("x")
            .json_schema(json!({"type": "object"}), false);
        assert!(builder.build(&with_schema).is_ok());
    }

    #[test]
    fn tools_are_translated_to_functions() {
        let request = openai_request().prompt("x").tools(vec![ToolDefinition::with_raw_schema(
            "lookup",
            "find things",
            "not json",
        )]);

        let wire = body(RequestBuilder::new(profile(Vendor::OpenAi)), &request);

        assert_eq!(
            wire["tools"],
            json!([{
                "type": "function",
                "function": {"name": "lookup", "description": "find things", "parameters": {}}
            }])
        );
    }
}
