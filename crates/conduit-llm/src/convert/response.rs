//! Vendor responses to [`PromptResult`]

use std::pin::pin;

use bytes::Bytes;
use conduit_core::{CallScope, ProviderError};
use futures_util::{Stream, StreamExt};
use serde_json::Value;

use crate::protocol::openai::{OpenAiResponse, OpenAiStreamChunk};
use crate::stream::{Frame, ToolCallAccumulator, ToolCallDelta, frames};
use crate::types::{ChunkCallback, FinishReason, PromptResult, ToolCall, Usage};

/// Normalize a complete (non-streamed) chat response body
///
/// # Errors
///
/// Returns `Vendor` when the body carries the vendor's error indicator and
/// `Parse` when it is not a chat completion
pub fn normalize_completion(scope: &CallScope<'_>, body: Value) -> Result<PromptResult, ProviderError> {
    if let Some(message) = scope.profile.error_message(&body) {
        return Err(scope.vendor_error(message, None));
    }

    let response: OpenAiResponse =
        serde_json::from_value(body).map_err(|e| scope.parse(format!("unexpected completion shape: {e}")))?;

    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| scope.parse("completion contained no choices"))?;

    let tool_calls: Vec<ToolCall> = choice
        .message
        .tool_calls
        .unwrap_or_default()
        .into_iter()
        .map(ToolCall::from)
        .collect();

    Ok(PromptResult {
        content: choice.message.content.unwrap_or_default(),
        tool_calls: (!tool_calls.is_empty()).then_some(tool_calls),
        usage: response.usage.map(Usage::from),
        finish_reason: choice.finish_reason.as_deref().and_then(FinishReason::parse),
    })
}

/// Folds streamed payloads into a [`PromptResult`]
///
/// Each content fragment is handed to the callback and appended to the
/// buffer in the same step, so the callback sees exactly the final content.
pub struct StreamNormalizer {
    on_chunk: Option<ChunkCallback>,
    content: String,
    tool_calls: ToolCallAccumulator,
    usage: Option<Usage>,
    finish_reason: Option<FinishReason>,
    malformed: usize,
}

impl StreamNormalizer {
    pub fn new(on_chunk: Option<ChunkCallback>) -> Self {
        Self {
            on_chunk,
            content: String::new(),
            tool_calls: ToolCallAccumulator::new(),
            usage: None,
            finish_reason: None,
            malformed: 0,
        }
    }

    /// Number of payloads skipped because they could not be parsed
    pub const fn malformed(&self) -> usize {
        self.malformed
    }

    /// Apply one event payload
    ///
    /// Unparseable payloads are logged and skipped. Only choice 0 is folded
    /// into the result; further choices of an `n > 1` request are ignored.
    ///
    /// # Errors
    ///
    /// Returns `Vendor` when the payload carries the vendor's error indicator
    /// and `Cancelled` when the token fired before a fragment was delivered
    pub fn handle(&mut self, scope: &CallScope<'_>, payload: &str) -> Result<(), ProviderError> {
        let value: Value = match serde_json::from_str(payload) {
            Ok(value) => value,
            Err(e) => {
                self.skip(scope, &e);
                return Ok(());
            }
        };

        if let Some(message) = scope.profile.error_message(&value) {
            tracing::warn!(vendor = %scope.profile.vendor, model = %scope.model, "vendor reported error mid-stream");
            return Err(scope.vendor_error(message, None));
        }

        let chunk: OpenAiStreamChunk = match serde_json::from_value(value) {
            Ok(chunk) => chunk,
            Err(e) => {
                self.skip(scope, &e);
                return Ok(());
            }
        };

        if let Some(usage) = chunk.usage {
            self.usage = Some(usage.into());
        }

        let Some(choice) = chunk.choices.into_iter().find(|choice| choice.index == 0) else {
            return Ok(());
        };

        if let Some(text) = choice.delta.content.filter(|text| !text.is_empty()) {
            if scope.cancel.is_cancelled() {
                return Err(scope.cancelled());
            }
            if let Some(callback) = self.on_chunk.as_mut() {
                callback(text.as_str());
            }
            self.content.push_str(&text);
        }

        for (position, call) in choice.delta.tool_calls.into_iter().flatten().enumerate() {
            let (name, arguments) = call.function.map_or((None, None), |f| (f.name, f.arguments));
            self.tool_calls.apply(ToolCallDelta {
                index: call.index.unwrap_or_else(|| u32::try_from(position).unwrap_or(u32::MAX)),
                id: call.id,
                name,
                arguments,
            });
        }

        if let Some(reason) = choice.finish_reason.as_deref().and_then(FinishReason::parse) {
            self.finish_reason = Some(reason);
        }

        Ok(())
    }

    fn skip(&mut self, scope: &CallScope<'_>, error: &serde_json::Error) {
        self.malformed += 1;
        tracing::warn!(
            vendor = %scope.profile.vendor,
            model = %scope.model,
            error = %error,
            "skipping malformed stream payload"
        );
    }

    /// Assemble the result; tool calls are omitted when none were streamed
    pub fn finish(self) -> PromptResult {
        let tool_calls = if self.tool_calls.is_empty() {
            None
        } else {
            Some(self.tool_calls.finish())
        };

        PromptResult {
            content: self.content,
            tool_calls,
            usage: self.usage,
            finish_reason: self.finish_reason,
        }
    }
}

/// Read a streamed response body to completion
///
/// Every read races the scope's cancellation token; once it fires no further
/// payload is handled and the body is dropped.
///
/// # Errors
///
/// Returns `Cancelled`, `Network` when the transport fails or the body ends
/// before `[DONE]` on vendors that always send it, or `Vendor` for an
/// in-stream error payload
pub async fn drive_stream<S, E>(
    scope: &CallScope<'_>,
    body: S,
    mut normalizer: StreamNormalizer,
) -> Result<PromptResult, ProviderError>
where
    S: Stream<Item = Result<Bytes, E>>,
    E: std::fmt::Display,
{
    let mut events = pin!(frames(body));

    loop {
        match scope.guard(events.next()).await? {
            Some(Ok(Frame::Data(payload))) => normalizer.handle(scope, &payload)?,
            Some(Ok(Frame::Done)) => break,
            Some(Err(e)) => {
                tracing::error!(vendor = %scope.profile.vendor, model = %scope.model, error = %e, "stream interrupted");
                return Err(scope.network(format!("stream interrupted: {e}")));
            }
            None if scope.profile.stream_terminator => {
                tracing::error!(
                    vendor = %scope.profile.vendor,
                    model = %scope.model,
                    "stream closed before [DONE]"
                );
                return Err(scope.network("stream ended before [DONE]"));
            }
            None => {
                tracing::debug!(
                    vendor = %scope.profile.vendor,
                    model = %scope.model,
                    "stream closed without end marker"
                );
                break;
            }
        }
    }

    if normalizer.malformed() > 0 {
        tracing::debug!(
            vendor = %scope.profile.vendor,
            model = %scope.model,
            skipped = normalizer.malformed(),
            "stream finished with skipped payloads"
        );
    }

    Ok(normalizer.finish())
}
