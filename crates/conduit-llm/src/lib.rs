//! Chat completion adapters for Conduit
//!
//! Normalizes prompt calls against `OpenAI`, xAI, watsonx.ai, Perplexity,
//! LM Studio and generic OpenAI-compatible servers into one canonical
//! request/response model, including incremental decoding of streamed
//! responses and reassembly of streamed tool calls.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc, clippy::module_name_repetitions)]

pub mod catalog;
pub mod convert;
pub mod protocol;
pub mod provider;
pub mod stream;
pub mod types;

pub use conduit_core::{CancellationToken, Capabilities, Capability, ErrorKind, ProviderError};
pub use convert::{RequestBuilder, StreamNormalizer};
pub use provider::{Provider, ProviderAdapter, adapter};
pub use stream::{StreamFrameDecoder, ToolCallAccumulator};
pub use types::{
    ChatMessage, ChunkCallback, Content, ContentPart, FinishReason, ModelDescriptor, PromptRequest, PromptResult, Role,
    ToolCall, ToolDefinition, Usage,
};
