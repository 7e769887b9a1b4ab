//! Canonical, vendor-agnostic request and response types
//!
//! Every vendor body is built from and normalized back into these.

pub mod message;
pub mod model;
pub mod request;
pub mod response;
pub mod tool;

pub use message::{ChatMessage, Content, ContentPart, FunctionCall, Role, ToolCall, ToolKind};
pub use model::ModelDescriptor;
pub use request::{ChunkCallback, PromptRequest};
pub use response::{FinishReason, PromptResult, Usage};
pub use tool::{ParametersSchema, ToolDefinition};
