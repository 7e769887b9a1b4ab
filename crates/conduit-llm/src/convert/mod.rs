//! Conversion between the canonical types and vendor wire formats
//!
//! Outbound, [`RequestBuilder`] turns a prompt into a vendor body. Inbound,
//! [`normalize_completion`] and [`StreamNormalizer`] turn vendor responses
//! back into a [`crate::types::PromptResult`].

mod message;
mod request;
mod response;

pub use request::{RequestBuilder, WireRequest};
pub use response::{StreamNormalizer, drive_stream, normalize_completion};
