//! Embedding generation for Conduit
//!
//! The same vendor parameters that drive chat calls select the embeddings
//! endpoint; vendors without one fail with a capability error.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod client;
mod protocol;
mod types;

pub use client::{EmbeddingsClient, EmbeddingsProvider};
pub use conduit_core::{CancellationToken, ProviderError};
pub use types::{Embedding, EmbeddingsResult};
