//! Shared building blocks for Conduit provider adapters
//!
//! The error taxonomy, the static vendor profile table, credential
//! resolution, and cancellation-aware request execution used by both the
//! chat and the embeddings clients.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

pub mod auth;
pub mod error;
pub mod profile;
pub mod transport;

pub use auth::{AccessTokenProvider, Credential};
pub use error::{Capability, ErrorKind, ProviderError};
pub use profile::{AuthMode, BodyStyle, Capabilities, ErrorShape, ModelListing, VendorProfile, profile};
pub use tokio_util::sync::CancellationToken;
pub use transport::CallScope;
