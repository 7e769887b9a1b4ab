use conduit_config::Vendor;
use strum::Display;
use thiserror::Error;

/// Errors surfaced by a provider call
///
/// Every variant names the vendor, and the model when one was targeted, so a
/// caller juggling several providers can report failures without extra
/// bookkeeping.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Transport failed before a complete response arrived
    #[error("{vendor} request for '{model}' failed: {message}")]
    Network {
        vendor: Vendor,
        model: String,
        message: String,
    },

    /// Non-success status whose body carried no recognizable vendor error
    #[error("{vendor} returned {status} for '{model}': {body}")]
    Http {
        vendor: Vendor,
        model: String,
        status: u16,
        body: String,
    },

    /// Error reported by the vendor itself (invalid model, quota, ...)
    #[error("{vendor} rejected '{model}': {message}")]
    Vendor {
        vendor: Vendor,
        model: String,
        message: String,
        /// HTTP status, absent when the error arrived inside a stream
        status: Option<u16>,
    },

    /// Response body that could not be decoded
    #[error("malformed {vendor} response for '{model}': {message}")]
    Parse {
        vendor: Vendor,
        model: String,
        message: String,
    },

    /// The caller's cancellation token fired
    #[error("{vendor} request for '{model}' was cancelled")]
    Cancelled { vendor: Vendor, model: String },

    /// The vendor cannot perform the requested operation
    #[error("{vendor} does not support {capability} (model '{model}')")]
    Capability {
        vendor: Vendor,
        model: String,
        capability: Capability,
    },

    /// The request or its parameters were rejected before any I/O
    #[error("invalid {vendor} request for '{model}': {message}")]
    InvalidRequest {
        vendor: Vendor,
        model: String,
        message: String,
    },
}

/// Coarse classification of [`ProviderError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    Network,
    Http,
    Vendor,
    Parse,
    Cancellation,
    Capability,
    InvalidRequest,
}

/// Operations a vendor may lack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Capability {
    #[strum(serialize = "tool calling")]
    Tools,
    #[strum(serialize = "JSON object output")]
    JsonObject,
    #[strum(serialize = "JSON schema output")]
    JsonSchema,
    #[strum(serialize = "embeddings")]
    Embeddings,
}

impl ProviderError {
    /// Taxonomy bucket for this error
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Network { .. } => ErrorKind::Network,
            Self::Http { .. } => ErrorKind::Http,
            Self::Vendor { .. } => ErrorKind::Vendor,
            Self::Parse { .. } => ErrorKind::Parse,
            Self::Cancelled { .. } => ErrorKind::Cancellation,
            Self::Capability { .. } => ErrorKind::Capability,
            Self::InvalidRequest { .. } => ErrorKind::InvalidRequest,
        }
    }

    /// Vendor the failing call was addressed to
    pub const fn vendor(&self) -> Vendor {
        match self {
            Self::Network { vendor, .. }
            | Self::Http { vendor, .. }
            | Self::Vendor { vendor, .. }
            | Self::Parse { vendor, .. }
            | Self::Cancelled { vendor, .. }
            | Self::Capability { vendor, .. }
            | Self::InvalidRequest { vendor, .. } => *vendor,
        }
    }

    /// Model the failing call targeted
    pub fn model(&self) -> &str {
        match self {
            Self::Network { model, .. }
            | Self::Http { model, .. }
            | Self::Vendor { model, .. }
            | Self::Parse { model, .. }
            | Self::Cancelled { model, .. }
            | Self::Capability { model, .. }
            | Self::InvalidRequest { model, .. } => model,
        }
    }

    /// Whether the caller's cancellation token caused this error
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}
