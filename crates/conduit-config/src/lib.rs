//! Configuration for Conduit
//!
//! Vendor identifiers, the per-vendor [`ProviderParams`] union, and loading of
//! TOML config files that name one or more configured providers.

#![allow(clippy::must_use_candidate)]

mod env;
mod loader;
pub mod params;
pub mod telemetry;
mod vendor;

use indexmap::IndexMap;
use serde::Deserialize;

pub use params::{
    GenerationParams, LmStudioParams, OpenAiCompatibleParams, OpenAiParams, PerplexityParams, ProviderParams,
    WatsonxParams, XaiParams,
};
pub use telemetry::{LogFormat, TelemetryConfig};
pub use vendor::Vendor;

/// Top-level Conduit configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Provider parameters keyed by a caller-chosen name
    #[serde(default)]
    pub providers: IndexMap<String, ProviderParams>,
    /// Logging configuration
    #[serde(default)]
    pub telemetry: Option<TelemetryConfig>,
}

impl Config {
    /// Look up a configured provider by name
    pub fn provider(&self, name: &str) -> Option<&ProviderParams> {
        self.providers.get(name)
    }
}
