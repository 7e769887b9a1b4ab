use serde::Deserialize;

/// Logging configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TelemetryConfig {
    /// Output format for log lines
    #[serde(default)]
    pub format: LogFormat,
    /// `EnvFilter` directive (e.g. `conduit_llm=debug,info`)
    ///
    /// Overrides the filter passed on the command line when set.
    #[serde(default)]
    pub filter: Option<String>,
    /// Include the event target in each line
    #[serde(default = "default_with_target")]
    pub with_target: bool,
}

/// Log line format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable text
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

const fn default_with_target() -> bool {
    true
}
