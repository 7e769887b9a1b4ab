//! Logging setup for Conduit
//!
//! Installs a `tracing-subscriber` registry with an `EnvFilter` and a `fmt`
//! layer writing text or JSON lines to stderr.

use conduit_config::{LogFormat, TelemetryConfig};
use tracing_subscriber::EnvFilter;

/// Filter used when no valid directive is supplied
const DEFAULT_FILTER: &str = "info";

/// Initialize logging from configuration
///
/// A `filter` in the config file takes precedence over `log_filter`, which is
/// usually taken from the command line or `RUST_LOG`.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed
pub fn init(config: Option<&TelemetryConfig>, log_filter: &str) -> anyhow::Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let format = config.map(|c| c.format).unwrap_or_default();
    let with_target = config.is_none_or(|c| c.with_target);
    let filter = build_filter(config.and_then(|c| c.filter.as_deref()), log_filter);

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(with_target)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Text => registry.with(fmt_layer).try_init(),
        LogFormat::Json => registry.with(fmt_layer.json().flatten_event(true)).try_init(),
    }
    .map_err(|e| anyhow::anyhow!("failed to install log subscriber: {e}"))
}

/// First directive that parses, falling back to `info`
fn build_filter(configured: Option<&str>, fallback: &str) -> EnvFilter {
    configured
        .into_iter()
        .chain(std::iter::once(fallback))
        .find_map(|directive| EnvFilter::try_new(directive).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_filter_wins() {
        let filter = build_filter(Some("conduit_llm=debug"), "warn");
        assert_eq!(filter.to_string(), "conduit_llm=debug");
    }

    #[test]
    fn invalid_directive_falls_back() {
        let filter = build_filter(Some("conduit_llm=notalevel"), "warn");
        assert_eq!(filter.to_string(), "warn");

        let filter = build_filter(None, "conduit=bogus");
        assert_eq!(filter.to_string(), "info");
    }
}
