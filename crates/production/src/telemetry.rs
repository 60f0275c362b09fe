//! Logging initialization.
//!
//! Logs go to stderr so the terminal view on stdout stays readable.

use thiserror::Error;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("Invalid log filter '{filter}': {source}")]
    Filter {
        filter: String,
        #[source]
        source: ParseError,
    },

    #[error("Failed to set global subscriber: {0}")]
    SetSubscriber(String),
}

/// Pick the filter directive.
///
/// An explicit `--log-level` wins over `RUST_LOG`, which wins over the
/// configured default.
pub fn resolve_filter(cli: Option<&str>, env: Option<&str>, configured: &str) -> String {
    cli.or(env)
        .filter(|f| !f.trim().is_empty())
        .unwrap_or(configured)
        .to_string()
}

/// Build an [`EnvFilter`] from a directive string.
pub fn build_filter(filter: &str) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(filter).map_err(|source| TelemetryError::Filter {
        filter: filter.to_string(),
        source,
    })
}

/// Install the global fmt subscriber.
pub fn init_logging(filter: &str) -> Result<(), TelemetryError> {
    let env_filter = build_filter(filter)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| TelemetryError::SetSubscriber(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_precedence() {
        assert_eq!(
            resolve_filter(Some("trace"), Some("warn"), "info,fba=debug"),
            "trace"
        );
        assert_eq!(resolve_filter(None, Some("warn"), "info,fba=debug"), "warn");
        assert_eq!(resolve_filter(None, None, "info,fba=debug"), "info,fba=debug");
        assert_eq!(resolve_filter(None, Some("  "), "info"), "info");
    }

    #[test]
    fn test_build_filter() {
        assert!(build_filter("info,fba=debug").is_ok());
        assert!(build_filter("fba_wallet=trace").is_ok());

        let err = build_filter("fba=notalevel").unwrap_err();
        assert!(matches!(err, TelemetryError::Filter { .. }));
    }
}
