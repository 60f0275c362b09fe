//! Console configuration file.
//!
//! Every section and field is optional; missing values fall back to the
//! defaults below. Example TOML:
//!
//! ```toml
//! [remote]
//! base_url = "http://localhost:5000"
//! request_timeout_ms = 10000
//!
//! [polling]
//! refresh_interval_ms = 10000
//! deferred_refresh_ms = 1000
//! history_limit = 10
//!
//! [consensus]
//! poll_interval_ms = 5000
//! settle_min_ms = 1000
//! settle_max_ms = 4000
//! settle_hold_ms = 500
//! round_step_ms = 1000
//!
//! [telemetry]
//! log_filter = "info,fba=debug"
//! ```

use fba_client::parse_base_url;
use fba_consensus::ConsensusConfig;
use fba_node::StateMachineConfig;
use fba_wallet::WalletConfig;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors loading or validating the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid remote base URL: {0}")]
    BaseUrl(#[from] fba_client::ClientError),

    #[error("Request timeout must be greater than zero")]
    ZeroRequestTimeout,

    #[error(transparent)]
    StateMachine(#[from] fba_node::ConfigError),
}

/// Top-level console configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConsoleConfig {
    #[serde(default)]
    pub remote: RemoteSection,

    #[serde(default)]
    pub polling: PollingSection,

    #[serde(default)]
    pub consensus: ConsensusSection,

    #[serde(default)]
    pub telemetry: TelemetrySection,
}

/// Remote ledger service.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RemoteSection {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for RemoteSection {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

/// Wallet refresh cadence.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PollingSection {
    #[serde(default = "default_refresh_interval_ms")]
    pub refresh_interval_ms: u64,

    #[serde(default = "default_deferred_refresh_ms")]
    pub deferred_refresh_ms: u64,

    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

impl Default for PollingSection {
    fn default() -> Self {
        Self {
            refresh_interval_ms: default_refresh_interval_ms(),
            deferred_refresh_ms: default_deferred_refresh_ms(),
            history_limit: default_history_limit(),
        }
    }
}

fn default_refresh_interval_ms() -> u64 {
    10_000
}

fn default_deferred_refresh_ms() -> u64 {
    1_000
}

fn default_history_limit() -> usize {
    10
}

/// Pending poll and node animation timing.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConsensusSection {
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    #[serde(default = "default_settle_min_ms")]
    pub settle_min_ms: u64,

    #[serde(default = "default_settle_max_ms")]
    pub settle_max_ms: u64,

    #[serde(default = "default_settle_hold_ms")]
    pub settle_hold_ms: u64,

    #[serde(default = "default_round_step_ms")]
    pub round_step_ms: u64,
}

impl Default for ConsensusSection {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            settle_min_ms: default_settle_min_ms(),
            settle_max_ms: default_settle_max_ms(),
            settle_hold_ms: default_settle_hold_ms(),
            round_step_ms: default_round_step_ms(),
        }
    }
}

fn default_poll_interval_ms() -> u64 {
    5_000
}

fn default_settle_min_ms() -> u64 {
    1_000
}

fn default_settle_max_ms() -> u64 {
    4_000
}

fn default_settle_hold_ms() -> u64 {
    500
}

fn default_round_step_ms() -> u64 {
    1_000
}

/// Logging.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TelemetrySection {
    /// `EnvFilter` directive used when neither `--log-level` nor `RUST_LOG`
    /// is set.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

impl Default for TelemetrySection {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter(),
        }
    }
}

fn default_log_filter() -> String {
    "info,fba=debug".to_string()
}

impl ConsoleConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse configuration from TOML text.
    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.remote.request_timeout_ms)
    }

    /// Check everything the state machines and the client will rely on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        parse_base_url(&self.remote.base_url)?;
        if self.remote.request_timeout_ms == 0 {
            return Err(ConfigError::ZeroRequestTimeout);
        }
        self.state_machine_config(0).validate()?;
        Ok(())
    }

    /// Build the state machine configuration.
    pub fn state_machine_config(&self, seed: u64) -> StateMachineConfig {
        let polling = &self.polling;
        let consensus = &self.consensus;

        StateMachineConfig {
            wallet: WalletConfig::default()
                .with_refresh_interval(Duration::from_millis(polling.refresh_interval_ms))
                .with_deferred_refresh(Duration::from_millis(polling.deferred_refresh_ms))
                .with_history_limit(polling.history_limit),
            consensus: ConsensusConfig::default()
                .with_poll_interval(Duration::from_millis(consensus.poll_interval_ms))
                .with_settle_range(
                    Duration::from_millis(consensus.settle_min_ms),
                    Duration::from_millis(consensus.settle_max_ms),
                )
                .with_settle_hold(Duration::from_millis(consensus.settle_hold_ms))
                .with_round_step(Duration::from_millis(consensus.round_step_ms)),
            seed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = ConsoleConfig::parse("").unwrap();

        assert_eq!(config.remote.base_url, "http://localhost:5000");
        assert_eq!(config.polling.refresh_interval_ms, 10_000);
        assert_eq!(config.consensus.poll_interval_ms, 5_000);
        assert_eq!(config.telemetry.log_filter, "info,fba=debug");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let config = ConsoleConfig::parse(
            r#"
            [remote]
            base_url = "https://ledger.example:9443"

            [consensus]
            settle_max_ms = 2500
            "#,
        )
        .unwrap();

        assert_eq!(config.remote.base_url, "https://ledger.example:9443");
        assert_eq!(config.remote.request_timeout_ms, 10_000);
        assert_eq!(config.consensus.settle_min_ms, 1_000);
        assert_eq!(config.consensus.settle_max_ms, 2_500);

        let machine = config.state_machine_config(9);
        assert_eq!(machine.seed, 9);
        assert_eq!(machine.consensus.settle_max, Duration::from_millis(2_500));
        assert_eq!(machine.wallet.history_limit, 10);
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(ConsoleConfig::parse("[polling]\nrefresh_every = 3\n").is_err());
    }

    #[test]
    fn test_validation_failures() {
        let mut config = ConsoleConfig::default();
        config.remote.base_url = "not a url".into();
        assert!(matches!(config.validate(), Err(ConfigError::BaseUrl(_))));

        let mut config = ConsoleConfig::default();
        config.remote.request_timeout_ms = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ZeroRequestTimeout)
        ));

        let mut config = ConsoleConfig::default();
        config.consensus.settle_min_ms = 5_000;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::StateMachine(_))
        ));

        let mut config = ConsoleConfig::default();
        config.polling.refresh_interval_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[telemetry]\nlog_filter = \"warn\"").unwrap();

        let config = ConsoleConfig::load(file.path()).unwrap();
        assert_eq!(config.telemetry.log_filter, "warn");
    }

    #[test]
    fn test_load_missing_file() {
        let err = ConsoleConfig::load(Path::new("/nonexistent/console.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains("/nonexistent/console.toml"));
    }
}
