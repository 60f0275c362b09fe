//! Wallet refresh configuration.

use std::time::Duration;

/// Configuration for the wallet state machine.
#[derive(Clone, Debug, PartialEq)]
pub struct WalletConfig {
    /// Cadence of the balance/history/stats refresh cycle.
    pub refresh_interval: Duration,

    /// Delay of the one-shot refresh after a successful send or faucet grant.
    pub deferred_refresh: Duration,

    /// Number of history records requested per read.
    pub history_limit: usize,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_secs(10),
            deferred_refresh: Duration::from_secs(1),
            history_limit: 10,
        }
    }
}

impl WalletConfig {
    /// Set the refresh cadence.
    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }

    /// Set the deferred refresh delay.
    pub fn with_deferred_refresh(mut self, delay: Duration) -> Self {
        self.deferred_refresh = delay;
        self
    }

    /// Set the history limit.
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.refresh_interval.is_zero() {
            return Err(ConfigError::ZeroRefreshInterval);
        }
        if self.history_limit == 0 {
            return Err(ConfigError::ZeroHistoryLimit);
        }
        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Refresh interval must be greater than zero")]
    ZeroRefreshInterval,

    #[error("History limit must be greater than zero")]
    ZeroHistoryLimit,
}
