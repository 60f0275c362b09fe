//! Consensus monitor configuration.

use std::time::Duration;

/// Configuration for the consensus monitor.
#[derive(Clone, Debug, PartialEq)]
pub struct ConsensusConfig {
    /// Cadence of the pending-transaction poll.
    pub poll_interval: Duration,

    /// Lower bound of the per-node Voting → Settling delay.
    pub settle_min: Duration,

    /// Upper bound (inclusive) of the per-node Voting → Settling delay.
    pub settle_max: Duration,

    /// How long a node stays Settling before returning to Idle.
    pub settle_hold: Duration,

    /// Interval between round-simulation labels.
    pub round_step: Duration,
}

impl Default for ConsensusConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
            settle_min: Duration::from_millis(1000),
            settle_max: Duration::from_millis(4000),
            settle_hold: Duration::from_millis(500),
            round_step: Duration::from_millis(1000),
        }
    }
}

impl ConsensusConfig {
    /// Set the poll cadence.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Set the settle delay range.
    pub fn with_settle_range(mut self, min: Duration, max: Duration) -> Self {
        self.settle_min = min;
        self.settle_max = max;
        self
    }

    /// Set the settling hold.
    pub fn with_settle_hold(mut self, hold: Duration) -> Self {
        self.settle_hold = hold;
        self
    }

    /// Set the round-simulation step interval.
    pub fn with_round_step(mut self, step: Duration) -> Self {
        self.round_step = step;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval.is_zero() {
            return Err(ConfigError::ZeroPollInterval);
        }
        if self.round_step.is_zero() {
            return Err(ConfigError::ZeroRoundStep);
        }
        if self.settle_min > self.settle_max {
            return Err(ConfigError::InvalidSettleRange {
                min_ms: self.settle_min.as_millis() as u64,
                max_ms: self.settle_max.as_millis() as u64,
            });
        }
        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Poll interval must be greater than zero")]
    ZeroPollInterval,

    #[error("Round step must be greater than zero")]
    ZeroRoundStep,

    #[error("Settle delay range is empty: min {min_ms}ms > max {max_ms}ms")]
    InvalidSettleRange { min_ms: u64, max_ms: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(ConsensusConfig::default().validate().is_ok());
    }

    #[test]
    fn test_inverted_settle_range_rejected() {
        let config = ConsensusConfig::default()
            .with_settle_range(Duration::from_millis(500), Duration::from_millis(100));
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidSettleRange {
                min_ms: 500,
                max_ms: 100
            })
        );
    }
}
