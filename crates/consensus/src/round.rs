//! Illustrative consensus round.
//!
//! Walks every node's status label through a fixed sequence of steps and then
//! clears it. The overlay lives here, never in the animation board.

use fba_core::{Action, TimerId};
use std::time::Duration;
use tracing::debug;

/// Labels shown, in order, one per step interval.
pub const ROUND_STEPS: [&str; 5] = [
    "Preparing vote...",
    "Broadcasting vote...",
    "Collecting votes...",
    "Checking quorum...",
    "Consensus reached!",
];

#[derive(Debug, Clone, PartialEq, Eq)]
struct RoundProgress {
    transaction_hash: String,
    /// Number of labels shown so far.
    shown: usize,
}

/// A round simulation. At most one runs at a time.
#[derive(Debug)]
pub struct RoundSimulation {
    step: Duration,
    active: Option<RoundProgress>,
}

/// Result of a step timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundStep {
    /// Show this label and wait for the next step.
    Show(&'static str),
    /// The round is over; clear the overlay.
    Finished,
    /// No round running.
    Idle,
}

impl RoundSimulation {
    pub fn new(step: Duration) -> Self {
        Self { step, active: None }
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    /// Hash of the transaction the running round illustrates.
    pub fn transaction_hash(&self) -> Option<&str> {
        self.active.as_ref().map(|p| p.transaction_hash.as_str())
    }

    /// Label currently overlaid on every node.
    pub fn label(&self) -> Option<&'static str> {
        self.active
            .as_ref()
            .and_then(|p| p.shown.checked_sub(1))
            .map(|idx| ROUND_STEPS[idx])
    }

    /// Start a round. `None` if one is already running.
    pub fn start(&mut self, transaction_hash: &str) -> Option<Action> {
        if self.active.is_some() {
            return None;
        }
        debug!(hash = transaction_hash, "Round simulation started");
        self.active = Some(RoundProgress {
            transaction_hash: transaction_hash.to_string(),
            shown: 0,
        });
        Some(self.arm())
    }

    /// Advance on a step timer. Returns the step and, unless finished, the
    /// timer for the next one.
    pub fn advance(&mut self) -> (RoundStep, Option<Action>) {
        let Some(progress) = self.active.as_mut() else {
            return (RoundStep::Idle, None);
        };
        if progress.shown < ROUND_STEPS.len() {
            let label = ROUND_STEPS[progress.shown];
            progress.shown += 1;
            (RoundStep::Show(label), Some(self.arm()))
        } else {
            debug!(hash = %progress.transaction_hash, "Round simulation finished");
            self.active = None;
            (RoundStep::Finished, None)
        }
    }

    fn arm(&self) -> Action {
        Action::SetTimer {
            id: TimerId::RoundStep,
            duration: self.step,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_walks_all_labels_then_clears() {
        let mut round = RoundSimulation::new(Duration::from_secs(1));
        assert!(round.start("h1").is_some());
        assert_eq!(round.label(), None);

        for expected in ROUND_STEPS {
            let (step, next) = round.advance();
            assert_eq!(step, RoundStep::Show(expected));
            assert!(next.is_some());
            assert_eq!(round.label(), Some(expected));
        }

        assert_eq!(round.advance(), (RoundStep::Finished, None));
        assert!(!round.is_running());
        assert_eq!(round.label(), None);
        assert_eq!(round.advance(), (RoundStep::Idle, None));
    }

    #[test]
    fn test_second_start_rejected_while_running() {
        let mut round = RoundSimulation::new(Duration::from_secs(1));
        round.start("h1");
        assert!(round.start("h2").is_none());
        assert_eq!(round.transaction_hash(), Some("h1"));
    }
}
