//! Consensus activity monitor.
//!
//! Polls the remote pending set and animates each ledger node through
//! `Ready -> Voting... -> Settling... -> Ready`. Voting nodes settle after an
//! independent randomized delay drawn from a [`SettleDelaySource`]; an empty
//! pending set returns every node to Ready at once.
//!
//! The round simulation is a separate label overlay driven by its own timer.

mod board;
mod config;
mod delay;
mod monitor;
mod round;

pub use board::{AnimationBoard, NodeAnimation};
pub use config::{ConfigError, ConsensusConfig};
pub use delay::{RandomDelaySource, ScriptedDelays, SettleDelaySource};
pub use monitor::ConsensusMonitor;
pub use round::{RoundSimulation, RoundStep, ROUND_STEPS};
