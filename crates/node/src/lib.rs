//! Combined console state machine.
//!
//! This crate composes the wallet and consensus monitor state machines
//! into the single state machine a runner drives.

mod state;

pub use state::{ConfigError, ConsoleStateMachine, StateMachineConfig};
