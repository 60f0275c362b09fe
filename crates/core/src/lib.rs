//! Core types for the FBA ledger console.
//!
//! This crate provides the foundational types for the console architecture:
//!
//! - [`Event`]: All possible inputs to the state machine
//! - [`Action`]: All possible outputs from the state machine
//! - [`Command`]: One variant per user action
//! - [`RemoteRequest`] / [`RemoteResponse`]: Calls to the remote ledger authority
//! - [`StateMachine`]: The trait that all state machines implement
//!
//! # Architecture
//!
//! ```text
//! Events → StateMachine::handle() → Actions
//! ```
//!
//! The state machine is:
//! - **Synchronous**: No async, no .await
//! - **Deterministic**: Same state + event = same actions
//! - **Pure-ish**: Mutates self, but performs no I/O
//!
//! All I/O is handled by the runner (simulation or production) which:
//! 1. Delivers events to the state machine
//! 2. Executes the returned actions
//! 3. Converts remote responses and timer expiries back into events

mod action;
mod command;
mod event;
mod request;
mod traits;

pub use action::{Action, NotifyLevel, ViewUpdate};
pub use command::Command;
pub use event::{Event, EventPriority};
pub use request::{RemoteRequest, RemoteResponse};
pub use traits::{StateMachine, SubStateMachine};

use fba_types::NodeId;

/// Timer identification.
///
/// Setting a timer with an id that is already armed replaces it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TimerId {
    /// Recurring wallet refresh (balance, history, stats).
    WalletRefresh,
    /// One-shot refresh after a successful submit.
    DeferredRefresh,
    /// Recurring pending-transaction poll.
    ConsensusPoll,
    /// Per-node Voting → Settling deadline.
    NodeSettle { node_id: NodeId, cycle: u64 },
    /// Per-node Settling → Idle deadline.
    NodeIdle { node_id: NodeId, cycle: u64 },
    /// Next label of the round simulation.
    RoundStep,
}

impl TimerId {
    /// The event delivered when this timer fires.
    pub fn into_event(self) -> Event {
        match self {
            TimerId::WalletRefresh => Event::WalletRefreshTimer,
            TimerId::DeferredRefresh => Event::DeferredRefreshTimer,
            TimerId::ConsensusPoll => Event::ConsensusPollTimer,
            TimerId::NodeSettle { node_id, cycle } => Event::NodeSettleTimer { node_id, cycle },
            TimerId::NodeIdle { node_id, cycle } => Event::NodeIdleTimer { node_id, cycle },
            TimerId::RoundStep => Event::RoundStepTimer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_maps_to_timer_priority_event() {
        let ids = [
            TimerId::WalletRefresh,
            TimerId::DeferredRefresh,
            TimerId::ConsensusPoll,
            TimerId::NodeSettle {
                node_id: NodeId::from("node_1"),
                cycle: 3,
            },
            TimerId::NodeIdle {
                node_id: NodeId::from("node_1"),
                cycle: 3,
            },
            TimerId::RoundStep,
        ];

        for id in ids {
            assert_eq!(id.into_event().priority(), EventPriority::Timer);
        }
    }

    #[test]
    fn test_node_timer_keeps_cycle() {
        let event = TimerId::NodeSettle {
            node_id: NodeId::from("node_4"),
            cycle: 7,
        }
        .into_event();

        match event {
            Event::NodeSettleTimer { node_id, cycle } => {
                assert_eq!(node_id.as_str(), "node_4");
                assert_eq!(cycle, 7);
            }
            other => panic!("unexpected event {:?}", other),
        }
    }
}
