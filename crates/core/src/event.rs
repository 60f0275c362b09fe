//! Event types for the deterministic state machine.

use crate::{Command, RemoteResponse};
use fba_types::NodeId;

/// Priority levels for event ordering within the same timestamp.
///
/// Events at the same simulation time are processed in priority order.
/// Lower values = higher priority (processed first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum EventPriority {
    /// Timer events: scheduled by the console itself.
    Timer = 0,

    /// Remote events: completions of calls to the ledger authority.
    Remote = 1,

    /// Client events: commands typed by the user.
    Client = 2,
}

/// All possible events the console can receive.
///
/// Events are **passive data** - they describe something that happened.
/// The state machine processes events and returns actions.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    // ═══════════════════════════════════════════════════════════════════════
    // Timers (priority: Timer)
    // ═══════════════════════════════════════════════════════════════════════
    /// Recurring wallet refresh cadence.
    WalletRefreshTimer,

    /// One-shot refresh after a successful send or faucet grant.
    DeferredRefreshTimer,

    /// Recurring pending-transaction poll.
    ConsensusPollTimer,

    /// A voting node's randomized deadline elapsed.
    NodeSettleTimer { node_id: NodeId, cycle: u64 },

    /// A settling node's hold elapsed.
    NodeIdleTimer { node_id: NodeId, cycle: u64 },

    /// Advance the round-simulation label.
    RoundStepTimer,

    // ═══════════════════════════════════════════════════════════════════════
    // Remote completions (priority: Remote)
    // ═══════════════════════════════════════════════════════════════════════
    /// A remote call settled.
    RemoteCompleted(RemoteResponse),

    // ═══════════════════════════════════════════════════════════════════════
    // User input (priority: Client)
    // ═══════════════════════════════════════════════════════════════════════
    Command(Command),
}

impl Event {
    /// Get the priority of this event for ordering.
    pub fn priority(&self) -> EventPriority {
        match self {
            Event::WalletRefreshTimer
            | Event::DeferredRefreshTimer
            | Event::ConsensusPollTimer
            | Event::NodeSettleTimer { .. }
            | Event::NodeIdleTimer { .. }
            | Event::RoundStepTimer => EventPriority::Timer,

            Event::RemoteCompleted(_) => EventPriority::Remote,

            Event::Command(_) => EventPriority::Client,
        }
    }

    /// Check if this is a timer event.
    pub fn is_timer(&self) -> bool {
        self.priority() == EventPriority::Timer
    }

    /// Get the event type name for telemetry.
    pub fn type_name(&self) -> &'static str {
        match self {
            Event::WalletRefreshTimer => "WalletRefreshTimer",
            Event::DeferredRefreshTimer => "DeferredRefreshTimer",
            Event::ConsensusPollTimer => "ConsensusPollTimer",
            Event::NodeSettleTimer { .. } => "NodeSettleTimer",
            Event::NodeIdleTimer { .. } => "NodeIdleTimer",
            Event::RoundStepTimer => "RoundStepTimer",
            Event::RemoteCompleted(response) => response.type_name(),
            Event::Command(command) => command.type_name(),
        }
    }
}

impl From<Command> for Event {
    fn from(command: Command) -> Self {
        Event::Command(command)
    }
}

impl From<RemoteResponse> for Event {
    fn from(response: RemoteResponse) -> Self {
        Event::RemoteCompleted(response)
    }
}
