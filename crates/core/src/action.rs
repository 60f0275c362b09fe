//! Action types for the deterministic state machine.

use crate::{RemoteRequest, TimerId};
use fba_types::{
    NetworkStats, NodeDetail, NodeSnapshot, TransactionConsensus, TransactionRecord,
};
use std::fmt;
use std::time::Duration;

/// Actions the state machine wants to perform.
///
/// Actions are **commands** - they describe something to do.
/// The runner executes actions and may convert results back into events.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // ═══════════════════════════════════════════════════════════════════════
    // Remote
    // ═══════════════════════════════════════════════════════════════════════
    /// Issue one call to the remote authority.
    ///
    /// Returns `Event::RemoteCompleted` when the call settles.
    Request { request: RemoteRequest },

    // ═══════════════════════════════════════════════════════════════════════
    // Timers
    // ═══════════════════════════════════════════════════════════════════════
    /// Set a timer to fire after a duration, replacing one with the same id.
    SetTimer { id: TimerId, duration: Duration },

    /// Cancel a previously set timer. No-op when it is not armed.
    CancelTimer { id: TimerId },

    // ═══════════════════════════════════════════════════════════════════════
    // Display
    // ═══════════════════════════════════════════════════════════════════════
    /// Update the display surface.
    Render(ViewUpdate),

    /// Show a transient message. Fire-and-forget.
    Notify { message: String, level: NotifyLevel },
}

impl Action {
    /// Shorthand for a request action.
    pub fn request(request: RemoteRequest) -> Self {
        Action::Request { request }
    }

    /// Shorthand for a notification action.
    pub fn notify(level: NotifyLevel, message: impl Into<String>) -> Self {
        Action::Notify {
            message: message.into(),
            level,
        }
    }

    /// Get the action type name for telemetry.
    pub fn type_name(&self) -> &'static str {
        match self {
            Action::Request { .. } => "Request",
            Action::SetTimer { .. } => "SetTimer",
            Action::CancelTimer { .. } => "CancelTimer",
            Action::Render(_) => "Render",
            Action::Notify { .. } => "Notify",
        }
    }

    /// Check if this action performs remote I/O.
    pub fn is_remote(&self) -> bool {
        matches!(self, Action::Request { .. })
    }
}

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotifyLevel {
    Success,
    Error,
    Info,
}

impl fmt::Display for NotifyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotifyLevel::Success => f.write_str("success"),
            NotifyLevel::Error => f.write_str("error"),
            NotifyLevel::Info => f.write_str("info"),
        }
    }
}

/// A change to the display surface.
///
/// Every collection update is a full replacement; the surface never
/// receives a delta.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewUpdate {
    /// Switch from setup to the dashboard of `address`.
    Dashboard { address: String },

    /// Return to the setup screen.
    Setup,

    /// Clear the recipient and amount fields.
    ClearTransferForm,

    Balance(f64),

    History(Vec<TransactionRecord>),

    Stats(NetworkStats),

    Nodes(NodeSnapshot),

    /// Open the detail view of one node.
    NodeDetail(NodeDetail),

    /// Release the detail view.
    CloseDetail,

    TransactionConsensus(TransactionConsensus),
}

impl ViewUpdate {
    /// Get the update name for telemetry.
    pub fn type_name(&self) -> &'static str {
        match self {
            ViewUpdate::Dashboard { .. } => "Dashboard",
            ViewUpdate::Setup => "Setup",
            ViewUpdate::ClearTransferForm => "ClearTransferForm",
            ViewUpdate::Balance(_) => "Balance",
            ViewUpdate::History(_) => "History",
            ViewUpdate::Stats(_) => "Stats",
            ViewUpdate::Nodes(_) => "Nodes",
            ViewUpdate::NodeDetail(_) => "NodeDetail",
            ViewUpdate::CloseDetail => "CloseDetail",
            ViewUpdate::TransactionConsensus(_) => "TransactionConsensus",
        }
    }
}
