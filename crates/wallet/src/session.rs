//! The single wallet session.

use fba_types::WalletIdentity;

/// Remote operation that will produce an identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingOp {
    Generate,
    Import,
}

impl PendingOp {
    /// Verb used in notifications ("generating", "importing").
    pub fn verb(&self) -> &'static str {
        match self {
            PendingOp::Generate => "generating",
            PendingOp::Import => "importing",
        }
    }
}

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionPhase {
    /// No wallet; the setup screen is shown.
    Setup,
    /// A generate or import is outstanding.
    Pending(PendingOp),
    /// A wallet is loaded.
    Active(WalletIdentity),
}

/// Holds at most one wallet identity.
///
/// Each generate/import attempt opens a new session number and every
/// wallet-scoped request is tagged with it. Discarding bumps the number
/// again, so anything still in flight for the old session no longer
/// matches and is dropped on arrival.
#[derive(Debug)]
pub struct WalletSession {
    phase: SessionPhase,
    number: u64,
}

impl Default for WalletSession {
    fn default() -> Self {
        Self::new()
    }
}

impl WalletSession {
    pub fn new() -> Self {
        Self {
            phase: SessionPhase::Setup,
            number: 0,
        }
    }

    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    /// Current session number.
    pub fn number(&self) -> u64 {
        self.number
    }

    /// The active identity, if any.
    pub fn active(&self) -> Option<&WalletIdentity> {
        match &self.phase {
            SessionPhase::Active(identity) => Some(identity),
            _ => None,
        }
    }

    /// The outstanding generate/import, if any.
    pub fn pending(&self) -> Option<PendingOp> {
        match self.phase {
            SessionPhase::Pending(op) => Some(op),
            _ => None,
        }
    }

    /// Start a generate/import. Returns the session number to tag it with.
    ///
    /// Callers check that the session is in setup first.
    pub fn begin(&mut self, op: PendingOp) -> u64 {
        self.number += 1;
        self.phase = SessionPhase::Pending(op);
        self.number
    }

    /// Whether a generate/import result for `session` is still wanted.
    pub fn awaits(&self, session: u64, op: PendingOp) -> bool {
        session == self.number && self.phase == SessionPhase::Pending(op)
    }

    /// Install the identity produced by the outstanding operation.
    pub fn activate(&mut self, identity: WalletIdentity) {
        self.phase = SessionPhase::Active(identity);
    }

    /// The outstanding operation failed; back to setup.
    pub fn fail(&mut self) {
        self.phase = SessionPhase::Setup;
    }

    /// Whether a wallet-scoped result for `session` belongs to the active wallet.
    pub fn is_current(&self, session: u64) -> bool {
        session == self.number && matches!(self.phase, SessionPhase::Active(_))
    }

    /// End the session. Returns the identity that was active, if any.
    pub fn discard(&mut self) -> Option<WalletIdentity> {
        self.number += 1;
        match std::mem::replace(&mut self.phase, SessionPhase::Setup) {
            SessionPhase::Active(identity) => Some(identity),
            _ => None,
        }
    }
}
