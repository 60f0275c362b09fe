//! Wallet sub-state machine.

use crate::config::WalletConfig;
use crate::scheduler::PollingScheduler;
use crate::session::{PendingOp, SessionPhase, WalletSession};
use crate::submitter::{Settled, TransactionSubmitter};
use crate::validation::validate_seed;
use fba_core::{
    Action, Command, Event, NotifyLevel, RemoteRequest, RemoteResponse, SubStateMachine,
    ViewUpdate,
};
use fba_types::{RemoteError, WalletIdentity};
use std::time::Duration;
use tracing::{debug, info, trace, warn};

/// Wallet state machine.
///
/// Handles:
/// - The wallet session lifecycle (generate, import, discard)
/// - The recurring balance/history/stats refresh
/// - Transfer and faucet submission
///
/// Results tagged with a session number other than the current one are
/// dropped.
#[derive(Debug)]
pub struct WalletState {
    session: WalletSession,
    scheduler: PollingScheduler,
    submitter: TransactionSubmitter,
}

impl WalletState {
    pub fn new(config: WalletConfig) -> Self {
        Self {
            session: WalletSession::new(),
            scheduler: PollingScheduler::new(config),
            submitter: TransactionSubmitter::new(),
        }
    }

    pub fn session(&self) -> &WalletSession {
        &self.session
    }

    pub fn scheduler(&self) -> &PollingScheduler {
        &self.scheduler
    }

    pub fn submitter(&self) -> &TransactionSubmitter {
        &self.submitter
    }

    /// The active identity, if any.
    pub fn active(&self) -> Option<&WalletIdentity> {
        self.session.active()
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Session lifecycle
    // ═══════════════════════════════════════════════════════════════════════

    /// Reject a generate/import unless the session is in setup.
    fn check_setup(&self) -> Option<Action> {
        match self.session.phase() {
            SessionPhase::Setup => None,
            SessionPhase::Pending(op) => Some(Action::notify(
                NotifyLevel::Info,
                format!("Still {} wallet, please wait", op.verb()),
            )),
            SessionPhase::Active(_) => Some(Action::notify(
                NotifyLevel::Info,
                "A wallet is already loaded. Discard it first",
            )),
        }
    }

    pub fn on_generate(&mut self) -> Vec<Action> {
        if let Some(rejected) = self.check_setup() {
            return vec![rejected];
        }
        let session = self.session.begin(PendingOp::Generate);
        debug!(session, "Generating wallet");
        vec![
            Action::notify(NotifyLevel::Info, "Generating wallet..."),
            Action::request(RemoteRequest::GenerateWallet { session }),
        ]
    }

    pub fn on_import(&mut self, seed: &str) -> Vec<Action> {
        if let Some(rejected) = self.check_setup() {
            return vec![rejected];
        }
        let seed = match validate_seed(seed) {
            Ok(seed) => seed.to_string(),
            Err(e) => {
                debug!(error = %e, "Seed rejected locally");
                return vec![Action::notify(NotifyLevel::Error, e.to_string())];
            }
        };
        let session = self.session.begin(PendingOp::Import);
        debug!(session, "Importing wallet");
        vec![
            Action::notify(NotifyLevel::Info, "Importing wallet..."),
            Action::request(RemoteRequest::ImportWallet { session, seed }),
        ]
    }

    fn on_identity(
        &mut self,
        op: PendingOp,
        session: u64,
        result: &Result<WalletIdentity, RemoteError>,
    ) -> Vec<Action> {
        if !self.session.awaits(session, op) {
            debug!(session, ?op, "Ignoring wallet result for abandoned session");
            return vec![];
        }

        let (done, failed) = match op {
            PendingOp::Generate => ("Wallet generated successfully!", "Error generating wallet"),
            PendingOp::Import => ("Wallet imported successfully!", "Error importing wallet"),
        };

        match result {
            Ok(identity) => {
                info!(session, address = %identity.address, "Wallet session active");
                self.session.activate(identity.clone());
                let mut actions = vec![
                    Action::Render(ViewUpdate::Dashboard {
                        address: identity.address.clone(),
                    }),
                    Action::notify(NotifyLevel::Success, done),
                ];
                actions.extend(self.scheduler.start(session, identity));
                actions
            }
            Err(e) => {
                warn!(session, ?op, error = %e, "Wallet operation failed");
                self.session.fail();
                vec![Action::notify(
                    NotifyLevel::Error,
                    format!("{}: {}", failed, e.user_message()),
                )]
            }
        }
    }

    pub fn on_discard(&mut self) -> Vec<Action> {
        if self.session.phase() == &SessionPhase::Setup {
            return vec![Action::notify(NotifyLevel::Info, "No wallet loaded")];
        }
        let discarded = self.session.discard();
        self.submitter.reset();
        info!(
            address = discarded.as_ref().map(|w| w.address.as_str()).unwrap_or("-"),
            "Wallet session discarded"
        );

        let mut actions = self.scheduler.stop();
        actions.push(Action::Render(ViewUpdate::Setup));
        actions.push(Action::notify(NotifyLevel::Info, "Wallet discarded"));
        actions
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Refresh and submission
    // ═══════════════════════════════════════════════════════════════════════

    fn on_refresh_timer(&mut self) -> Vec<Action> {
        let session = self.session.number();
        match self.session.active() {
            Some(wallet) => self.scheduler.on_refresh_timer(session, wallet),
            None => vec![],
        }
    }

    fn on_deferred_timer(&mut self) -> Vec<Action> {
        let session = self.session.number();
        match self.session.active() {
            Some(wallet) => self.scheduler.on_deferred_timer(session, wallet),
            None => vec![],
        }
    }

    fn on_refresh_history(&mut self) -> Vec<Action> {
        let session = self.session.number();
        match self.session.active() {
            Some(wallet) => self.scheduler.refresh_history(session, wallet),
            None => vec![Action::notify(NotifyLevel::Error, "No wallet loaded")],
        }
    }

    fn on_submit(&mut self, to: &str, amount: &str) -> Vec<Action> {
        let session = self.session.number();
        self.submitter.submit(self.session.active(), session, to, amount)
    }

    fn on_faucet(&mut self) -> Vec<Action> {
        let session = self.session.number();
        self.submitter.request_faucet(self.session.active(), session)
    }

    fn finish_submission(&self, settled: Settled) -> Vec<Action> {
        let mut actions = settled.actions;
        if settled.refresh {
            actions.push(self.scheduler.schedule_deferred());
        }
        actions
    }

    /// Route a wallet-scoped response.
    fn on_response(&mut self, response: &RemoteResponse) -> Vec<Action> {
        match response {
            RemoteResponse::WalletGenerated { session, result } => {
                return self.on_identity(PendingOp::Generate, *session, result);
            }
            RemoteResponse::WalletImported { session, result } => {
                return self.on_identity(PendingOp::Import, *session, result);
            }
            _ => {}
        }

        let Some(session) = response.session() else {
            return vec![];
        };
        if !self.session.is_current(session) {
            trace!(
                session,
                current = self.session.number(),
                response = response.type_name(),
                "Dropping stale wallet response"
            );
            return vec![];
        }
        let Some(wallet) = self.session.active().cloned() else {
            return vec![];
        };

        match response {
            RemoteResponse::Balance { result, .. } => {
                self.scheduler.on_balance(result, session, &wallet)
            }
            RemoteResponse::History { result, .. } => {
                self.scheduler.on_history(result, session, &wallet)
            }
            RemoteResponse::NetworkStats { result, .. } => {
                self.scheduler.on_stats(result, session, &wallet)
            }
            RemoteResponse::TransferSent { result, .. } => {
                let settled = self.submitter.on_transfer_sent(result);
                self.finish_submission(settled)
            }
            RemoteResponse::FaucetGranted { result, .. } => {
                let settled = self.submitter.on_faucet_granted(result);
                self.finish_submission(settled)
            }
            _ => vec![],
        }
    }
}

impl SubStateMachine for WalletState {
    fn try_handle(&mut self, event: &Event) -> Option<Vec<Action>> {
        match event {
            Event::WalletRefreshTimer => Some(self.on_refresh_timer()),
            Event::DeferredRefreshTimer => Some(self.on_deferred_timer()),

            Event::Command(command) => match command {
                Command::GenerateWallet => Some(self.on_generate()),
                Command::ImportWallet { seed } => Some(self.on_import(seed)),
                Command::DiscardWallet => Some(self.on_discard()),
                Command::SubmitTransfer { to, amount } => Some(self.on_submit(to, amount)),
                Command::RequestFaucet => Some(self.on_faucet()),
                Command::RefreshHistory => Some(self.on_refresh_history()),
                _ => None,
            },

            Event::RemoteCompleted(response) if response.session().is_some() => {
                Some(self.on_response(response))
            }

            _ => None,
        }
    }

    // Deadlines are owned by the runner's timers; nothing here reads the clock.
    fn set_time(&mut self, _now: Duration) {}
}
