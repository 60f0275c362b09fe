//! Recurring wallet refresh.
//!
//! A refresh tick reads balance, history and network stats concurrently and
//! completes once all three have settled. Each resource has at most one read
//! in flight; a cadence firing during a tick is coalesced into a single
//! follow-up tick that starts as soon as the current one completes.

use crate::config::WalletConfig;
use fba_core::{Action, NotifyLevel, RemoteRequest, TimerId, ViewUpdate};
use fba_types::{NetworkStats, RemoteError, TransactionRecord, WalletIdentity};
use tracing::{debug, trace, warn};

/// A resource read by the refresh cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Balance,
    History,
    Stats,
}

impl Resource {
    fn name(&self) -> &'static str {
        match self {
            Resource::Balance => "balance",
            Resource::History => "history",
            Resource::Stats => "stats",
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct InFlight {
    balance: bool,
    history: bool,
    stats: bool,
}

impl InFlight {
    fn get(&self, resource: Resource) -> bool {
        match resource {
            Resource::Balance => self.balance,
            Resource::History => self.history,
            Resource::Stats => self.stats,
        }
    }

    fn set(&mut self, resource: Resource, value: bool) {
        match resource {
            Resource::Balance => self.balance = value,
            Resource::History => self.history = value,
            Resource::Stats => self.stats = value,
        }
    }

    fn any(&self) -> bool {
        self.balance || self.history || self.stats
    }
}

/// Owns the refresh cadence of the active wallet.
#[derive(Debug)]
pub struct PollingScheduler {
    config: WalletConfig,
    running: bool,
    in_flight: InFlight,
    /// A tick is running and waits for all its reads to settle.
    tick_active: bool,
    /// A cadence fired while a tick was running.
    tick_queued: bool,
    /// First failure of the running tick.
    tick_error: Option<String>,
    ticks_completed: u64,
}

impl PollingScheduler {
    pub fn new(config: WalletConfig) -> Self {
        Self {
            config,
            running: false,
            in_flight: InFlight::default(),
            tick_active: false,
            tick_queued: false,
            tick_error: None,
            ticks_completed: 0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Whether a tick is waiting for reads to settle.
    pub fn tick_in_flight(&self) -> bool {
        self.tick_active
    }

    /// Whether a read of `resource` is outstanding.
    pub fn is_in_flight(&self, resource: Resource) -> bool {
        self.in_flight.get(resource)
    }

    pub fn ticks_completed(&self) -> u64 {
        self.ticks_completed
    }

    /// Start (or restart) the cadence and run the first tick immediately.
    ///
    /// Re-arming replaces the previous timer, so repeated starts never stack.
    pub fn start(&mut self, session: u64, wallet: &WalletIdentity) -> Vec<Action> {
        self.reset();
        self.running = true;
        debug!(
            interval_ms = self.config.refresh_interval.as_millis() as u64,
            "Wallet refresh started"
        );

        let mut actions = vec![Action::SetTimer {
            id: TimerId::WalletRefresh,
            duration: self.config.refresh_interval,
        }];
        actions.extend(self.begin_tick(session, wallet));
        actions
    }

    /// Stop the cadence and drop any pending deferred refresh.
    ///
    /// Reads already in flight are not cancelled; their results are
    /// discarded by the session check upstream.
    pub fn stop(&mut self) -> Vec<Action> {
        if !self.running {
            return vec![];
        }
        self.reset();
        debug!("Wallet refresh stopped");
        vec![
            Action::CancelTimer {
                id: TimerId::WalletRefresh,
            },
            Action::CancelTimer {
                id: TimerId::DeferredRefresh,
            },
        ]
    }

    fn reset(&mut self) {
        self.running = false;
        self.in_flight = InFlight::default();
        self.tick_active = false;
        self.tick_queued = false;
        self.tick_error = None;
    }

    /// The recurring cadence fired.
    pub fn on_refresh_timer(&mut self, session: u64, wallet: &WalletIdentity) -> Vec<Action> {
        if !self.running {
            return vec![];
        }
        let mut actions = vec![Action::SetTimer {
            id: TimerId::WalletRefresh,
            duration: self.config.refresh_interval,
        }];
        actions.extend(self.request_tick(session, wallet));
        actions
    }

    /// Arm the one-shot refresh that follows a successful submit.
    pub fn schedule_deferred(&self) -> Action {
        Action::SetTimer {
            id: TimerId::DeferredRefresh,
            duration: self.config.deferred_refresh,
        }
    }

    /// The one-shot refresh fired.
    pub fn on_deferred_timer(&mut self, session: u64, wallet: &WalletIdentity) -> Vec<Action> {
        if !self.running {
            return vec![];
        }
        self.request_tick(session, wallet)
    }

    /// Re-read history only, unless a history read is already in flight.
    pub fn refresh_history(&mut self, session: u64, wallet: &WalletIdentity) -> Vec<Action> {
        if !self.running {
            return vec![];
        }
        if self.in_flight.history {
            trace!("History read already in flight");
            return vec![];
        }
        self.in_flight.history = true;
        vec![self.read(Resource::History, session, wallet)]
    }

    fn request_tick(&mut self, session: u64, wallet: &WalletIdentity) -> Vec<Action> {
        if self.tick_active {
            debug!("Refresh tick still in flight, coalescing");
            self.tick_queued = true;
            return vec![];
        }
        self.begin_tick(session, wallet)
    }

    fn begin_tick(&mut self, session: u64, wallet: &WalletIdentity) -> Vec<Action> {
        self.tick_active = true;
        self.tick_error = None;

        let mut actions = Vec::with_capacity(3);
        for resource in [Resource::Balance, Resource::History, Resource::Stats] {
            // A read already in flight (manual history refresh) counts
            // towards this tick.
            if !self.in_flight.get(resource) {
                self.in_flight.set(resource, true);
                actions.push(self.read(resource, session, wallet));
            }
        }
        trace!(reads = actions.len(), "Refresh tick started");
        actions
    }

    fn read(&self, resource: Resource, session: u64, wallet: &WalletIdentity) -> Action {
        let request = match resource {
            Resource::Balance => RemoteRequest::GetBalance {
                session,
                address: wallet.address.clone(),
            },
            Resource::History => RemoteRequest::GetHistory {
                session,
                address: wallet.address.clone(),
                limit: self.config.history_limit,
            },
            Resource::Stats => RemoteRequest::GetNetworkStats { session },
        };
        Action::request(request)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Results
    // ═══════════════════════════════════════════════════════════════════════

    pub fn on_balance(
        &mut self,
        result: &Result<f64, RemoteError>,
        session: u64,
        wallet: &WalletIdentity,
    ) -> Vec<Action> {
        let render = result.as_ref().ok().map(|b| ViewUpdate::Balance(*b));
        self.settle(Resource::Balance, result.as_ref().err(), render, session, wallet)
    }

    pub fn on_history(
        &mut self,
        result: &Result<Vec<TransactionRecord>, RemoteError>,
        session: u64,
        wallet: &WalletIdentity,
    ) -> Vec<Action> {
        let render = result
            .as_ref()
            .ok()
            .map(|records| ViewUpdate::History(records.clone()));
        self.settle(Resource::History, result.as_ref().err(), render, session, wallet)
    }

    pub fn on_stats(
        &mut self,
        result: &Result<NetworkStats, RemoteError>,
        session: u64,
        wallet: &WalletIdentity,
    ) -> Vec<Action> {
        let render = result
            .as_ref()
            .ok()
            .map(|stats| ViewUpdate::Stats(stats.clone()));
        self.settle(Resource::Stats, result.as_ref().err(), render, session, wallet)
    }

    fn settle(
        &mut self,
        resource: Resource,
        error: Option<&RemoteError>,
        render: Option<ViewUpdate>,
        session: u64,
        wallet: &WalletIdentity,
    ) -> Vec<Action> {
        if !self.running || !self.in_flight.get(resource) {
            trace!(resource = resource.name(), "Ignoring unexpected refresh result");
            return vec![];
        }
        self.in_flight.set(resource, false);

        let mut actions = Vec::new();
        match (render, error) {
            (Some(update), _) => actions.push(Action::Render(update)),
            (None, Some(e)) => {
                warn!(resource = resource.name(), error = %e, "Wallet refresh read failed");
                if self.tick_active {
                    self.tick_error
                        .get_or_insert_with(|| e.user_message().to_string());
                } else {
                    // Manual history refresh outside a tick
                    actions.push(Action::notify(
                        NotifyLevel::Error,
                        format!("Error refreshing {}: {}", resource.name(), e.user_message()),
                    ));
                }
            }
            (None, None) => {}
        }

        if self.tick_active && !self.in_flight.any() {
            actions.extend(self.complete_tick(session, wallet));
        }
        actions
    }

    fn complete_tick(&mut self, session: u64, wallet: &WalletIdentity) -> Vec<Action> {
        self.tick_active = false;
        self.ticks_completed += 1;

        let mut actions = Vec::new();
        if let Some(reason) = self.tick_error.take() {
            actions.push(Action::notify(
                NotifyLevel::Error,
                format!("Error refreshing wallet data: {}", reason),
            ));
        }
        trace!(ticks = self.ticks_completed, "Refresh tick complete");

        if std::mem::take(&mut self.tick_queued) {
            actions.extend(self.begin_tick(session, wallet));
        }
        actions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fba_test_helpers::test_identity;
    use std::time::Duration;

    fn requests(actions: &[Action]) -> Vec<&'static str> {
        actions
            .iter()
            .filter_map(|a| match a {
                Action::Request { request } => Some(request.kind()),
                _ => None,
            })
            .collect()
    }

    fn notifications(actions: &[Action]) -> Vec<&str> {
        actions
            .iter()
            .filter_map(|a| match a {
                Action::Notify { message, .. } => Some(message.as_str()),
                _ => None,
            })
            .collect()
    }

    fn started() -> (PollingScheduler, WalletIdentity) {
        let wallet = test_identity();
        let mut scheduler = PollingScheduler::new(WalletConfig::default());
        scheduler.start(1, &wallet);
        (scheduler, wallet)
    }

    #[test]
    fn test_start_arms_timer_and_ticks_immediately() {
        let wallet = test_identity();
        let mut scheduler = PollingScheduler::new(WalletConfig::default());

        let actions = scheduler.start(1, &wallet);

        assert_eq!(
            actions[0],
            Action::SetTimer {
                id: TimerId::WalletRefresh,
                duration: Duration::from_secs(10)
            }
        );
        assert_eq!(requests(&actions), vec!["get_balance", "get_history", "get_network_stats"]);
        assert!(scheduler.tick_in_flight());
    }

    #[test]
    fn test_timer_during_tick_is_coalesced() {
        let (mut scheduler, wallet) = started();

        // Two cadences fire while the first tick is outstanding
        let first = scheduler.on_refresh_timer(1, &wallet);
        let second = scheduler.on_refresh_timer(1, &wallet);
        assert!(requests(&first).is_empty());
        assert!(requests(&second).is_empty());

        scheduler.on_balance(&Ok(1.0), 1, &wallet);
        scheduler.on_history(&Ok(vec![]), 1, &wallet);
        let actions = scheduler.on_stats(&Ok(NetworkStats::default()), 1, &wallet);

        // Exactly one follow-up tick
        assert_eq!(requests(&actions), vec!["get_balance", "get_history", "get_network_stats"]);
        assert_eq!(scheduler.ticks_completed(), 1);
    }

    #[test]
    fn test_failed_tick_notifies_once() {
        let (mut scheduler, wallet) = started();
        let down = RemoteError::Transport("refused".into());

        let mut actions = scheduler.on_balance(&Err(down.clone()), 1, &wallet);
        actions.extend(scheduler.on_history(&Err(down.clone()), 1, &wallet));
        actions.extend(scheduler.on_stats(&Err(down), 1, &wallet));

        assert_eq!(
            notifications(&actions),
            vec!["Error refreshing wallet data: Unable to reach the ledger service"]
        );
        assert!(!scheduler.tick_in_flight());
    }

    #[test]
    fn test_partial_failure_still_renders_others() {
        let (mut scheduler, wallet) = started();

        let a = scheduler.on_balance(&Err(RemoteError::Rejected("nope".into())), 1, &wallet);
        let b = scheduler.on_history(&Ok(vec![]), 1, &wallet);
        let c = scheduler.on_stats(&Ok(NetworkStats::default()), 1, &wallet);

        assert!(a.is_empty());
        assert_eq!(b, vec![Action::Render(ViewUpdate::History(vec![]))]);
        assert_eq!(c.len(), 2);
        assert_eq!(notifications(&c), vec!["Error refreshing wallet data: nope"]);
    }

    #[test]
    fn test_manual_history_respects_in_flight() {
        let (mut scheduler, wallet) = started();

        // History already in flight as part of the first tick
        assert!(scheduler.refresh_history(1, &wallet).is_empty());

        scheduler.on_balance(&Ok(1.0), 1, &wallet);
        scheduler.on_history(&Ok(vec![]), 1, &wallet);
        scheduler.on_stats(&Ok(NetworkStats::default()), 1, &wallet);

        let actions = scheduler.refresh_history(1, &wallet);
        assert_eq!(requests(&actions), vec!["get_history"]);
        assert!(!scheduler.tick_in_flight());
    }

    #[test]
    fn test_tick_reuses_manual_history_read() {
        let (mut scheduler, wallet) = started();
        scheduler.on_balance(&Ok(1.0), 1, &wallet);
        scheduler.on_history(&Ok(vec![]), 1, &wallet);
        scheduler.on_stats(&Ok(NetworkStats::default()), 1, &wallet);

        scheduler.refresh_history(1, &wallet);
        let actions = scheduler.on_refresh_timer(1, &wallet);

        assert_eq!(requests(&actions), vec!["get_balance", "get_network_stats"]);
        scheduler.on_balance(&Ok(1.0), 1, &wallet);
        scheduler.on_stats(&Ok(NetworkStats::default()), 1, &wallet);
        assert!(scheduler.tick_in_flight());
        scheduler.on_history(&Ok(vec![]), 1, &wallet);
        assert!(!scheduler.tick_in_flight());
    }

    #[test]
    fn test_stop_cancels_and_ignores_later_timers() {
        let (mut scheduler, wallet) = started();

        let actions = scheduler.stop();
        assert!(actions.contains(&Action::CancelTimer {
            id: TimerId::WalletRefresh
        }));
        assert!(scheduler.on_refresh_timer(1, &wallet).is_empty());
        assert!(scheduler.on_deferred_timer(1, &wallet).is_empty());
        assert!(scheduler.stop().is_empty());
    }
}
