//! Consensus monitor sub-state machine.

use crate::board::AnimationBoard;
use crate::config::ConsensusConfig;
use crate::delay::{RandomDelaySource, SettleDelaySource};
use crate::round::{RoundSimulation, RoundStep};
use fba_core::{
    Action, Command, Event, NotifyLevel, RemoteRequest, RemoteResponse, SubStateMachine,
    TimerId, ViewUpdate,
};
use fba_types::{
    short_hash, NodeDetail, NodeDirectory, NodeId, PendingSet, RemoteError, TransactionConsensus,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, trace, warn};

/// Consensus monitor.
///
/// Handles:
/// - Loading the node directory (retried on each poll until it succeeds)
/// - Polling the pending set and animating node phases from it
/// - The round simulation overlay
/// - Node detail and per-transaction consensus views
///
/// Failed reads leave the animation untouched; the next poll tries again.
#[derive(Debug)]
pub struct ConsensusMonitor {
    config: ConsensusConfig,
    directory: Option<Arc<NodeDirectory>>,
    board: AnimationBoard,
    round: RoundSimulation,
    delays: Box<dyn SettleDelaySource>,
    directory_in_flight: bool,
    pending_in_flight: bool,
    detail_open: Option<NodeId>,
    now: Duration,
}

impl ConsensusMonitor {
    /// Create a monitor drawing settle delays from a ChaCha8 source seeded
    /// with `seed`.
    pub fn new(config: ConsensusConfig, seed: u64) -> Self {
        let delays = RandomDelaySource::new(seed, config.settle_min, config.settle_max);
        Self::with_delay_source(config, Box::new(delays))
    }

    /// Create a monitor with an explicit delay source.
    pub fn with_delay_source(config: ConsensusConfig, delays: Box<dyn SettleDelaySource>) -> Self {
        let round = RoundSimulation::new(config.round_step);
        Self {
            config,
            directory: None,
            board: AnimationBoard::new(),
            round,
            delays,
            directory_in_flight: false,
            pending_in_flight: false,
            detail_open: None,
            now: Duration::ZERO,
        }
    }

    pub fn directory(&self) -> Option<&Arc<NodeDirectory>> {
        self.directory.as_ref()
    }

    pub fn board(&self) -> &AnimationBoard {
        &self.board
    }

    pub fn round(&self) -> &RoundSimulation {
        &self.round
    }

    /// Node whose detail view is open.
    pub fn detail_open(&self) -> Option<&NodeId> {
        self.detail_open.as_ref()
    }

    /// Load the directory and start the poll cadence.
    pub fn initialize(&mut self) -> Vec<Action> {
        info!(
            poll_interval = ?self.config.poll_interval,
            "Starting consensus monitor"
        );
        let mut actions = Vec::new();
        actions.extend(self.request_directory());
        actions.push(self.arm_poll());
        actions
    }

    fn arm_poll(&self) -> Action {
        Action::SetTimer {
            id: TimerId::ConsensusPoll,
            duration: self.config.poll_interval,
        }
    }

    fn request_directory(&mut self) -> Option<Action> {
        if self.directory_in_flight {
            return None;
        }
        self.directory_in_flight = true;
        Some(Action::request(RemoteRequest::ListNodes))
    }

    fn render_nodes(&self) -> Option<Action> {
        let directory = self.directory.clone()?;
        Some(Action::Render(ViewUpdate::Nodes(
            self.board.snapshot(directory, self.round.label()),
        )))
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Directory and pending poll
    // ═══════════════════════════════════════════════════════════════════════

    fn on_poll_timer(&mut self) -> Vec<Action> {
        let mut actions = vec![self.arm_poll()];

        if self.directory.is_none() {
            actions.extend(self.request_directory());
        }

        if self.pending_in_flight {
            debug!("Pending read still in flight, skipping poll");
            return actions;
        }
        self.pending_in_flight = true;
        actions.push(Action::request(RemoteRequest::GetPending));
        actions
    }

    fn on_directory(&mut self, result: &Result<NodeDirectory, RemoteError>) -> Vec<Action> {
        self.directory_in_flight = false;
        let directory = match result {
            Ok(directory) => directory,
            Err(e) => {
                warn!(error = %e, "Failed to load node directory");
                return vec![];
            }
        };

        info!(nodes = directory.len(), "Node directory loaded");
        let directory = Arc::new(directory.clone());
        let mut actions = self.board.sync_directory(&directory);
        self.directory = Some(directory);
        actions.extend(self.render_nodes());
        actions
    }

    fn on_pending(&mut self, result: &Result<PendingSet, RemoteError>) -> Vec<Action> {
        self.pending_in_flight = false;
        let pending = match result {
            Ok(pending) => pending,
            Err(e) => {
                warn!(error = %e, "Failed to poll pending transactions");
                return vec![];
            }
        };

        let mut actions = if pending.is_empty() {
            if self.board.is_quiet() {
                return vec![];
            }
            debug!("Nothing pending, resetting nodes");
            self.board.reset_all()
        } else {
            let started = self.board.begin_voting(self.now, self.delays.as_mut());
            if started.is_empty() {
                return vec![];
            }
            debug!(pending = pending.len(), voting = started.len(), "Nodes voting");
            started
        };
        actions.extend(self.render_nodes());
        actions
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Per-node timers and round simulation
    // ═══════════════════════════════════════════════════════════════════════

    fn on_settle_timer(&mut self, node_id: &NodeId, cycle: u64) -> Vec<Action> {
        let Some(next) = self
            .board
            .settle(node_id, cycle, self.now, self.config.settle_hold)
        else {
            return vec![];
        };
        trace!(node = %node_id, cycle, "Node settling");
        let mut actions = vec![next];
        actions.extend(self.render_nodes());
        actions
    }

    fn on_idle_timer(&mut self, node_id: &NodeId, cycle: u64) -> Vec<Action> {
        if !self.board.finish(node_id, cycle) {
            return vec![];
        }
        trace!(node = %node_id, cycle, "Node idle");
        self.render_nodes().into_iter().collect()
    }

    fn on_simulate(&mut self, transaction_hash: &str) -> Vec<Action> {
        let hash = transaction_hash.trim();
        if hash.is_empty() {
            return vec![Action::notify(
                NotifyLevel::Error,
                "Please enter a transaction hash",
            )];
        }
        match self.round.start(hash) {
            Some(timer) => vec![
                timer,
                Action::notify(
                    NotifyLevel::Info,
                    format!("Simulating consensus round for {}...", short_hash(hash)),
                ),
            ],
            None => vec![Action::notify(
                NotifyLevel::Info,
                "A consensus round simulation is already running",
            )],
        }
    }

    fn on_round_step(&mut self) -> Vec<Action> {
        let (step, next) = self.round.advance();
        if step == RoundStep::Idle {
            return vec![];
        }
        let mut actions: Vec<Action> = next.into_iter().collect();
        actions.extend(self.render_nodes());
        actions
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Detail views
    // ═══════════════════════════════════════════════════════════════════════

    fn on_show_detail(&mut self, node_id: &NodeId) -> Vec<Action> {
        let Some(directory) = self.directory.as_ref() else {
            return vec![Action::notify(
                NotifyLevel::Error,
                "Node directory not loaded yet",
            )];
        };
        match NodeDetail::from_directory(directory, node_id, self.board.phase(node_id)) {
            Some(detail) => {
                self.detail_open = Some(node_id.clone());
                vec![Action::Render(ViewUpdate::NodeDetail(detail))]
            }
            None => vec![Action::notify(
                NotifyLevel::Error,
                format!("Unknown node: {}", node_id),
            )],
        }
    }

    fn on_close_detail(&mut self) -> Vec<Action> {
        self.detail_open = None;
        vec![Action::Render(ViewUpdate::CloseDetail)]
    }

    fn on_inspect(&mut self, transaction_hash: &str) -> Vec<Action> {
        let hash = transaction_hash.trim();
        if hash.is_empty() {
            return vec![Action::notify(
                NotifyLevel::Error,
                "Please enter a transaction hash",
            )];
        }
        vec![Action::request(RemoteRequest::GetConsensusStatus {
            transaction_hash: hash.to_string(),
        })]
    }

    fn on_consensus_status(
        &mut self,
        transaction_hash: &str,
        result: &Result<TransactionConsensus, RemoteError>,
    ) -> Vec<Action> {
        match result {
            Ok(status) => vec![Action::Render(ViewUpdate::TransactionConsensus(
                status.clone(),
            ))],
            Err(e) => {
                warn!(hash = transaction_hash, error = %e, "Consensus status read failed");
                vec![Action::notify(
                    NotifyLevel::Error,
                    format!("Error fetching consensus status: {}", e.user_message()),
                )]
            }
        }
    }
}

impl SubStateMachine for ConsensusMonitor {
    fn try_handle(&mut self, event: &Event) -> Option<Vec<Action>> {
        match event {
            Event::ConsensusPollTimer => Some(self.on_poll_timer()),
            Event::NodeSettleTimer { node_id, cycle } => {
                Some(self.on_settle_timer(node_id, *cycle))
            }
            Event::NodeIdleTimer { node_id, cycle } => Some(self.on_idle_timer(node_id, *cycle)),
            Event::RoundStepTimer => Some(self.on_round_step()),

            Event::RemoteCompleted(response) => match response {
                RemoteResponse::NodesListed(result) => Some(self.on_directory(result)),
                RemoteResponse::PendingListed(result) => Some(self.on_pending(result)),
                RemoteResponse::ConsensusStatus {
                    transaction_hash,
                    result,
                } => Some(self.on_consensus_status(transaction_hash, result)),
                _ => None,
            },

            Event::Command(command) => match command {
                Command::ShowNodeDetail { node_id } => Some(self.on_show_detail(node_id)),
                Command::CloseNodeDetail => Some(self.on_close_detail()),
                Command::SimulateRound { transaction_hash } => {
                    Some(self.on_simulate(transaction_hash))
                }
                Command::InspectTransaction { transaction_hash } => {
                    Some(self.on_inspect(transaction_hash))
                }
                _ => None,
            },

            _ => None,
        }
    }

    fn set_time(&mut self, now: Duration) {
        self.now = now;
    }
}
