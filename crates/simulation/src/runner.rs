//! Deterministic simulation runner.
//!
//! Remote calls are answered inline by the [`ScriptedLedger`] and their
//! completions scheduled after the call's latency. Timers are queue entries
//! keyed by [`TimerId`]; setting one replaces it, cancelling removes it.

use crate::event_queue::EventKey;
use crate::ledger::ScriptedLedger;
use crate::surface::RecordingSurface;
use fba_consensus::SettleDelaySource;
use fba_core::{Action, Command, Event, StateMachine, TimerId};
use fba_node::{ConsoleStateMachine, StateMachineConfig};
use fba_types::{NodeId, NodePhase};
use fba_view::ViewReconciler;
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;
use tracing::{debug, trace};

/// Statistics collected during simulation.
#[derive(Debug, Default, Clone)]
pub struct SimulationStats {
    /// Total events processed.
    pub events_processed: u64,
    /// Events processed by priority.
    pub events_by_priority: [u64; 3],
    /// Total actions generated.
    pub actions_generated: u64,
    /// Remote calls issued.
    pub requests_issued: u64,
    /// Timers set.
    pub timers_set: u64,
    /// Timers cancelled while still armed.
    pub timers_cancelled: u64,
}

/// A node's phase change, as observed after the event that caused it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseChange {
    pub at: Duration,
    pub node_id: NodeId,
    pub from: NodePhase,
    pub to: NodePhase,
}

/// Deterministic simulation runner.
///
/// Drives one [`ConsoleStateMachine`] against a [`ScriptedLedger`], rendering
/// into a [`RecordingSurface`]. Given the same inputs it produces identical
/// results every run.
pub struct SimulationRunner {
    machine: ConsoleStateMachine,
    ledger: ScriptedLedger,
    view: ViewReconciler<RecordingSurface>,

    /// Global event queue, ordered deterministically.
    event_queue: BTreeMap<EventKey, Event>,

    /// Sequence counter for deterministic ordering.
    sequence: u64,

    /// Current simulation time.
    now: Duration,

    /// Armed timers, for replacement and cancellation.
    timers: HashMap<TimerId, EventKey>,

    /// Last observed phase of each node.
    phases: BTreeMap<NodeId, NodePhase>,
    phase_log: Vec<PhaseChange>,

    stats: SimulationStats,
}

impl SimulationRunner {
    /// Create a runner whose settle delays come from `delays`.
    pub fn new(
        config: StateMachineConfig,
        ledger: ScriptedLedger,
        delays: Box<dyn SettleDelaySource>,
    ) -> Self {
        Self::with_machine(ConsoleStateMachine::with_delay_source(config, delays), ledger)
    }

    /// Create a runner around an existing state machine.
    pub fn with_machine(machine: ConsoleStateMachine, ledger: ScriptedLedger) -> Self {
        Self {
            machine,
            ledger,
            view: ViewReconciler::new(RecordingSurface::new()),
            event_queue: BTreeMap::new(),
            sequence: 0,
            now: Duration::ZERO,
            timers: HashMap::new(),
            phases: BTreeMap::new(),
            phase_log: Vec::new(),
            stats: SimulationStats::default(),
        }
    }

    pub fn machine(&self) -> &ConsoleStateMachine {
        &self.machine
    }

    pub fn ledger(&self) -> &ScriptedLedger {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut ScriptedLedger {
        &mut self.ledger
    }

    pub fn view(&self) -> &ViewReconciler<RecordingSurface> {
        &self.view
    }

    pub fn surface(&self) -> &RecordingSurface {
        self.view.surface()
    }

    pub fn surface_mut(&mut self) -> &mut RecordingSurface {
        self.view.surface_mut()
    }

    pub fn stats(&self) -> &SimulationStats {
        &self.stats
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    /// Every phase change observed so far.
    pub fn phase_log(&self) -> &[PhaseChange] {
        &self.phase_log
    }

    /// Phase changes of one node, in order.
    pub fn phases_of(&self, node_id: &NodeId) -> Vec<NodePhase> {
        self.phase_log
            .iter()
            .filter(|c| &c.node_id == node_id)
            .map(|c| c.to)
            .collect()
    }

    /// Whether a timer is armed.
    pub fn timer_armed(&self, id: &TimerId) -> bool {
        self.timers.contains_key(id)
    }

    /// Time at which an armed timer fires.
    pub fn timer_deadline(&self, id: &TimerId) -> Option<Duration> {
        self.timers.get(id).map(|key| key.time)
    }

    /// Initialize the state machine at the current time.
    pub fn initialize(&mut self) {
        self.machine.set_time(self.now);
        let actions = self.machine.initialize();
        self.process_actions(actions);
    }

    /// Submit a command at the current time.
    pub fn command(&mut self, command: Command) {
        self.schedule_event(self.now, Event::Command(command));
    }

    /// Submit a command after `delay`.
    pub fn command_after(&mut self, delay: Duration, command: Command) {
        self.schedule_event(self.now + delay, Event::Command(command));
    }

    /// Run for `duration` of simulated time.
    pub fn run_for(&mut self, duration: Duration) {
        self.run_until(self.now + duration);
    }

    /// Process every event up to and including `end_time`.
    pub fn run_until(&mut self, end_time: Duration) {
        trace!(end_time = ?end_time, "Running simulation step");

        while let Some(entry) = self.event_queue.first_entry() {
            if entry.key().time > end_time {
                break;
            }
            let (key, event) = entry.remove_entry();
            self.now = key.time;

            if event.is_timer() {
                self.timers.retain(|_, armed| *armed != key);
            }

            trace!(time = ?self.now, event = event.type_name(), "Processing event");
            self.stats.events_processed += 1;
            self.stats.events_by_priority[event.priority() as usize] += 1;

            self.machine.set_time(self.now);
            let actions = self.machine.handle(event);
            self.process_actions(actions);
        }

        self.now = self.now.max(end_time);
        trace!(
            events_processed = self.stats.events_processed,
            final_time = ?self.now,
            "Simulation step complete"
        );
    }

    fn process_actions(&mut self, actions: Vec<Action>) {
        self.stats.actions_generated += actions.len() as u64;
        for action in actions {
            self.process_action(action);
        }
        self.observe_phases();
    }

    fn process_action(&mut self, action: Action) {
        match action {
            Action::Request { request } => {
                self.stats.requests_issued += 1;
                let latency = self.ledger.latency_of(&request);
                let response = self.ledger.respond(self.now, &request);
                self.schedule_event(self.now + latency, Event::RemoteCompleted(response));
            }

            Action::SetTimer { id, duration } => {
                if let Some(old) = self.timers.remove(&id) {
                    self.event_queue.remove(&old);
                }
                let key = self.schedule_event(self.now + duration, id.clone().into_event());
                self.timers.insert(id, key);
                self.stats.timers_set += 1;
            }

            Action::CancelTimer { id } => {
                if let Some(key) = self.timers.remove(&id) {
                    self.event_queue.remove(&key);
                    self.stats.timers_cancelled += 1;
                }
            }

            Action::Render(update) => self.view.apply(&update),

            Action::Notify { message, level } => {
                debug!(%level, text = %message, "Notification");
                self.view.notify(&message, level);
            }
        }
    }

    fn observe_phases(&mut self) {
        let Some(directory) = self.machine.consensus().directory().cloned() else {
            return;
        };
        let board = self.machine.consensus().board();
        for id in directory.node_ids() {
            let current = board.phase(id);
            let previous = self.phases.insert(id.clone(), current).unwrap_or_default();
            if previous != current {
                self.phase_log.push(PhaseChange {
                    at: self.now,
                    node_id: id.clone(),
                    from: previous,
                    to: current,
                });
            }
        }
    }

    fn schedule_event(&mut self, time: Duration, event: Event) -> EventKey {
        self.sequence += 1;
        let key = EventKey::new(time, &event, self.sequence);
        self.event_queue.insert(key, event);
        key
    }
}
