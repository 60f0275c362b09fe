//! Production runner.
//!
//! A single task owns the [`ConsoleStateMachine`] and receives events through
//! mpsc channels. Remote calls run as spawned tasks that post their response
//! back; timers are spawned sleep tasks managed by [`TimerManager`].

use crate::timers::{FiredTimer, TimerManager};
use fba_client::{dispatch, LedgerApi};
use fba_core::{Action, Command, Event, StateMachine};
use fba_node::ConsoleStateMachine;
use fba_view::{DisplaySurface, ViewReconciler};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, span, trace, Level};

const TIMER_CHANNEL_CAPACITY: usize = 64;
const CALLBACK_CHANNEL_CAPACITY: usize = 256;
const COMMAND_CHANNEL_CAPACITY: usize = 32;

/// Handle for shutting down a running [`ProductionRunner`].
///
/// When dropped, signals the runner to exit.
#[derive(Debug)]
pub struct ShutdownHandle {
    tx: Option<oneshot::Sender<()>>,
}

impl ShutdownHandle {
    /// Trigger shutdown (consumes the handle).
    pub fn shutdown(mut self) {
        if let Some(tx) = self.tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for ShutdownHandle {
    fn drop(&mut self) {
        if let Some(tx) = self.tx.take() {
            let _ = tx.send(());
        }
    }
}

/// Drives the console state machine with real timers and remote calls.
pub struct ProductionRunner<S> {
    machine: ConsoleStateMachine,
    api: Arc<dyn LedgerApi>,
    view: ViewReconciler<S>,
    timers: TimerManager,
    timer_rx: mpsc::Receiver<FiredTimer>,
    callback_tx: mpsc::Sender<Event>,
    callback_rx: mpsc::Receiver<Event>,
    command_rx: mpsc::Receiver<Command>,
    shutdown_rx: oneshot::Receiver<()>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    start_time: Instant,
}

impl<S: DisplaySurface> ProductionRunner<S> {
    /// Create a runner and the sender user commands are submitted through.
    ///
    /// The runner stops once every command sender is dropped.
    pub fn new(
        machine: ConsoleStateMachine,
        api: Arc<dyn LedgerApi>,
        surface: S,
    ) -> (Self, mpsc::Sender<Command>) {
        let (timer_tx, timer_rx) = mpsc::channel(TIMER_CHANNEL_CAPACITY);
        let (callback_tx, callback_rx) = mpsc::channel(CALLBACK_CHANNEL_CAPACITY);
        let (command_tx, command_rx) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let runner = Self {
            machine,
            api,
            view: ViewReconciler::new(surface),
            timers: TimerManager::new(timer_tx),
            timer_rx,
            callback_tx,
            callback_rx,
            command_rx,
            shutdown_rx,
            shutdown_tx: Some(shutdown_tx),
            start_time: Instant::now(),
        };
        (runner, command_tx)
    }

    /// Take the shutdown handle.
    ///
    /// Returns `None` if it was already taken.
    pub fn shutdown_handle(&mut self) -> Option<ShutdownHandle> {
        self.shutdown_tx
            .take()
            .map(|tx| ShutdownHandle { tx: Some(tx) })
    }

    /// Run until shutdown or until the command channel closes.
    ///
    /// Returns the display surface.
    pub async fn run(mut self) -> S {
        info!("Starting console runner");

        self.machine.set_time(self.start_time.elapsed());
        let actions = self.machine.initialize();
        self.process_actions(actions);

        loop {
            // Priority: shutdown, timers, remote completions, user commands
            tokio::select! {
                biased;

                _ = &mut self.shutdown_rx => {
                    info!("Shutdown signal received");
                    break;
                }

                Some(fired) = self.timer_rx.recv() => {
                    if let Some(event) = self.timers.fired(fired) {
                        self.dispatch_event(event);
                    }
                }

                Some(event) = self.callback_rx.recv() => self.dispatch_event(event),

                command = self.command_rx.recv() => match command {
                    Some(command) => self.dispatch_event(Event::Command(command)),
                    None => {
                        info!("Command input closed");
                        break;
                    }
                },
            }
        }

        self.timers.cancel_all();
        info!("Console runner stopped");
        self.view.into_surface()
    }

    fn dispatch_event(&mut self, event: Event) {
        let event_span = span!(Level::DEBUG, "handle_event", event.type = event.type_name());
        let _guard = event_span.enter();

        self.machine.set_time(self.start_time.elapsed());
        let actions = self.machine.handle(event);
        self.process_actions(actions);
    }

    fn process_actions(&mut self, actions: Vec<Action>) {
        for action in actions {
            self.process_action(action);
        }
    }

    fn process_action(&mut self, action: Action) {
        match action {
            Action::Request { request } => {
                let api = Arc::clone(&self.api);
                let callback_tx = self.callback_tx.clone();
                let kind = request.kind();
                trace!(kind, "Issuing remote call");
                tokio::spawn(async move {
                    let response = dispatch(api.as_ref(), request).await;
                    if callback_tx
                        .send(Event::RemoteCompleted(response))
                        .await
                        .is_err()
                    {
                        trace!(kind, "Runner stopped, dropping response");
                    }
                });
            }

            Action::SetTimer { id, duration } => self.timers.set_timer(id, duration),

            Action::CancelTimer { id } => self.timers.cancel_timer(&id),

            Action::Render(update) => self.view.apply(&update),

            Action::Notify { message, level } => {
                debug!(%level, text = %message, "Notification");
                self.view.notify(&message, level);
            }
        }
    }
}
