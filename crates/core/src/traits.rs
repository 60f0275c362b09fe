//! Core traits for state machines.

use crate::{Action, Event};
use std::time::Duration;

/// The console's top-level event handler.
///
/// Handling is synchronous and performs no I/O: given the same state, time
/// and event it returns the same actions, which is what lets the simulation
/// runner replay a session exactly.
///
/// # Example
///
/// ```ignore
/// impl StateMachine for ConsoleStateMachine {
///     fn handle(&mut self, event: Event) -> Vec<Action> {
///         match event {
///             Event::ConsensusPollTimer => self.consensus.on_poll_timer(),
///             Event::Command(cmd) => self.on_command(cmd),
///             Event::RemoteCompleted(response) => self.on_response(response),
///         }
///     }
///
///     fn set_time(&mut self, now: Duration) {
///         self.now = now;
///     }
/// }
/// ```
pub trait StateMachine {
    /// Process an event, returning actions to perform.
    ///
    /// Never blocks or awaits. All I/O (remote calls, timers, rendering) is
    /// performed by the runner via the returned actions.
    fn handle(&mut self, event: Event) -> Vec<Action>;

    /// Set the current time.
    ///
    /// The runner calls this before every `handle()`, with logical time in
    /// simulation and elapsed wall-clock time in production.
    fn set_time(&mut self, now: Duration);

    /// Get the current time.
    fn now(&self) -> Duration;
}

/// A component state machine composed into a larger one.
///
/// Returns `None` for events it does not own so the composer can route them
/// elsewhere.
pub trait SubStateMachine {
    /// Handle an event if this component owns it.
    fn try_handle(&mut self, event: &Event) -> Option<Vec<Action>>;

    /// Set the current time.
    fn set_time(&mut self, now: Duration);
}
