//! Timer management for the production runner.
//!
//! Each timer is a tokio task that sleeps and then posts a [`FiredTimer`].
//! The runner hands it back through [`TimerManager::fired`], which releases
//! the entry and yields the timer's event. Setting an armed timer replaces
//! it; cancelling aborts the task.

use fba_core::{Event, TimerId};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

/// Notice posted by a timer task when its sleep ends.
#[derive(Debug)]
pub struct FiredTimer {
    id: TimerId,
    generation: u64,
}

struct ArmedTimer {
    generation: u64,
    handle: JoinHandle<()>,
}

/// Manages timers for the production runner.
pub struct TimerManager {
    /// Armed timers (id -> generation and task handle).
    timers: HashMap<TimerId, ArmedTimer>,
    next_generation: u64,
    fired_tx: mpsc::Sender<FiredTimer>,
}

impl TimerManager {
    pub fn new(fired_tx: mpsc::Sender<FiredTimer>) -> Self {
        Self {
            timers: HashMap::new(),
            next_generation: 0,
            fired_tx,
        }
    }

    /// Set a timer that fires after `duration`, replacing any armed timer
    /// with the same id.
    pub fn set_timer(&mut self, id: TimerId, duration: Duration) {
        self.cancel_timer(&id);

        self.next_generation += 1;
        let generation = self.next_generation;
        let fired_tx = self.fired_tx.clone();
        let fired = FiredTimer {
            id: id.clone(),
            generation,
        };
        let handle = tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            trace!(id = ?fired.id, "Timer fired");
            // Receiver gone means the runner is shutting down
            let _ = fired_tx.send(fired).await;
        });

        trace!(?id, ?duration, generation, "Timer set");
        self.timers.insert(id, ArmedTimer { generation, handle });
    }

    /// Cancel a timer. No-op if it is not armed or already fired.
    pub fn cancel_timer(&mut self, id: &TimerId) {
        if let Some(armed) = self.timers.remove(id) {
            armed.handle.abort();
            trace!(?id, "Timer cancelled");
        }
    }

    /// Release a fired timer and return its event.
    ///
    /// Returns `None` when the timer was cancelled or replaced after its
    /// task had already posted the notice.
    pub fn fired(&mut self, fired: FiredTimer) -> Option<Event> {
        match self.timers.get(&fired.id) {
            Some(armed) if armed.generation == fired.generation => {
                self.timers.remove(&fired.id);
                Some(fired.id.into_event())
            }
            _ => {
                trace!(
                    id = ?fired.id,
                    generation = fired.generation,
                    "Dropping superseded timer fire"
                );
                None
            }
        }
    }

    /// Cancel all timers.
    pub fn cancel_all(&mut self) {
        let count = self.timers.len();
        for (_, armed) in self.timers.drain() {
            armed.handle.abort();
        }
        debug!(count, "All timers cancelled");
    }

    /// Number of timers armed and not yet delivered.
    pub fn active_count(&self) -> usize {
        self.timers.len()
    }
}

impl Drop for TimerManager {
    fn drop(&mut self) {
        for (_, armed) in self.timers.drain() {
            armed.handle.abort();
        }
    }
}
