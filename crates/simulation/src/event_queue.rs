//! Deterministic event ordering.

use fba_core::{Event, EventPriority};
use std::time::Duration;

/// Key for ordering events in the simulation queue.
///
/// Ordered by time, then priority (timers before remote completions before
/// commands), then insertion sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EventKey {
    pub time: Duration,
    pub priority: EventPriority,
    pub sequence: u64,
}

impl EventKey {
    pub fn new(time: Duration, event: &Event, sequence: u64) -> Self {
        Self {
            time,
            priority: event.priority(),
            sequence,
        }
    }
}
