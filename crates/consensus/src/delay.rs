//! Sources of per-node settle delays.

use fba_types::NodeId;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::VecDeque;
use std::fmt;
use std::time::Duration;

/// Supplies the Voting → Settling delay of each node, once per cycle.
pub trait SettleDelaySource: Send + fmt::Debug {
    fn next_delay(&mut self, node_id: &NodeId) -> Duration;
}

/// Uniform delays in `[min, max]` (millisecond resolution) from a seeded
/// ChaCha8 generator.
#[derive(Debug)]
pub struct RandomDelaySource {
    rng: ChaCha8Rng,
    min_ms: u64,
    max_ms: u64,
}

impl RandomDelaySource {
    /// Create a source. An inverted range is treated as a single point at `min`.
    pub fn new(seed: u64, min: Duration, max: Duration) -> Self {
        let min_ms = min.as_millis() as u64;
        let max_ms = (max.as_millis() as u64).max(min_ms);
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            min_ms,
            max_ms,
        }
    }
}

impl SettleDelaySource for RandomDelaySource {
    fn next_delay(&mut self, _node_id: &NodeId) -> Duration {
        Duration::from_millis(self.rng.gen_range(self.min_ms..=self.max_ms))
    }
}

/// Replays a fixed list of delays, then repeats the last one.
#[derive(Debug, Clone)]
pub struct ScriptedDelays {
    script: VecDeque<Duration>,
    last: Duration,
}

impl ScriptedDelays {
    pub fn new(delays: impl IntoIterator<Item = Duration>) -> Self {
        let script: VecDeque<_> = delays.into_iter().collect();
        let last = script.back().copied().unwrap_or(Duration::from_millis(1000));
        Self { script, last }
    }

    /// Every node gets the same delay.
    pub fn constant(delay: Duration) -> Self {
        Self::new([delay])
    }
}

impl SettleDelaySource for ScriptedDelays {
    fn next_delay(&mut self, _node_id: &NodeId) -> Duration {
        self.script.pop_front().unwrap_or(self.last)
    }
}
