//! Per-node animation state.

use crate::delay::SettleDelaySource;
use fba_core::{Action, TimerId};
use fba_types::{NodeDirectory, NodeId, NodePhase, NodeSnapshot};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::trace;

/// Animation state of one node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeAnimation {
    pub phase: NodePhase,
    /// Incremented each time the node enters Voting. Timers carry the cycle
    /// they were armed for; a mismatch means the timer is stale.
    pub cycle: u64,
    /// When the current phase ends, if it is timed.
    pub deadline: Option<Duration>,
}

impl NodeAnimation {
    /// The timer currently armed for this node, if any.
    fn armed_timer(&self, node_id: &NodeId) -> Option<TimerId> {
        let node_id = node_id.clone();
        match self.phase {
            NodePhase::Idle => None,
            NodePhase::Voting => Some(TimerId::NodeSettle {
                node_id,
                cycle: self.cycle,
            }),
            NodePhase::Settling => Some(TimerId::NodeIdle {
                node_id,
                cycle: self.cycle,
            }),
        }
    }
}

/// Animation state of every known node.
///
/// Written only from consensus monitor events. Phases move forward
/// (`Idle -> Voting -> Settling -> Idle`) except for [`reset_all`], which
/// forces every node back to Idle.
///
/// [`reset_all`]: AnimationBoard::reset_all
#[derive(Debug, Default)]
pub struct AnimationBoard {
    nodes: BTreeMap<NodeId, NodeAnimation>,
}

impl AnimationBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, node_id: &NodeId) -> Option<&NodeAnimation> {
        self.nodes.get(node_id)
    }

    pub fn phase(&self, node_id: &NodeId) -> NodePhase {
        self.nodes.get(node_id).map(|n| n.phase).unwrap_or_default()
    }

    /// Whether every node is Idle.
    pub fn is_quiet(&self) -> bool {
        self.nodes.values().all(|n| n.phase == NodePhase::Idle)
    }

    /// Track the nodes of a new directory snapshot.
    ///
    /// Nodes that are still listed keep their state; dropped nodes have their
    /// timers cancelled.
    pub fn sync_directory(&mut self, directory: &NodeDirectory) -> Vec<Action> {
        let mut actions = Vec::new();
        self.nodes.retain(|id, anim| {
            if directory.get(id).is_some() {
                return true;
            }
            if let Some(timer) = anim.armed_timer(id) {
                actions.push(Action::CancelTimer { id: timer });
            }
            false
        });
        for id in directory.node_ids() {
            self.nodes.entry(id.clone()).or_default();
        }
        actions
    }

    /// Move every Idle node to Voting and arm its settle timer.
    ///
    /// Nodes already Voting or Settling are left alone. Returns no actions
    /// when nothing changed.
    pub fn begin_voting(
        &mut self,
        now: Duration,
        delays: &mut dyn SettleDelaySource,
    ) -> Vec<Action> {
        let mut actions = Vec::new();
        for (id, anim) in self.nodes.iter_mut() {
            if anim.phase != NodePhase::Idle {
                continue;
            }
            let delay = delays.next_delay(id);
            anim.cycle += 1;
            anim.phase = NodePhase::Voting;
            anim.deadline = Some(now + delay);
            trace!(node = %id, cycle = anim.cycle, ?delay, "Node voting");
            actions.push(Action::SetTimer {
                id: TimerId::NodeSettle {
                    node_id: id.clone(),
                    cycle: anim.cycle,
                },
                duration: delay,
            });
        }
        actions
    }

    /// Voting → Settling for one node. `None` if the timer is stale.
    pub fn settle(
        &mut self,
        node_id: &NodeId,
        cycle: u64,
        now: Duration,
        hold: Duration,
    ) -> Option<Action> {
        let anim = self.nodes.get_mut(node_id)?;
        if anim.phase != NodePhase::Voting || anim.cycle != cycle {
            trace!(node = %node_id, cycle, "Stale settle timer");
            return None;
        }
        anim.phase = NodePhase::Settling;
        anim.deadline = Some(now + hold);
        Some(Action::SetTimer {
            id: TimerId::NodeIdle {
                node_id: node_id.clone(),
                cycle,
            },
            duration: hold,
        })
    }

    /// Settling → Idle for one node. Returns whether the node changed.
    pub fn finish(&mut self, node_id: &NodeId, cycle: u64) -> bool {
        let Some(anim) = self.nodes.get_mut(node_id) else {
            return false;
        };
        if anim.phase != NodePhase::Settling || anim.cycle != cycle {
            trace!(node = %node_id, cycle, "Stale idle timer");
            return false;
        }
        anim.phase = NodePhase::Idle;
        anim.deadline = None;
        true
    }

    /// Force every node to Idle, cancelling its armed timer.
    pub fn reset_all(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();
        for (id, anim) in self.nodes.iter_mut() {
            if let Some(timer) = anim.armed_timer(id) {
                actions.push(Action::CancelTimer { id: timer });
            }
            anim.phase = NodePhase::Idle;
            anim.deadline = None;
        }
        actions
    }

    /// Render input for the node collection.
    pub fn snapshot(
        &self,
        directory: Arc<NodeDirectory>,
        round_label: Option<&'static str>,
    ) -> NodeSnapshot {
        NodeSnapshot {
            directory,
            phases: self.nodes.iter().map(|(id, a)| (id.clone(), a.phase)).collect(),
            round_label,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delay::ScriptedDelays;
    use fba_test_helpers::{directory_of, node_id};

    fn board_of(n: u32) -> AnimationBoard {
        let mut board = AnimationBoard::new();
        board.sync_directory(&directory_of(n));
        board
    }

    #[test]
    fn test_begin_voting_arms_one_timer_per_node() {
        let mut board = board_of(3);
        let mut delays = ScriptedDelays::new([
            Duration::from_millis(1000),
            Duration::from_millis(2000),
            Duration::from_millis(3000),
        ]);

        let actions = board.begin_voting(Duration::ZERO, &mut delays);

        assert_eq!(actions.len(), 3);
        for n in 1..=3 {
            assert_eq!(board.phase(&node_id(n)), NodePhase::Voting);
        }
        assert_eq!(
            board.get(&node_id(2)).and_then(|a| a.deadline),
            Some(Duration::from_millis(2000))
        );
    }

    #[test]
    fn test_begin_voting_skips_busy_nodes() {
        let mut board = board_of(2);
        let mut delays = ScriptedDelays::constant(Duration::from_millis(1000));
        board.begin_voting(Duration::ZERO, &mut delays);

        assert!(board.begin_voting(Duration::from_secs(5), &mut delays).is_empty());
        assert_eq!(board.get(&node_id(1)).map(|a| a.cycle), Some(1));
    }

    #[test]
    fn test_full_cycle() {
        let mut board = board_of(1);
        let id = node_id(1);
        let hold = Duration::from_millis(500);
        board.begin_voting(Duration::ZERO, &mut ScriptedDelays::constant(Duration::from_secs(1)));

        // Idle timer before settle is stale
        assert!(!board.finish(&id, 1));

        let next = board.settle(&id, 1, Duration::from_secs(1), hold);
        assert_eq!(
            next,
            Some(Action::SetTimer {
                id: TimerId::NodeIdle {
                    node_id: id.clone(),
                    cycle: 1
                },
                duration: hold,
            })
        );
        assert_eq!(board.phase(&id), NodePhase::Settling);

        assert!(board.finish(&id, 1));
        assert_eq!(board.phase(&id), NodePhase::Idle);
        assert!(board.is_quiet());
    }

    #[test]
    fn test_reset_cancels_armed_timers_and_stale_timers_ignored() {
        let mut board = board_of(2);
        board.begin_voting(Duration::ZERO, &mut ScriptedDelays::constant(Duration::from_secs(1)));
        board.settle(&node_id(1), 1, Duration::from_secs(1), Duration::from_millis(500));

        let actions = board.reset_all();

        assert!(actions.contains(&Action::CancelTimer {
            id: TimerId::NodeIdle {
                node_id: node_id(1),
                cycle: 1
            }
        }));
        assert!(actions.contains(&Action::CancelTimer {
            id: TimerId::NodeSettle {
                node_id: node_id(2),
                cycle: 1
            }
        }));
        assert!(board.is_quiet());

        // A settle timer that fired anyway does not resurrect the old cycle
        assert!(board
            .settle(&node_id(2), 1, Duration::from_secs(2), Duration::from_millis(500))
            .is_none());
        assert_eq!(board.phase(&node_id(2)), NodePhase::Idle);
    }

    #[test]
    fn test_sync_directory_drops_unlisted_nodes() {
        let mut board = board_of(3);
        board.begin_voting(Duration::ZERO, &mut ScriptedDelays::constant(Duration::from_secs(1)));

        let actions = board.sync_directory(&directory_of(2));

        assert_eq!(
            actions,
            vec![Action::CancelTimer {
                id: TimerId::NodeSettle {
                    node_id: node_id(3),
                    cycle: 1
                }
            }]
        );
        assert!(board.get(&node_id(3)).is_none());
        assert_eq!(board.phase(&node_id(1)), NodePhase::Voting);
    }
}
