//! Ledger node directory and per-node animation phase.

use crate::NodeId;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A ledger node as listed by the remote directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: NodeId,
    pub name: String,
    pub stake: f64,
}

/// Node id -> ids of the nodes it trusts.
///
/// Order inside a slice carries no meaning, so slices are sets.
pub type QuorumSlices = IndexMap<NodeId, BTreeSet<NodeId>>;

/// Snapshot of the remote node directory.
///
/// Replaced wholesale on every fetch; never patched. Node order is the order
/// the remote authority delivered them in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeDirectory {
    pub nodes: IndexMap<NodeId, NodeRecord>,
    #[serde(default)]
    pub quorum_slices: QuorumSlices,
}

impl NodeDirectory {
    /// Create a directory from records and slices.
    pub fn new(nodes: impl IntoIterator<Item = NodeRecord>, quorum_slices: QuorumSlices) -> Self {
        Self {
            nodes: nodes.into_iter().map(|n| (n.id.clone(), n)).collect(),
            quorum_slices,
        }
    }

    /// Look up a node by id.
    pub fn get(&self, id: &NodeId) -> Option<&NodeRecord> {
        self.nodes.get(id)
    }

    /// Iterate node ids in directory order.
    pub fn node_ids(&self) -> impl Iterator<Item = &NodeId> + '_ {
        self.nodes.keys()
    }

    /// Iterate records in directory order.
    pub fn records(&self) -> impl Iterator<Item = &NodeRecord> + '_ {
        self.nodes.values()
    }

    /// The quorum slice of a node, if the directory lists one.
    pub fn slice(&self, id: &NodeId) -> Option<&BTreeSet<NodeId>> {
        self.quorum_slices.get(id)
    }

    /// Number of nodes the given node trusts (0 when it has no slice).
    pub fn trust_count(&self, id: &NodeId) -> usize {
        self.slice(id).map(BTreeSet::len).unwrap_or(0)
    }

    /// Number of nodes in the directory.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the directory lists no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Animation phase of a single node.
///
/// Within one activity cycle a node only moves forward:
/// `Idle -> Voting -> Settling -> Idle`. The only backward jump is the reset
/// to `Idle` when the remote authority reports nothing pending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodePhase {
    #[default]
    Idle,
    Voting,
    Settling,
}

impl NodePhase {
    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            NodePhase::Idle => "Ready",
            NodePhase::Voting => "Voting...",
            NodePhase::Settling => "Settling...",
        }
    }

    /// Whether `next` is a legal forward step from this phase.
    pub fn can_advance_to(&self, next: NodePhase) -> bool {
        matches!(
            (self, next),
            (NodePhase::Idle, NodePhase::Voting)
                | (NodePhase::Voting, NodePhase::Settling)
                | (NodePhase::Settling, NodePhase::Idle)
        )
    }
}

impl fmt::Display for NodePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
