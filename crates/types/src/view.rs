//! Read-only view inputs handed to the display surface.

use crate::{NodeDirectory, NodeId, NodePhase, NodeRecord};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Everything needed to re-render the node collection.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeSnapshot {
    pub directory: Arc<NodeDirectory>,
    /// Nodes without an entry render as idle.
    pub phases: BTreeMap<NodeId, NodePhase>,
    /// Round-simulation overlay; replaces the status label of every node.
    pub round_label: Option<&'static str>,
}

impl NodeSnapshot {
    /// Phase of a node (idle when unknown).
    pub fn phase(&self, id: &NodeId) -> NodePhase {
        self.phases.get(id).copied().unwrap_or_default()
    }

    /// Status label shown for a node.
    pub fn status_label(&self, id: &NodeId) -> &'static str {
        self.round_label.unwrap_or_else(|| self.phase(id).label())
    }
}

/// A trusted node in a detail view.
///
/// `name` is `None` when the slice references a node the directory does not
/// list; the raw id is shown instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustedNode {
    pub id: NodeId,
    pub name: Option<String>,
}

impl TrustedNode {
    /// Name when known, id otherwise.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(self.id.as_str())
    }
}

/// Detail view of one node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeDetail {
    pub record: NodeRecord,
    pub trusted: Vec<TrustedNode>,
    pub phase: NodePhase,
}

impl NodeDetail {
    /// Build the detail view of `id` from a directory snapshot.
    pub fn from_directory(directory: &NodeDirectory, id: &NodeId, phase: NodePhase) -> Option<Self> {
        let record = directory.get(id)?.clone();
        let trusted = directory
            .slice(id)
            .map(|slice| {
                slice
                    .iter()
                    .map(|trusted_id| TrustedNode {
                        id: trusted_id.clone(),
                        name: directory.get(trusted_id).map(|r| r.name.clone()),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Some(Self {
            record,
            trusted,
            phase,
        })
    }
}
