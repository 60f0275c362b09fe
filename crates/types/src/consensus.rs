//! Remote consensus status for a single transaction.
//!
//! This is read-only reporting from the remote authority. Nothing here is
//! evaluated locally.

use crate::NodeId;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of the remote vote tally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsensusOutcome {
    ConsensusAccept,
    ConsensusReject,
    Pending,
}

impl fmt::Display for ConsensusOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsensusOutcome::ConsensusAccept => f.write_str("accepted"),
            ConsensusOutcome::ConsensusReject => f.write_str("rejected"),
            ConsensusOutcome::Pending => f.write_str("pending"),
        }
    }
}

/// Tally of node votes for a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsensusTally {
    pub result: ConsensusOutcome,
    pub accept_votes: u32,
    pub reject_votes: u32,
    pub total_votes: u32,
    pub threshold: u32,
}

/// A node's vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteChoice {
    Accept,
    Reject,
}

/// A single node's recorded vote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeVote {
    pub vote: VoteChoice,
    pub timestamp: i64,
    pub node_name: String,
}

/// Consensus status of one transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionConsensus {
    pub transaction_hash: String,
    /// `None` when the remote authority has no record of votes.
    pub tally: Option<ConsensusTally>,
    pub votes: IndexMap<NodeId, NodeVote>,
}
