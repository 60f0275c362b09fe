//! Core data model for the FBA ledger console.
//!
//! Everything in this crate is plain data: identities handed out by the remote
//! authority, the node directory, transaction records, network statistics and
//! the per-node animation phase. No I/O, no timers.
//!
//! # Snapshots
//!
//! The node directory and its quorum slices are always replaced wholesale.
//! Consumers hold them behind an `Arc` so a render never observes half of an
//! old snapshot and half of a new one.

mod consensus;
mod error;
mod identifiers;
mod node;
mod stats;
mod transaction;
mod view;
mod wallet;

pub use consensus::{ConsensusOutcome, ConsensusTally, NodeVote, TransactionConsensus, VoteChoice};
pub use error::RemoteError;
pub use identifiers::{NodeId, Secret};
pub use node::{NodeDirectory, NodePhase, NodeRecord, QuorumSlices};
pub use stats::NetworkStats;
pub use transaction::{
    Direction, FaucetReceipt, PendingSet, SubmittedTransfer, TransactionRecord,
};
pub use view::{NodeDetail, NodeSnapshot, TrustedNode};
pub use wallet::WalletIdentity;

/// Number of leading characters of a transaction hash shown in notifications.
pub const SHORT_HASH_LEN: usize = 16;

/// Truncate a transaction hash for display.
///
/// Hashes shorter than [`SHORT_HASH_LEN`] are returned unchanged.
pub fn short_hash(hash: &str) -> &str {
    match hash.char_indices().nth(SHORT_HASH_LEN) {
        Some((idx, _)) => &hash[..idx],
        None => hash,
    }
}

/// Test utilities.
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils {
    use super::*;

    /// Node id `node_{n}`, the naming the ledger service uses.
    pub fn test_node(n: u32) -> NodeId {
        NodeId::new(format!("node_{}", n))
    }

    /// Wallet identity with the given address and secret.
    pub fn test_wallet(address: &str, secret: &str) -> WalletIdentity {
        WalletIdentity::new(address, Secret::new(secret))
    }

    /// Node record named the way the ledger service names its nodes.
    pub fn test_node_record(n: u32, stake: f64) -> NodeRecord {
        NodeRecord {
            id: test_node(n),
            name: format!("FBA Node {}", n),
            stake,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_hash_truncates() {
        let hash = "0123456789abcdef0123456789abcdef";
        assert_eq!(short_hash(hash), "0123456789abcdef");
    }

    #[test]
    fn test_fixture_record_uses_service_naming() {
        let record = test_utils::test_node_record(3, 90.0);
        assert_eq!(record.id.as_str(), "node_3");
        assert_eq!(record.name, "FBA Node 3");
    }

    #[test]
    fn test_short_hash_keeps_short_input() {
        assert_eq!(short_hash("abc"), "abc");
        assert_eq!(short_hash(""), "");
    }
}
