//! Shared fixtures for console tests.
//!
//! The node directory mirrors the five-node network the ledger service
//! ships with, so scenario tests see the same names, stakes and quorum
//! slices a real session would.

use fba_types::test_utils::{test_node, test_node_record, test_wallet};
use fba_types::{Direction, NodeDirectory, NodeId, QuorumSlices, TransactionRecord, WalletIdentity};

/// A well-formed 64-character hex seed.
pub const VALID_SEED: &str = "4f3c2a1b0e9d8c7b6a5f4e3d2c1b0a99887766554433221100ffeeddccbbaa00";

/// Address handed out for generated test wallets.
pub const TEST_ADDRESS: &str = "fba1a2b3c4d5e6f7a8b9c0d1e2f3a4b5c6d7e8f9a0b";

/// Node id `node_{n}`.
pub fn node_id(n: u32) -> NodeId {
    test_node(n)
}

/// A wallet identity with the given address and secret.
pub fn identity(address: &str, secret: &str) -> WalletIdentity {
    test_wallet(address, secret)
}

/// The default test wallet.
pub fn test_identity() -> WalletIdentity {
    identity(TEST_ADDRESS, "s1")
}

/// The five-node directory with its quorum slices.
pub fn five_node_directory() -> NodeDirectory {
    let stakes = [100.0, 80.0, 90.0, 70.0, 85.0];
    let slices: [&[u32]; 5] = [&[2, 3, 4], &[1, 3, 5], &[1, 2, 4, 5], &[1, 3, 5], &[2, 3, 4]];

    let nodes = (1..=5u32).map(|n| test_node_record(n, stakes[(n - 1) as usize]));

    let mut quorum_slices = QuorumSlices::new();
    for (idx, trusted) in slices.iter().enumerate() {
        quorum_slices.insert(
            node_id(idx as u32 + 1),
            trusted.iter().map(|&t| node_id(t)).collect(),
        );
    }

    NodeDirectory::new(nodes, quorum_slices)
}

/// A directory of `n` nodes with no quorum slices.
pub fn directory_of(n: u32) -> NodeDirectory {
    NodeDirectory::new(
        (1..=n).map(|i| test_node_record(i, 100.0)),
        QuorumSlices::new(),
    )
}

/// A confirmed transaction involving [`TEST_ADDRESS`].
pub fn transaction(hash: &str, direction: Direction, amount: f64, timestamp: i64) -> TransactionRecord {
    let (from, to) = match direction {
        Direction::Sent => (TEST_ADDRESS.to_string(), "fbaCounterparty".to_string()),
        Direction::Received => ("fbaCounterparty".to_string(), TEST_ADDRESS.to_string()),
    };
    TransactionRecord {
        hash: hash.to_string(),
        from,
        to,
        amount,
        timestamp,
        direction,
    }
}

/// A 64-character hex transaction hash derived from `n`.
pub fn tx_hash(n: u64) -> String {
    format!("{:064x}", n.wrapping_mul(0x9e37_79b9_7f4a_7c15))
}
