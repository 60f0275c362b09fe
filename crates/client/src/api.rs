//! The remote ledger authority, as seen by the console.

use async_trait::async_trait;
use fba_types::{
    FaucetReceipt, NetworkStats, NodeDirectory, PendingSet, RemoteError, Secret,
    SubmittedTransfer, TransactionConsensus, TransactionRecord, WalletIdentity,
};

/// One async operation per remote capability.
///
/// Every call is a single round trip. Implementations never retry and never
/// cache; callers decide when to ask again.
#[async_trait]
pub trait LedgerApi: Send + Sync {
    /// Node directory and quorum slices.
    async fn list_nodes(&self) -> Result<NodeDirectory, RemoteError>;

    /// Hashes of transactions awaiting consensus.
    async fn get_pending_transactions(&self) -> Result<PendingSet, RemoteError>;

    /// Remote vote tally for one transaction.
    async fn get_consensus_status(
        &self,
        transaction_hash: &str,
    ) -> Result<TransactionConsensus, RemoteError>;

    async fn generate_wallet(&self) -> Result<WalletIdentity, RemoteError>;

    async fn import_wallet(&self, seed: &str) -> Result<WalletIdentity, RemoteError>;

    async fn get_balance(&self, address: &str) -> Result<f64, RemoteError>;

    /// Most recent first, at most `limit` records.
    async fn get_history(
        &self,
        address: &str,
        limit: usize,
    ) -> Result<Vec<TransactionRecord>, RemoteError>;

    async fn get_network_stats(&self) -> Result<NetworkStats, RemoteError>;

    async fn send_transaction(
        &self,
        from: &str,
        to: &str,
        amount: f64,
        secret: &Secret,
    ) -> Result<SubmittedTransfer, RemoteError>;

    async fn request_faucet(&self, address: &str) -> Result<FaucetReceipt, RemoteError>;
}
