//! Wire types for the ledger HTTP API.
//!
//! Every endpoint answers with the same envelope: `{success, data}` on
//! success and `{success: false, error}` otherwise, usually alongside a
//! 4xx/5xx status.

use fba_types::{
    ConsensusTally, NodeId, NodeVote, RemoteError, Secret, TransactionConsensus,
    TransactionRecord, WalletIdentity,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Response envelope shared by all endpoints.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    /// Collapse the envelope into a result.
    pub fn into_result(self) -> Result<T, RemoteError> {
        if !self.success {
            return Err(RemoteError::Rejected(
                self.error.unwrap_or_else(|| "Unknown error".to_string()),
            ));
        }
        self.data
            .ok_or_else(|| RemoteError::Decode("envelope has no data".to_string()))
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Request bodies
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Serialize)]
pub struct ImportWalletRequest<'a> {
    pub seed: &'a str,
}

#[derive(Debug, Serialize)]
pub struct SendTransactionRequest<'a> {
    pub from_address: &'a str,
    pub to_address: &'a str,
    pub amount: f64,
    pub private_key: &'a str,
}

#[derive(Debug, Serialize)]
pub struct FaucetRequest<'a> {
    pub address: &'a str,
}

// ═══════════════════════════════════════════════════════════════════════════
// Response payloads
// ═══════════════════════════════════════════════════════════════════════════

/// Payload of `generate` and `import`.
///
/// `seed` is only present on `generate`.
#[derive(Debug, Deserialize)]
pub struct WalletKeys {
    pub address: String,
    pub private_key: String,
    #[serde(default)]
    pub public_key: Option<String>,
    #[serde(default)]
    pub seed: Option<String>,
}

impl From<WalletKeys> for WalletIdentity {
    fn from(keys: WalletKeys) -> Self {
        WalletIdentity::new(keys.address, Secret::new(keys.private_key))
    }
}

#[derive(Debug, Deserialize)]
pub struct PendingTransaction {
    pub hash: String,
}

#[derive(Debug, Deserialize)]
pub struct PendingPayload {
    #[serde(default)]
    pub transactions: Vec<PendingTransaction>,
    #[serde(default)]
    pub count: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct BalancePayload {
    pub address: String,
    pub balance: f64,
}

#[derive(Debug, Deserialize)]
pub struct HistoryPayload {
    pub address: String,
    #[serde(default)]
    pub transactions: Vec<TransactionRecord>,
}

#[derive(Debug, Deserialize)]
pub struct ConsensusPayload {
    pub transaction_hash: String,
    #[serde(default)]
    pub consensus: Option<ConsensusTally>,
    #[serde(default)]
    pub votes: IndexMap<NodeId, NodeVote>,
}

impl From<ConsensusPayload> for TransactionConsensus {
    fn from(payload: ConsensusPayload) -> Self {
        TransactionConsensus {
            transaction_hash: payload.transaction_hash,
            tally: payload.consensus,
            votes: payload.votes,
        }
    }
}
