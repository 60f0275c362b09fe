//! Transaction records and submission receipts.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Direction of a transaction relative to the wallet whose history lists it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Sent,
    Received,
}

/// A confirmed transaction as reported by the remote history endpoint.
///
/// Immutable once observed. Sequences of records keep the order the remote
/// authority delivered them in (most recent first).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub hash: String,
    #[serde(rename = "from_address")]
    pub from: String,
    #[serde(rename = "to_address")]
    pub to: String,
    pub amount: f64,
    /// Unix timestamp in seconds.
    pub timestamp: i64,
    #[serde(rename = "type")]
    pub direction: Direction,
}

impl TransactionRecord {
    /// The other party of this transaction.
    pub fn counterparty(&self) -> &str {
        match self.direction {
            Direction::Sent => &self.to,
            Direction::Received => &self.from,
        }
    }

    /// Amount with sign relative to the wallet (`-` sent, `+` received).
    pub fn signed_amount(&self) -> f64 {
        match self.direction {
            Direction::Sent => -self.amount,
            Direction::Received => self.amount,
        }
    }
}

/// Hashes of transactions awaiting consensus at poll time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingSet {
    hashes: BTreeSet<String>,
}

impl PendingSet {
    /// An empty pending set.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Check if a hash is pending.
    pub fn contains(&self, hash: &str) -> bool {
        self.hashes.contains(hash)
    }

    /// Number of pending transactions.
    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    /// Whether nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }

    /// Iterate pending hashes.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.hashes.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for PendingSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            hashes: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Receipt for an accepted send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmittedTransfer {
    pub transaction_hash: String,
    /// Remote status at submission time ("pending" or "confirmed").
    #[serde(default)]
    pub status: Option<String>,
}

/// Receipt for a faucet grant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaucetReceipt {
    pub message: String,
    #[serde(default)]
    pub transaction_hash: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
}
