//! Network-wide ledger statistics.

use serde::{Deserialize, Serialize};

/// Ledger statistics as reported by the remote stats endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkStats {
    pub total_transactions: u64,
    pub pending_transactions: u64,
    pub active_addresses: u64,
    pub total_supply: f64,
    #[serde(default)]
    pub total_addresses: Option<u64>,
}
