//! Calls to the remote ledger authority.
//!
//! State machines never perform I/O. They emit [`RemoteRequest`]s through
//! `Action::Request`; the runner executes the call and feeds the outcome
//! back as a [`RemoteResponse`] inside `Event::RemoteCompleted`.
//!
//! Wallet-scoped calls carry the wallet session number they were issued
//! under. The response echoes it back so results that arrive after the
//! session was discarded can be recognised and dropped.

use fba_types::{
    FaucetReceipt, NetworkStats, NodeDirectory, PendingSet, RemoteError, Secret,
    SubmittedTransfer, TransactionConsensus, TransactionRecord, WalletIdentity,
};

/// A single call to the remote authority.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteRequest {
    // ═══════════════════════════════════════════════════════════════════════
    // Ledger reads
    // ═══════════════════════════════════════════════════════════════════════
    /// Node directory and quorum slices.
    ListNodes,

    /// Transactions awaiting consensus.
    GetPending,

    /// Remote vote tally for one transaction.
    GetConsensusStatus { transaction_hash: String },

    // ═══════════════════════════════════════════════════════════════════════
    // Wallet lifecycle
    // ═══════════════════════════════════════════════════════════════════════
    GenerateWallet { session: u64 },

    ImportWallet { session: u64, seed: String },

    // ═══════════════════════════════════════════════════════════════════════
    // Wallet reads
    // ═══════════════════════════════════════════════════════════════════════
    GetBalance { session: u64, address: String },

    GetHistory {
        session: u64,
        address: String,
        limit: usize,
    },

    GetNetworkStats { session: u64 },

    // ═══════════════════════════════════════════════════════════════════════
    // Wallet writes
    // ═══════════════════════════════════════════════════════════════════════
    SendTransaction {
        session: u64,
        from: String,
        to: String,
        amount: f64,
        secret: Secret,
    },

    RequestFaucet { session: u64, address: String },
}

impl RemoteRequest {
    /// Get the request name for telemetry.
    pub fn kind(&self) -> &'static str {
        match self {
            RemoteRequest::ListNodes => "list_nodes",
            RemoteRequest::GetPending => "get_pending_transactions",
            RemoteRequest::GetConsensusStatus { .. } => "get_consensus_status",
            RemoteRequest::GenerateWallet { .. } => "generate_wallet",
            RemoteRequest::ImportWallet { .. } => "import_wallet",
            RemoteRequest::GetBalance { .. } => "get_balance",
            RemoteRequest::GetHistory { .. } => "get_history",
            RemoteRequest::GetNetworkStats { .. } => "get_network_stats",
            RemoteRequest::SendTransaction { .. } => "send_transaction",
            RemoteRequest::RequestFaucet { .. } => "request_faucet",
        }
    }

    /// Check if this call mutates remote state.
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            RemoteRequest::GenerateWallet { .. }
                | RemoteRequest::ImportWallet { .. }
                | RemoteRequest::SendTransaction { .. }
                | RemoteRequest::RequestFaucet { .. }
        )
    }
}

/// Outcome of a [`RemoteRequest`].
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteResponse {
    NodesListed(Result<NodeDirectory, RemoteError>),

    PendingListed(Result<PendingSet, RemoteError>),

    ConsensusStatus {
        transaction_hash: String,
        result: Result<TransactionConsensus, RemoteError>,
    },

    WalletGenerated {
        session: u64,
        result: Result<WalletIdentity, RemoteError>,
    },

    WalletImported {
        session: u64,
        result: Result<WalletIdentity, RemoteError>,
    },

    Balance {
        session: u64,
        result: Result<f64, RemoteError>,
    },

    History {
        session: u64,
        result: Result<Vec<TransactionRecord>, RemoteError>,
    },

    NetworkStats {
        session: u64,
        result: Result<NetworkStats, RemoteError>,
    },

    TransferSent {
        session: u64,
        result: Result<SubmittedTransfer, RemoteError>,
    },

    FaucetGranted {
        session: u64,
        result: Result<FaucetReceipt, RemoteError>,
    },
}

impl RemoteResponse {
    /// Wallet session this response belongs to, if it is wallet-scoped.
    pub fn session(&self) -> Option<u64> {
        match self {
            RemoteResponse::NodesListed(_)
            | RemoteResponse::PendingListed(_)
            | RemoteResponse::ConsensusStatus { .. } => None,
            RemoteResponse::WalletGenerated { session, .. }
            | RemoteResponse::WalletImported { session, .. }
            | RemoteResponse::Balance { session, .. }
            | RemoteResponse::History { session, .. }
            | RemoteResponse::NetworkStats { session, .. }
            | RemoteResponse::TransferSent { session, .. }
            | RemoteResponse::FaucetGranted { session, .. } => Some(*session),
        }
    }

    /// Check if the call failed.
    pub fn is_err(&self) -> bool {
        match self {
            RemoteResponse::NodesListed(r) => r.is_err(),
            RemoteResponse::PendingListed(r) => r.is_err(),
            RemoteResponse::ConsensusStatus { result, .. } => result.is_err(),
            RemoteResponse::WalletGenerated { result, .. }
            | RemoteResponse::WalletImported { result, .. } => result.is_err(),
            RemoteResponse::Balance { result, .. } => result.is_err(),
            RemoteResponse::History { result, .. } => result.is_err(),
            RemoteResponse::NetworkStats { result, .. } => result.is_err(),
            RemoteResponse::TransferSent { result, .. } => result.is_err(),
            RemoteResponse::FaucetGranted { result, .. } => result.is_err(),
        }
    }

    /// Get the response name for telemetry.
    pub fn type_name(&self) -> &'static str {
        match self {
            RemoteResponse::NodesListed(_) => "NodesListed",
            RemoteResponse::PendingListed(_) => "PendingListed",
            RemoteResponse::ConsensusStatus { .. } => "ConsensusStatus",
            RemoteResponse::WalletGenerated { .. } => "WalletGenerated",
            RemoteResponse::WalletImported { .. } => "WalletImported",
            RemoteResponse::Balance { .. } => "Balance",
            RemoteResponse::History { .. } => "History",
            RemoteResponse::NetworkStats { .. } => "NetworkStats",
            RemoteResponse::TransferSent { .. } => "TransferSent",
            RemoteResponse::FaucetGranted { .. } => "FaucetGranted",
        }
    }
}
