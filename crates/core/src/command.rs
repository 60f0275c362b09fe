//! User actions.

use fba_types::NodeId;

/// One variant per user action.
///
/// Commands carry raw user input; validation happens in the state machine
/// that owns the command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Ask the remote authority for a fresh wallet.
    GenerateWallet,

    /// Import a wallet from a hex seed.
    ImportWallet { seed: String },

    /// End the active wallet session and return to setup.
    DiscardWallet,

    /// Send `amount` to `to` from the active wallet.
    SubmitTransfer { to: String, amount: String },

    /// Request test funds for the active wallet.
    RequestFaucet,

    /// Re-read the transaction history of the active wallet.
    RefreshHistory,

    /// Open the detail view of a node.
    ShowNodeDetail { node_id: NodeId },

    /// Close the node detail view.
    CloseNodeDetail,

    /// Play the illustrative voting-round labels.
    SimulateRound { transaction_hash: String },

    /// Show the remote consensus status of a transaction.
    InspectTransaction { transaction_hash: String },
}

impl Command {
    /// Get the command name for telemetry.
    pub fn type_name(&self) -> &'static str {
        match self {
            Command::GenerateWallet => "GenerateWallet",
            Command::ImportWallet { .. } => "ImportWallet",
            Command::DiscardWallet => "DiscardWallet",
            Command::SubmitTransfer { .. } => "SubmitTransfer",
            Command::RequestFaucet => "RequestFaucet",
            Command::RefreshHistory => "RefreshHistory",
            Command::ShowNodeDetail { .. } => "ShowNodeDetail",
            Command::CloseNodeDetail => "CloseNodeDetail",
            Command::SimulateRound { .. } => "SimulateRound",
            Command::InspectTransaction { .. } => "InspectTransaction",
        }
    }

    /// Check if this command belongs to the wallet side of the console.
    pub fn is_wallet(&self) -> bool {
        matches!(
            self,
            Command::GenerateWallet
                | Command::ImportWallet { .. }
                | Command::DiscardWallet
                | Command::SubmitTransfer { .. }
                | Command::RequestFaucet
                | Command::RefreshHistory
        )
    }
}
