//! Wallet side of the ledger console.
//!
//! - [`WalletSession`]: the single active identity and its lifecycle
//! - [`PollingScheduler`]: recurring balance/history/stats refresh
//! - [`TransactionSubmitter`]: single-flight transfer and faucet submission
//! - [`WalletState`]: the sub-state machine composing all three

mod config;
mod scheduler;
mod session;
mod state;
mod submitter;
pub mod validation;

pub use config::{ConfigError, WalletConfig};
pub use scheduler::{PollingScheduler, Resource};
pub use session::{PendingOp, SessionPhase, WalletSession};
pub use state::WalletState;
pub use submitter::{Settled, Submission, TransactionSubmitter};
pub use validation::ValidationError;
