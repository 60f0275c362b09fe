//! Single-flight transfer and faucet submission.

use crate::validation::{validate_transfer, ValidationError};
use fba_core::{Action, NotifyLevel, RemoteRequest, ViewUpdate};
use fba_types::{short_hash, FaucetReceipt, RemoteError, SubmittedTransfer, WalletIdentity};
use tracing::{debug, info, warn};

/// Kind of submission in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    Transfer,
    Faucet,
}

/// Outcome of a settled submission.
///
/// `refresh` tells the caller to arm the deferred refresh.
#[derive(Debug, Default)]
pub struct Settled {
    pub actions: Vec<Action>,
    pub refresh: bool,
}

/// Validates and submits transfers and faucet requests.
///
/// Transfers and faucet requests share one in-flight slot: a second
/// submission while one is outstanding is rejected, not queued.
#[derive(Debug, Default)]
pub struct TransactionSubmitter {
    in_flight: Option<Submission>,
}

impl TransactionSubmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_flight(&self) -> Option<Submission> {
        self.in_flight
    }

    /// Forget the outstanding submission (session ended).
    pub fn reset(&mut self) {
        self.in_flight = None;
    }

    /// Validate and submit a transfer.
    pub fn submit(
        &mut self,
        wallet: Option<&WalletIdentity>,
        session: u64,
        to: &str,
        amount: &str,
    ) -> Vec<Action> {
        let Some(wallet) = wallet else {
            return vec![reject(ValidationError::NoWallet)];
        };
        if let Some(busy) = self.busy() {
            return vec![busy];
        }
        let (to, amount) = match validate_transfer(to, amount) {
            Ok(valid) => valid,
            Err(e) => return vec![reject(e)],
        };

        self.in_flight = Some(Submission::Transfer);
        info!(to, amount, "Submitting transfer");
        vec![
            Action::notify(NotifyLevel::Info, "Sending transaction..."),
            Action::request(RemoteRequest::SendTransaction {
                session,
                from: wallet.address.clone(),
                to: to.to_string(),
                amount,
                secret: wallet.secret.clone(),
            }),
        ]
    }

    /// Request faucet funds for the active wallet.
    pub fn request_faucet(&mut self, wallet: Option<&WalletIdentity>, session: u64) -> Vec<Action> {
        let Some(wallet) = wallet else {
            return vec![reject(ValidationError::NoWallet)];
        };
        if let Some(busy) = self.busy() {
            return vec![busy];
        }

        self.in_flight = Some(Submission::Faucet);
        info!(address = %wallet.address, "Requesting faucet");
        vec![
            Action::notify(NotifyLevel::Info, "Requesting faucet..."),
            Action::request(RemoteRequest::RequestFaucet {
                session,
                address: wallet.address.clone(),
            }),
        ]
    }

    fn busy(&self) -> Option<Action> {
        self.in_flight.map(|kind| {
            debug!(?kind, "Submission rejected, one already in flight");
            Action::notify(
                NotifyLevel::Info,
                "A submission is already in progress, please wait",
            )
        })
    }

    /// The transfer settled.
    pub fn on_transfer_sent(&mut self, result: &Result<SubmittedTransfer, RemoteError>) -> Settled {
        if self.in_flight != Some(Submission::Transfer) {
            debug!("Ignoring transfer result with no transfer in flight");
            return Settled::default();
        }
        self.in_flight = None;

        match result {
            Ok(receipt) => {
                info!(
                    hash = %receipt.transaction_hash,
                    status = receipt.status.as_deref().unwrap_or("unknown"),
                    "Transfer accepted"
                );
                Settled {
                    actions: vec![
                        Action::Render(ViewUpdate::ClearTransferForm),
                        Action::notify(
                            NotifyLevel::Success,
                            format!(
                                "Transaction sent successfully! Hash: {}...",
                                short_hash(&receipt.transaction_hash)
                            ),
                        ),
                    ],
                    refresh: true,
                }
            }
            Err(e) => {
                warn!(error = %e, "Transfer failed");
                Settled {
                    actions: vec![Action::notify(
                        NotifyLevel::Error,
                        format!("Error sending transaction: {}", e.user_message()),
                    )],
                    refresh: false,
                }
            }
        }
    }

    /// The faucet request settled.
    pub fn on_faucet_granted(&mut self, result: &Result<FaucetReceipt, RemoteError>) -> Settled {
        if self.in_flight != Some(Submission::Faucet) {
            debug!("Ignoring faucet result with no faucet request in flight");
            return Settled::default();
        }
        self.in_flight = None;

        match result {
            Ok(receipt) => {
                info!(amount = receipt.amount.unwrap_or_default(), "Faucet granted");
                Settled {
                    actions: vec![Action::notify(NotifyLevel::Success, receipt.message.clone())],
                    refresh: true,
                }
            }
            Err(e) => {
                warn!(error = %e, "Faucet request failed");
                Settled {
                    actions: vec![Action::notify(
                        NotifyLevel::Error,
                        format!("Error requesting faucet: {}", e.user_message()),
                    )],
                    refresh: false,
                }
            }
        }
    }
}

fn reject(error: ValidationError) -> Action {
    debug!(%error, "Rejected locally");
    Action::notify(NotifyLevel::Error, error.to_string())
}
