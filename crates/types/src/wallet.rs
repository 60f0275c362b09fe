//! Wallet identity.

use crate::Secret;

/// The identity of the active wallet: an address plus the secret the remote
/// authority issued for it.
///
/// Immutable once created. There is never more than one live instance; the
/// wallet session owns it and drops it when the session is discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletIdentity {
    /// Public ledger address.
    pub address: String,
    /// Signing secret, forwarded verbatim on send.
    pub secret: Secret,
}

impl WalletIdentity {
    /// Create a new identity.
    pub fn new(address: impl Into<String>, secret: Secret) -> Self {
        Self {
            address: address.into(),
            secret,
        }
    }
}
