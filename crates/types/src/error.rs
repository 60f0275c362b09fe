//! Errors reported across the remote ledger boundary.

use thiserror::Error;

/// Failure of a single remote call.
///
/// Local validation errors never get this far; they are rejected before any
/// request is issued.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    /// The remote authority answered `success: false` with a reason.
    #[error("{0}")]
    Rejected(String),

    /// The call never produced a structured envelope.
    #[error("Transport error: {0}")]
    Transport(String),

    /// An envelope arrived but could not be decoded.
    #[error("Malformed response: {0}")]
    Decode(String),
}

impl RemoteError {
    /// Whether the remote authority itself reported this error.
    ///
    /// Remote-reported reasons are shown to the user verbatim; transport and
    /// decode failures are shown generically and logged in detail.
    pub fn is_remote_reported(&self) -> bool {
        matches!(self, RemoteError::Rejected(_))
    }

    /// Text shown to the user for this error.
    pub fn user_message(&self) -> &str {
        match self {
            RemoteError::Rejected(reason) => reason,
            RemoteError::Transport(_) => "Unable to reach the ledger service",
            RemoteError::Decode(_) => "Unexpected response from the ledger service",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_remote_reasons_are_shown_verbatim() {
        let rejected = RemoteError::Rejected("Invalid to_address".to_string());
        assert!(rejected.is_remote_reported());
        assert_eq!(rejected.user_message(), "Invalid to_address");

        let transport = RemoteError::Transport("tcp connect error: refused".to_string());
        assert!(!transport.is_remote_reported());
        assert_eq!(transport.user_message(), "Unable to reach the ledger service");
    }
}
