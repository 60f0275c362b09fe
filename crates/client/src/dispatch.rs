//! Execution of [`RemoteRequest`] values emitted by state machines.

use crate::api::LedgerApi;
use fba_core::{RemoteRequest, RemoteResponse};
use tracing::{debug, warn};

/// Execute one request and wrap the outcome as a response.
///
/// Wallet-scoped responses echo the session number of their request.
pub async fn dispatch(api: &dyn LedgerApi, request: RemoteRequest) -> RemoteResponse {
    let kind = request.kind();
    debug!(kind, "Dispatching ledger request");

    let response = match request {
        RemoteRequest::ListNodes => RemoteResponse::NodesListed(api.list_nodes().await),

        RemoteRequest::GetPending => {
            RemoteResponse::PendingListed(api.get_pending_transactions().await)
        }

        RemoteRequest::GetConsensusStatus { transaction_hash } => {
            let result = api.get_consensus_status(&transaction_hash).await;
            RemoteResponse::ConsensusStatus {
                transaction_hash,
                result,
            }
        }

        RemoteRequest::GenerateWallet { session } => RemoteResponse::WalletGenerated {
            session,
            result: api.generate_wallet().await,
        },

        RemoteRequest::ImportWallet { session, seed } => RemoteResponse::WalletImported {
            session,
            result: api.import_wallet(&seed).await,
        },

        RemoteRequest::GetBalance { session, address } => RemoteResponse::Balance {
            session,
            result: api.get_balance(&address).await,
        },

        RemoteRequest::GetHistory {
            session,
            address,
            limit,
        } => RemoteResponse::History {
            session,
            result: api.get_history(&address, limit).await,
        },

        RemoteRequest::GetNetworkStats { session } => RemoteResponse::NetworkStats {
            session,
            result: api.get_network_stats().await,
        },

        RemoteRequest::SendTransaction {
            session,
            from,
            to,
            amount,
            secret,
        } => RemoteResponse::TransferSent {
            session,
            result: api.send_transaction(&from, &to, amount, &secret).await,
        },

        RemoteRequest::RequestFaucet { session, address } => RemoteResponse::FaucetGranted {
            session,
            result: api.request_faucet(&address).await,
        },
    };

    if response.is_err() {
        warn!(kind, "Ledger request failed");
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use fba_test_helpers::{five_node_directory, test_identity, TEST_ADDRESS};
    use fba_types::{
        FaucetReceipt, NetworkStats, NodeDirectory, PendingSet, RemoteError, Secret,
        SubmittedTransfer, TransactionConsensus, TransactionRecord, WalletIdentity,
    };
    use indexmap::IndexMap;
    use std::sync::Mutex;

    /// Records calls and answers with canned values.
    #[derive(Default)]
    struct FakeLedger {
        calls: Mutex<Vec<String>>,
    }

    impl FakeLedger {
        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }
    }

    #[async_trait]
    impl LedgerApi for FakeLedger {
        async fn list_nodes(&self) -> Result<NodeDirectory, RemoteError> {
            self.record("list_nodes".into());
            Ok(five_node_directory())
        }

        async fn get_pending_transactions(&self) -> Result<PendingSet, RemoteError> {
            self.record("pending".into());
            Ok(["h1"].into_iter().collect())
        }

        async fn get_consensus_status(
            &self,
            transaction_hash: &str,
        ) -> Result<TransactionConsensus, RemoteError> {
            self.record(format!("consensus:{}", transaction_hash));
            Ok(TransactionConsensus {
                transaction_hash: transaction_hash.to_string(),
                tally: None,
                votes: IndexMap::new(),
            })
        }

        async fn generate_wallet(&self) -> Result<WalletIdentity, RemoteError> {
            self.record("generate".into());
            Ok(test_identity())
        }

        async fn import_wallet(&self, seed: &str) -> Result<WalletIdentity, RemoteError> {
            self.record(format!("import:{}", seed));
            Err(RemoteError::Rejected("bad seed".into()))
        }

        async fn get_balance(&self, address: &str) -> Result<f64, RemoteError> {
            self.record(format!("balance:{}", address));
            Ok(42.5)
        }

        async fn get_history(
            &self,
            address: &str,
            limit: usize,
        ) -> Result<Vec<TransactionRecord>, RemoteError> {
            self.record(format!("history:{}:{}", address, limit));
            Ok(Vec::new())
        }

        async fn get_network_stats(&self) -> Result<NetworkStats, RemoteError> {
            self.record("stats".into());
            Err(RemoteError::Transport("connection refused".into()))
        }

        async fn send_transaction(
            &self,
            from: &str,
            to: &str,
            amount: f64,
            secret: &Secret,
        ) -> Result<SubmittedTransfer, RemoteError> {
            self.record(format!("send:{}:{}:{}:{}", from, to, amount, secret.expose()));
            Ok(SubmittedTransfer {
                transaction_hash: "abc".into(),
                status: Some("pending".into()),
            })
        }

        async fn request_faucet(&self, address: &str) -> Result<FaucetReceipt, RemoteError> {
            self.record(format!("faucet:{}", address));
            Ok(FaucetReceipt {
                message: "Faucet successful! 100 FBA coins sent.".into(),
                transaction_hash: None,
                amount: Some(100.0),
            })
        }
    }

    #[tokio::test]
    async fn test_wallet_responses_echo_session() {
        let ledger = FakeLedger::default();

        let response = dispatch(
            &ledger,
            RemoteRequest::GetBalance {
                session: 7,
                address: TEST_ADDRESS.into(),
            },
        )
        .await;

        assert_eq!(
            response,
            RemoteResponse::Balance {
                session: 7,
                result: Ok(42.5)
            }
        );
        assert_eq!(response.session(), Some(7));
    }

    #[tokio::test]
    async fn test_send_forwards_secret() {
        let ledger = FakeLedger::default();

        let response = dispatch(
            &ledger,
            RemoteRequest::SendTransaction {
                session: 1,
                from: "fbaA".into(),
                to: "fbaB".into(),
                amount: 5.0,
                secret: Secret::new("s1"),
            },
        )
        .await;

        assert!(matches!(response, RemoteResponse::TransferSent { session: 1, result: Ok(_) }));
        assert_eq!(ledger.calls.lock().unwrap().as_slice(), ["send:fbaA:fbaB:5:s1"]);
    }

    #[tokio::test]
    async fn test_errors_are_wrapped_not_raised() {
        let ledger = FakeLedger::default();

        let stats = dispatch(&ledger, RemoteRequest::GetNetworkStats { session: 2 }).await;
        assert!(stats.is_err());

        let import = dispatch(
            &ledger,
            RemoteRequest::ImportWallet {
                session: 2,
                seed: "00".into(),
            },
        )
        .await;
        assert_eq!(
            import,
            RemoteResponse::WalletImported {
                session: 2,
                result: Err(RemoteError::Rejected("bad seed".into())),
            }
        );
    }

    #[tokio::test]
    async fn test_history_passes_limit() {
        let ledger = FakeLedger::default();

        dispatch(
            &ledger,
            RemoteRequest::GetHistory {
                session: 1,
                address: "fbaA".into(),
                limit: 10,
            },
        )
        .await;

        assert_eq!(ledger.calls.lock().unwrap().as_slice(), ["history:fbaA:10"]);
    }
}
