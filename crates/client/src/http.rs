//! reqwest-backed [`LedgerApi`].

use crate::api::LedgerApi;
use crate::types::{
    BalancePayload, ConsensusPayload, Envelope, FaucetRequest, HistoryPayload,
    ImportWalletRequest, PendingPayload, SendTransactionRequest, WalletKeys,
};
use async_trait::async_trait;
use fba_types::{
    FaucetReceipt, NetworkStats, NodeDirectory, PendingSet, RemoteError, Secret,
    SubmittedTransfer, TransactionConsensus, TransactionRecord, WalletIdentity,
};
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, trace};

/// Errors building an [`HttpLedgerClient`].
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

/// HTTP client for the ledger service.
#[derive(Debug, Clone)]
pub struct HttpLedgerClient {
    client: Client,
    base_url: Url,
}

impl HttpLedgerClient {
    /// Create a client for the service rooted at `base_url`.
    pub fn new(base_url: &str, request_timeout: Duration) -> Result<Self, ClientError> {
        let base_url = parse_base_url(base_url)?;
        let client = Client::builder().timeout(request_timeout).build()?;
        Ok(Self { client, base_url })
    }

    /// The service root.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build the URL of an endpoint from path segments.
    ///
    /// Segments are percent-encoded, so addresses and hashes can be passed
    /// through as-is.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, RemoteError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| RemoteError::Transport(format!("{} cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send a request and decode the envelope.
    ///
    /// The body is decoded regardless of HTTP status: the service reports
    /// failures as `success: false` with a 4xx/5xx code.
    async fn call<T: DeserializeOwned>(
        &self,
        kind: &'static str,
        request: RequestBuilder,
    ) -> Result<T, RemoteError> {
        let response = request
            .send()
            .await
            .map_err(|e| RemoteError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| RemoteError::Transport(e.to_string()))?;

        trace!(kind, status = status.as_u16(), bytes = body.len(), "Ledger response");

        let envelope: Envelope<T> = serde_json::from_slice(&body).map_err(|e| {
            debug!(kind, status = status.as_u16(), error = %e, "Undecodable ledger response");
            RemoteError::Decode(format!("{} (HTTP {})", e, status.as_u16()))
        })?;
        envelope.into_result()
    }

    async fn get<T: DeserializeOwned>(
        &self,
        kind: &'static str,
        segments: &[&str],
    ) -> Result<T, RemoteError> {
        let url = self.endpoint(segments)?;
        self.call(kind, self.client.get(url)).await
    }

    async fn post<B: serde::Serialize + Sync, T: DeserializeOwned>(
        &self,
        kind: &'static str,
        segments: &[&str],
        body: Option<&B>,
    ) -> Result<T, RemoteError> {
        let url = self.endpoint(segments)?;
        let request = match body {
            Some(body) => self.client.post(url).json(body),
            None => self.client.post(url),
        };
        self.call(kind, request).await
    }
}

#[async_trait]
impl LedgerApi for HttpLedgerClient {
    async fn list_nodes(&self) -> Result<NodeDirectory, RemoteError> {
        self.get("list_nodes", &["api", "ledger", "nodes"]).await
    }

    async fn get_pending_transactions(&self) -> Result<PendingSet, RemoteError> {
        let payload: PendingPayload = self
            .get("get_pending_transactions", &["api", "ledger", "pending"])
            .await?;
        Ok(payload.transactions.into_iter().map(|tx| tx.hash).collect())
    }

    async fn get_consensus_status(
        &self,
        transaction_hash: &str,
    ) -> Result<TransactionConsensus, RemoteError> {
        let payload: ConsensusPayload = self
            .get(
                "get_consensus_status",
                &["api", "ledger", "consensus", transaction_hash],
            )
            .await?;
        Ok(payload.into())
    }

    async fn generate_wallet(&self) -> Result<WalletIdentity, RemoteError> {
        let keys: WalletKeys = self
            .post::<(), _>("generate_wallet", &["api", "wallet", "generate"], None)
            .await?;
        Ok(keys.into())
    }

    async fn import_wallet(&self, seed: &str) -> Result<WalletIdentity, RemoteError> {
        let keys: WalletKeys = self
            .post(
                "import_wallet",
                &["api", "wallet", "import"],
                Some(&ImportWalletRequest { seed }),
            )
            .await?;
        Ok(keys.into())
    }

    async fn get_balance(&self, address: &str) -> Result<f64, RemoteError> {
        let payload: BalancePayload = self
            .get("get_balance", &["api", "wallet", "balance", address])
            .await?;
        Ok(payload.balance)
    }

    async fn get_history(
        &self,
        address: &str,
        limit: usize,
    ) -> Result<Vec<TransactionRecord>, RemoteError> {
        let mut url = self.endpoint(&["api", "wallet", "history", address])?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string());
        let payload: HistoryPayload = self.call("get_history", self.client.get(url)).await?;
        Ok(payload.transactions)
    }

    async fn get_network_stats(&self) -> Result<NetworkStats, RemoteError> {
        self.get("get_network_stats", &["api", "ledger", "stats"]).await
    }

    async fn send_transaction(
        &self,
        from: &str,
        to: &str,
        amount: f64,
        secret: &Secret,
    ) -> Result<SubmittedTransfer, RemoteError> {
        let body = SendTransactionRequest {
            from_address: from,
            to_address: to,
            amount,
            private_key: secret.expose(),
        };
        self.post("send_transaction", &["api", "wallet", "send"], Some(&body))
            .await
    }

    async fn request_faucet(&self, address: &str) -> Result<FaucetReceipt, RemoteError> {
        self.post(
            "request_faucet",
            &["api", "ledger", "faucet"],
            Some(&FaucetRequest { address }),
        )
        .await
    }
}

/// Parse and check a service root URL.
pub fn parse_base_url(base_url: &str) -> Result<Url, ClientError> {
    let url = Url::parse(base_url).map_err(|e| ClientError::InvalidBaseUrl {
        url: base_url.to_string(),
        reason: e.to_string(),
    })?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(ClientError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: "expected an http(s) URL".to_string(),
        });
    }
    Ok(url)
}
