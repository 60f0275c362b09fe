//! In-memory ledger authority for simulation.
//!
//! Answers every [`RemoteRequest`] synchronously with a configurable latency,
//! keeps a log of what it was asked, and can be told to fail specific calls.

use fba_core::{RemoteRequest, RemoteResponse};
use fba_types::{
    ConsensusOutcome, ConsensusTally, Direction, FaucetReceipt, NetworkStats, NodeDirectory,
    NodeVote, PendingSet, RemoteError, Secret, SubmittedTransfer, TransactionConsensus,
    TransactionRecord, VoteChoice, WalletIdentity,
};
use indexmap::IndexMap;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::{BTreeSet, HashMap, VecDeque};
use std::time::Duration;
use tracing::{debug, trace};

/// Address credited by the faucet.
pub const GENESIS_ADDRESS: &str = "genesis";

/// Coins handed out per faucet request.
pub const FAUCET_AMOUNT: f64 = 100.0;

/// Unix time of simulation time zero.
const EPOCH_OFFSET_SECS: i64 = 1_700_000_000;

/// A request the ledger received.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggedRequest {
    pub at: Duration,
    pub request: RemoteRequest,
}

#[derive(Debug, Clone)]
struct Injected {
    error: RemoteError,
    /// `None` fails every call until cleared.
    remaining: Option<u32>,
}

/// Deterministic in-memory ledger.
#[derive(Debug)]
pub struct ScriptedLedger {
    directory: NodeDirectory,
    rng: ChaCha8Rng,
    secrets: HashMap<String, Secret>,
    /// Identities handed out by the next generate calls, before random ones.
    scripted_identities: VecDeque<WalletIdentity>,
    balances: HashMap<String, f64>,
    confirmed: Vec<TransactionRecord>,
    pending: Vec<TransactionRecord>,
    /// Hashes reported pending in addition to real pending transfers.
    extra_pending: BTreeSet<String>,
    auto_confirm: bool,
    tx_counter: u64,
    default_latency: Duration,
    latency: HashMap<&'static str, Duration>,
    failures: HashMap<&'static str, Injected>,
    log: Vec<LoggedRequest>,
}

impl ScriptedLedger {
    pub fn new(directory: NodeDirectory, seed: u64) -> Self {
        let mut balances = HashMap::new();
        balances.insert(GENESIS_ADDRESS.to_string(), 1_000_000.0);
        Self {
            directory,
            rng: ChaCha8Rng::seed_from_u64(seed),
            secrets: HashMap::new(),
            scripted_identities: VecDeque::new(),
            balances,
            confirmed: Vec::new(),
            pending: Vec::new(),
            extra_pending: BTreeSet::new(),
            auto_confirm: true,
            tx_counter: 0,
            default_latency: Duration::from_millis(50),
            latency: HashMap::new(),
            failures: HashMap::new(),
            log: Vec::new(),
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Scripting
    // ═══════════════════════════════════════════════════════════════════════

    /// Latency of every call without a per-kind override.
    pub fn set_default_latency(&mut self, latency: Duration) {
        self.default_latency = latency;
    }

    /// Latency of calls of one kind (see [`RemoteRequest::kind`]).
    pub fn set_latency(&mut self, kind: &'static str, latency: Duration) {
        self.latency.insert(kind, latency);
    }

    pub fn latency_of(&self, request: &RemoteRequest) -> Duration {
        self.latency
            .get(request.kind())
            .copied()
            .unwrap_or(self.default_latency)
    }

    /// Fail the next `times` calls of one kind.
    pub fn fail_next(&mut self, kind: &'static str, error: RemoteError, times: u32) {
        self.failures.insert(
            kind,
            Injected {
                error,
                remaining: Some(times),
            },
        );
    }

    /// Fail every call of one kind until [`clear_failures`](Self::clear_failures).
    pub fn fail_always(&mut self, kind: &'static str, error: RemoteError) {
        self.failures.insert(
            kind,
            Injected {
                error,
                remaining: None,
            },
        );
    }

    pub fn clear_failures(&mut self) {
        self.failures.clear();
    }

    /// Keep sent transfers pending until [`confirm_pending`](Self::confirm_pending).
    pub fn set_auto_confirm(&mut self, auto_confirm: bool) {
        self.auto_confirm = auto_confirm;
    }

    /// Replace the extra hashes reported as pending.
    pub fn set_pending<S: Into<String>>(&mut self, hashes: impl IntoIterator<Item = S>) {
        self.extra_pending = hashes.into_iter().map(Into::into).collect();
    }

    /// Confirm every pending transfer and drop the extra pending hashes.
    pub fn confirm_pending(&mut self) {
        for tx in std::mem::take(&mut self.pending) {
            self.apply(tx);
        }
        self.extra_pending.clear();
    }

    /// Hand out `identity` on the next generate call.
    pub fn script_identity(&mut self, identity: WalletIdentity) {
        self.scripted_identities.push_back(identity);
    }

    /// Credit an address directly.
    pub fn credit(&mut self, address: &str, amount: f64) {
        *self.balances.entry(address.to_string()).or_default() += amount;
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Inspection
    // ═══════════════════════════════════════════════════════════════════════

    pub fn log(&self) -> &[LoggedRequest] {
        &self.log
    }

    /// Number of calls of one kind received so far.
    pub fn calls(&self, kind: &str) -> usize {
        self.log.iter().filter(|r| r.request.kind() == kind).count()
    }

    pub fn balance(&self, address: &str) -> f64 {
        self.balances.get(address).copied().unwrap_or(0.0)
    }

    pub fn pending_set(&self) -> PendingSet {
        self.pending
            .iter()
            .map(|tx| tx.hash.clone())
            .chain(self.extra_pending.iter().cloned())
            .collect()
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Request handling
    // ═══════════════════════════════════════════════════════════════════════

    /// Answer one request received at simulation time `now`.
    pub fn respond(&mut self, now: Duration, request: &RemoteRequest) -> RemoteResponse {
        trace!(kind = request.kind(), ?now, "Ledger request");
        self.log.push(LoggedRequest {
            at: now,
            request: request.clone(),
        });
        let injected = self.take_failure(request.kind());
        let timestamp = EPOCH_OFFSET_SECS + now.as_secs() as i64;

        match request {
            RemoteRequest::ListNodes => {
                RemoteResponse::NodesListed(fail_or(injected, || Ok(self.directory.clone())))
            }
            RemoteRequest::GetPending => {
                RemoteResponse::PendingListed(fail_or(injected, || Ok(self.pending_set())))
            }
            RemoteRequest::GetConsensusStatus { transaction_hash } => {
                RemoteResponse::ConsensusStatus {
                    transaction_hash: transaction_hash.clone(),
                    result: fail_or(injected, || self.consensus_of(transaction_hash)),
                }
            }
            RemoteRequest::GenerateWallet { session } => RemoteResponse::WalletGenerated {
                session: *session,
                result: fail_or(injected, || Ok(self.generate())),
            },
            RemoteRequest::ImportWallet { session, seed } => RemoteResponse::WalletImported {
                session: *session,
                result: fail_or(injected, || self.import(seed)),
            },
            RemoteRequest::GetBalance { session, address } => RemoteResponse::Balance {
                session: *session,
                result: fail_or(injected, || Ok(self.balance(address))),
            },
            RemoteRequest::GetHistory {
                session,
                address,
                limit,
            } => RemoteResponse::History {
                session: *session,
                result: fail_or(injected, || Ok(self.history(address, *limit))),
            },
            RemoteRequest::GetNetworkStats { session } => RemoteResponse::NetworkStats {
                session: *session,
                result: fail_or(injected, || Ok(self.stats())),
            },
            RemoteRequest::SendTransaction {
                session,
                from,
                to,
                amount,
                secret,
            } => RemoteResponse::TransferSent {
                session: *session,
                result: fail_or(injected, || {
                    self.send(from, to, *amount, secret, timestamp)
                }),
            },
            RemoteRequest::RequestFaucet { session, address } => RemoteResponse::FaucetGranted {
                session: *session,
                result: fail_or(injected, || Ok(self.faucet(address, timestamp))),
            },
        }
    }

    fn take_failure(&mut self, kind: &'static str) -> Option<RemoteError> {
        let injected = self.failures.get_mut(kind)?;
        let error = injected.error.clone();
        if let Some(remaining) = injected.remaining.as_mut() {
            *remaining = remaining.saturating_sub(1);
            if *remaining == 0 {
                self.failures.remove(kind);
            }
        }
        debug!(kind, %error, "Injected ledger failure");
        Some(error)
    }

    fn generate(&mut self) -> WalletIdentity {
        if let Some(identity) = self.scripted_identities.pop_front() {
            self.secrets
                .insert(identity.address.clone(), identity.secret.clone());
            return identity;
        }
        let address = format!("fba{:040x}", self.rng.gen::<u128>());
        let secret = Secret::new(format!("{:064x}", self.rng.gen::<u128>()));
        self.secrets.insert(address.clone(), secret.clone());
        WalletIdentity::new(address, secret)
    }

    fn import(&mut self, seed: &str) -> Result<WalletIdentity, RemoteError> {
        if seed.len() != 64 || !seed.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(RemoteError::Rejected("Invalid seed".to_string()));
        }
        let address = format!("fba{}", &seed[..40]);
        let secret = Secret::new(seed.chars().rev().collect::<String>());
        self.secrets.insert(address.clone(), secret.clone());
        Ok(WalletIdentity::new(address, secret))
    }

    fn history(&self, address: &str, limit: usize) -> Vec<TransactionRecord> {
        self.confirmed
            .iter()
            .rev()
            .filter(|tx| tx.from == address || tx.to == address)
            .take(limit)
            .map(|tx| TransactionRecord {
                direction: if tx.from == address {
                    Direction::Sent
                } else {
                    Direction::Received
                },
                ..tx.clone()
            })
            .collect()
    }

    fn stats(&self) -> NetworkStats {
        NetworkStats {
            total_transactions: self.confirmed.len() as u64,
            pending_transactions: self.pending_set().len() as u64,
            active_addresses: self.balances.values().filter(|b| **b > 0.0).count() as u64,
            total_supply: self.balances.values().sum(),
            total_addresses: Some(self.balances.len() as u64),
        }
    }

    fn next_hash(&mut self) -> String {
        self.tx_counter += 1;
        format!("{:064x}", self.tx_counter)
    }

    fn send(
        &mut self,
        from: &str,
        to: &str,
        amount: f64,
        secret: &Secret,
        timestamp: i64,
    ) -> Result<SubmittedTransfer, RemoteError> {
        if self.secrets.get(from) != Some(secret) {
            return Err(RemoteError::Rejected("Invalid from_address".to_string()));
        }
        if to.is_empty() {
            return Err(RemoteError::Rejected("Invalid to_address".to_string()));
        }
        if amount <= 0.0 || self.balance(from) < amount {
            return Err(RemoteError::Rejected(
                "Transaction validation failed".to_string(),
            ));
        }

        let tx = TransactionRecord {
            hash: self.next_hash(),
            from: from.to_string(),
            to: to.to_string(),
            amount,
            timestamp,
            direction: Direction::Sent,
        };
        let transaction_hash = tx.hash.clone();
        let status = if self.auto_confirm {
            self.apply(tx);
            "confirmed"
        } else {
            self.pending.push(tx);
            "pending"
        };
        Ok(SubmittedTransfer {
            transaction_hash,
            status: Some(status.to_string()),
        })
    }

    fn faucet(&mut self, address: &str, timestamp: i64) -> FaucetReceipt {
        let tx = TransactionRecord {
            hash: self.next_hash(),
            from: GENESIS_ADDRESS.to_string(),
            to: address.to_string(),
            amount: FAUCET_AMOUNT,
            timestamp,
            direction: Direction::Received,
        };
        let transaction_hash = tx.hash.clone();
        self.apply(tx);
        FaucetReceipt {
            message: "Faucet successful! 100 FBA coins sent.".to_string(),
            transaction_hash: Some(transaction_hash),
            amount: Some(FAUCET_AMOUNT),
        }
    }

    fn apply(&mut self, tx: TransactionRecord) {
        if tx.from != GENESIS_ADDRESS {
            *self.balances.entry(tx.from.clone()).or_default() -= tx.amount;
        }
        *self.balances.entry(tx.to.clone()).or_default() += tx.amount;
        self.confirmed.push(tx);
    }

    fn consensus_of(&self, hash: &str) -> Result<TransactionConsensus, RemoteError> {
        let confirmed = self.confirmed.iter().any(|tx| tx.hash == hash);
        let pending = self.pending_set().contains(hash);
        if !confirmed && !pending {
            return Err(RemoteError::Rejected("Transaction not found".to_string()));
        }
        if pending {
            return Ok(TransactionConsensus {
                transaction_hash: hash.to_string(),
                tally: None,
                votes: Default::default(),
            });
        }

        let votes: IndexMap<_, _> = self
            .directory
            .records()
            .map(|r| {
                (
                    r.id.clone(),
                    NodeVote {
                        vote: VoteChoice::Accept,
                        timestamp: EPOCH_OFFSET_SECS,
                        node_name: r.name.clone(),
                    },
                )
            })
            .collect();
        let total = votes.len() as u32;
        Ok(TransactionConsensus {
            transaction_hash: hash.to_string(),
            tally: Some(ConsensusTally {
                result: ConsensusOutcome::ConsensusAccept,
                accept_votes: total,
                reject_votes: 0,
                total_votes: total,
                threshold: total.div_ceil(2).max(1),
            }),
            votes,
        })
    }
}

fn fail_or<T>(
    injected: Option<RemoteError>,
    f: impl FnOnce() -> Result<T, RemoteError>,
) -> Result<T, RemoteError> {
    match injected {
        Some(error) => Err(error),
        None => f(),
    }
}
