//! Pure rendering of console state into display rows.
//!
//! Every function here is a full re-render: same input, same output, no side
//! effects. Surfaces decide how rows reach the screen.

use fba_types::{
    Direction, NetworkStats, NodeDetail, NodeId, NodeSnapshot, TransactionConsensus,
    TransactionRecord, VoteChoice,
};
use std::fmt;
use time::macros::format_description;
use time::OffsetDateTime;

/// Characters of a counterparty address shown in history rows.
pub const SHORT_ADDRESS_LEN: usize = 10;

/// Text of the single row shown for an empty history.
pub const EMPTY_HISTORY: &str = "No transactions yet";

/// Consensus protocol named in the node detail view.
pub const CONSENSUS_TYPE: &str = "Federated Byzantine Agreement";

// ═══════════════════════════════════════════════════════════════════════════
// Nodes
// ═══════════════════════════════════════════════════════════════════════════

/// One node in the node collection.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeCard {
    pub id: NodeId,
    pub name: String,
    pub stake: f64,
    pub trusts: usize,
    pub status: &'static str,
}

impl fmt::Display for NodeCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] | Stake: {} | Trusts: {} nodes | {}",
            self.name, self.id, self.stake, self.trusts, self.status
        )
    }
}

/// Render the node collection in directory order.
pub fn node_cards(snapshot: &NodeSnapshot) -> Vec<NodeCard> {
    let directory = &snapshot.directory;
    directory
        .records()
        .map(|record| NodeCard {
            id: record.id.clone(),
            name: record.name.clone(),
            stake: record.stake,
            trusts: directory.trust_count(&record.id),
            status: snapshot.status_label(&record.id),
        })
        .collect()
}

// ═══════════════════════════════════════════════════════════════════════════
// History
// ═══════════════════════════════════════════════════════════════════════════

/// One row of the transaction history table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryRow {
    /// The single "no data" row.
    Empty,
    Entry {
        date: String,
        kind: &'static str,
        counterparty: String,
        amount: String,
    },
}

impl fmt::Display for HistoryRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryRow::Empty => f.write_str(EMPTY_HISTORY),
            HistoryRow::Entry {
                date,
                kind,
                counterparty,
                amount,
            } => write!(
                f,
                "{} | {:<8} | {:<13} | {} | Confirmed",
                date, kind, counterparty, amount
            ),
        }
    }
}

/// Render the history table in received order.
pub fn history_rows(transactions: &[TransactionRecord]) -> Vec<HistoryRow> {
    if transactions.is_empty() {
        return vec![HistoryRow::Empty];
    }
    transactions.iter().map(history_row).collect()
}

fn history_row(tx: &TransactionRecord) -> HistoryRow {
    let (kind, sign) = match tx.direction {
        Direction::Sent => ("Sent", '-'),
        Direction::Received => ("Received", '+'),
    };
    HistoryRow::Entry {
        date: format_timestamp(tx.timestamp),
        kind,
        counterparty: format!("{}...", truncate(tx.counterparty(), SHORT_ADDRESS_LEN)),
        amount: format!("{}{} FBA", sign, tx.amount),
    }
}

/// Format a unix timestamp (seconds) as a UTC date and time.
///
/// Out-of-range timestamps fall back to the raw number.
pub fn format_timestamp(timestamp: i64) -> String {
    let format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second] UTC");
    OffsetDateTime::from_unix_timestamp(timestamp)
        .ok()
        .and_then(|dt| dt.format(format).ok())
        .unwrap_or_else(|| timestamp.to_string())
}

fn truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Balance and stats
// ═══════════════════════════════════════════════════════════════════════════

/// Balance with two decimals.
pub fn format_balance(balance: f64) -> String {
    format!("{:.2}", balance)
}

/// Rendered network statistics panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsPanel {
    pub total_transactions: String,
    pub pending_transactions: String,
    pub active_addresses: String,
    pub total_supply: String,
}

impl StatsPanel {
    pub fn render(stats: &NetworkStats) -> Self {
        Self {
            total_transactions: stats.total_transactions.to_string(),
            pending_transactions: stats.pending_transactions.to_string(),
            active_addresses: stats.active_addresses.to_string(),
            total_supply: format!("{:.2}", stats.total_supply),
        }
    }
}

impl fmt::Display for StatsPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Transactions: {} | Pending: {} | Active addresses: {} | Total supply: {}",
            self.total_transactions,
            self.pending_transactions,
            self.active_addresses,
            self.total_supply
        )
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Detail views
// ═══════════════════════════════════════════════════════════════════════════

/// Labelled fields of the node detail view, in display order.
pub fn detail_fields(detail: &NodeDetail) -> Vec<(&'static str, String)> {
    let slice = if detail.trusted.is_empty() {
        "None".to_string()
    } else {
        detail
            .trusted
            .iter()
            .map(|t| t.display_name())
            .collect::<Vec<_>>()
            .join(", ")
    };

    vec![
        ("Name", detail.record.name.clone()),
        ("Node ID", detail.record.id.to_string()),
        ("Stake", detail.record.stake.to_string()),
        ("Status", "Online".to_string()),
        ("Activity", detail.phase.label().to_string()),
        ("Quorum Slice", slice),
        ("Consensus Type", CONSENSUS_TYPE.to_string()),
    ]
}

/// Lines of the per-transaction consensus view.
pub fn consensus_lines(status: &TransactionConsensus) -> Vec<String> {
    let mut lines = vec![format!("Transaction: {}", status.transaction_hash)];

    match &status.tally {
        Some(tally) => lines.push(format!(
            "Result: {} ({} accept / {} reject of {} votes, threshold {})",
            tally.result,
            tally.accept_votes,
            tally.reject_votes,
            tally.total_votes,
            tally.threshold
        )),
        None => lines.push("Result: no votes recorded".to_string()),
    }

    for (node_id, vote) in &status.votes {
        let choice = match vote.vote {
            VoteChoice::Accept => "accept",
            VoteChoice::Reject => "reject",
        };
        lines.push(format!("  {} ({}): {}", vote.node_name, node_id, choice));
    }
    lines
}
