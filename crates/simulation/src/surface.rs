//! Surface that records every call for later assertions.

use fba_core::NotifyLevel;
use fba_view::{DisplaySurface, HistoryRow, NodeCard, StatsPanel};

/// One call made to the surface.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    Dashboard(String),
    Setup,
    ClearTransferForm,
    Balance(String),
    History(Vec<HistoryRow>),
    Stats(StatsPanel),
    Nodes(Vec<NodeCard>),
    Detail {
        title: String,
        fields: Vec<(&'static str, String)>,
    },
    CloseDetail,
    Consensus(Vec<String>),
    Notify {
        message: String,
        level: NotifyLevel,
    },
}

/// Records surface calls in order.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    calls: Vec<SurfaceCall>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[SurfaceCall] {
        &self.calls
    }

    /// Notifications of one level, in order.
    pub fn notifications(&self, level: NotifyLevel) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                SurfaceCall::Notify { message, level: l } if *l == level => {
                    Some(message.as_str())
                }
                _ => None,
            })
            .collect()
    }

    /// Every balance rendered, in order.
    pub fn balances(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                SurfaceCall::Balance(b) => Some(b.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Number of calls matching `pred`.
    pub fn count(&self, pred: impl Fn(&SurfaceCall) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl DisplaySurface for RecordingSurface {
    fn show_dashboard(&mut self, address: &str) {
        self.calls.push(SurfaceCall::Dashboard(address.to_string()));
    }

    fn show_setup(&mut self) {
        self.calls.push(SurfaceCall::Setup);
    }

    fn clear_transfer_form(&mut self) {
        self.calls.push(SurfaceCall::ClearTransferForm);
    }

    fn render_balance(&mut self, balance: &str) {
        self.calls.push(SurfaceCall::Balance(balance.to_string()));
    }

    fn render_history(&mut self, rows: &[HistoryRow]) {
        self.calls.push(SurfaceCall::History(rows.to_vec()));
    }

    fn render_stats(&mut self, stats: &StatsPanel) {
        self.calls.push(SurfaceCall::Stats(stats.clone()));
    }

    fn render_nodes(&mut self, cards: &[NodeCard]) {
        self.calls.push(SurfaceCall::Nodes(cards.to_vec()));
    }

    fn show_detail(&mut self, title: &str, fields: &[(&'static str, String)]) {
        self.calls.push(SurfaceCall::Detail {
            title: title.to_string(),
            fields: fields.to_vec(),
        });
    }

    fn close_detail(&mut self) {
        self.calls.push(SurfaceCall::CloseDetail);
    }

    fn render_consensus(&mut self, lines: &[String]) {
        self.calls.push(SurfaceCall::Consensus(lines.to_vec()));
    }

    fn notify(&mut self, message: &str, level: NotifyLevel) {
        self.calls.push(SurfaceCall::Notify {
            message: message.to_string(),
            level,
        });
    }
}
