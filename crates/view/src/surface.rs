//! Display surface contract and the reconciler that drives it.

use crate::render::{
    consensus_lines, detail_fields, format_balance, history_rows, node_cards, HistoryRow,
    NodeCard, StatsPanel,
};
use fba_core::{NotifyLevel, ViewUpdate};
use fba_types::{NodeId, TransactionRecord};
use tracing::trace;

/// Where rendered rows end up.
///
/// Every render call replaces what the surface showed before.
pub trait DisplaySurface {
    fn show_dashboard(&mut self, address: &str);
    fn show_setup(&mut self);
    fn clear_transfer_form(&mut self);

    fn render_balance(&mut self, balance: &str);
    fn render_history(&mut self, rows: &[HistoryRow]);
    fn render_stats(&mut self, stats: &StatsPanel);
    fn render_nodes(&mut self, cards: &[NodeCard]);

    fn show_detail(&mut self, title: &str, fields: &[(&'static str, String)]);
    /// Always releases the detail view, open or not.
    fn close_detail(&mut self);
    fn render_consensus(&mut self, lines: &[String]);

    fn notify(&mut self, message: &str, level: NotifyLevel);
}

/// Last rendered console state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewModel {
    pub address: Option<String>,
    /// "0.00" until the first balance read of a session completes.
    pub balance: String,
    pub history: Vec<HistoryRow>,
    pub stats: Option<StatsPanel>,
    pub nodes: Vec<NodeCard>,
    pub detail: Option<NodeId>,
}

/// Applies view updates to a surface, keeping a copy of what was rendered.
#[derive(Debug)]
pub struct ViewReconciler<S> {
    surface: S,
    model: ViewModel,
}

impl<S: DisplaySurface> ViewReconciler<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            model: ViewModel {
                balance: format_balance(0.0),
                ..ViewModel::default()
            },
        }
    }

    pub fn model(&self) -> &ViewModel {
        &self.model
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Render one update.
    pub fn apply(&mut self, update: &ViewUpdate) {
        trace!(update = update.type_name(), "Applying view update");
        match update {
            ViewUpdate::Dashboard { address } => {
                self.model.address = Some(address.clone());
                self.model.balance = format_balance(0.0);
                self.model.history.clear();
                self.model.stats = None;
                self.surface.show_dashboard(address);
                self.surface.render_balance(&self.model.balance);
            }
            ViewUpdate::Setup => {
                self.model.address = None;
                self.model.balance = format_balance(0.0);
                self.model.history.clear();
                self.model.stats = None;
                self.surface.show_setup();
            }
            ViewUpdate::ClearTransferForm => self.surface.clear_transfer_form(),
            ViewUpdate::Balance(balance) => {
                self.model.balance = format_balance(*balance);
                self.surface.render_balance(&self.model.balance);
            }
            ViewUpdate::History(transactions) => self.render_history(transactions),
            ViewUpdate::Stats(stats) => {
                let panel = StatsPanel::render(stats);
                self.surface.render_stats(&panel);
                self.model.stats = Some(panel);
            }
            ViewUpdate::Nodes(snapshot) => {
                self.model.nodes = node_cards(snapshot);
                self.surface.render_nodes(&self.model.nodes);
            }
            ViewUpdate::NodeDetail(detail) => {
                self.model.detail = Some(detail.record.id.clone());
                let title = format!("{} Details", detail.record.name);
                self.surface.show_detail(&title, &detail_fields(detail));
            }
            ViewUpdate::CloseDetail => {
                self.model.detail = None;
                self.surface.close_detail();
            }
            ViewUpdate::TransactionConsensus(status) => {
                self.surface.render_consensus(&consensus_lines(status));
            }
        }
    }

    fn render_history(&mut self, transactions: &[TransactionRecord]) {
        self.model.history = history_rows(transactions);
        self.surface.render_history(&self.model.history);
    }

    /// Show a notification.
    pub fn notify(&mut self, message: &str, level: NotifyLevel) {
        self.surface.notify(message, level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fba_test_helpers::{five_node_directory, node_id};
    use fba_types::NodeDetail;
    use fba_types::NodePhase;

    #[derive(Default)]
    struct Counting {
        balances: Vec<String>,
        closes: usize,
        detail_titles: Vec<String>,
    }

    impl DisplaySurface for Counting {
        fn show_dashboard(&mut self, _address: &str) {}
        fn show_setup(&mut self) {}
        fn clear_transfer_form(&mut self) {}
        fn render_balance(&mut self, balance: &str) {
            self.balances.push(balance.to_string());
        }
        fn render_history(&mut self, _rows: &[HistoryRow]) {}
        fn render_stats(&mut self, _stats: &StatsPanel) {}
        fn render_nodes(&mut self, _cards: &[NodeCard]) {}
        fn show_detail(&mut self, title: &str, _fields: &[(&'static str, String)]) {
            self.detail_titles.push(title.to_string());
        }
        fn close_detail(&mut self) {
            self.closes += 1;
        }
        fn render_consensus(&mut self, _lines: &[String]) {}
        fn notify(&mut self, _message: &str, _level: NotifyLevel) {}
    }

    #[test]
    fn test_dashboard_shows_zero_balance_until_first_read() {
        let mut view = ViewReconciler::new(Counting::default());
        view.apply(&ViewUpdate::Balance(42.0));

        view.apply(&ViewUpdate::Dashboard {
            address: "abc".into(),
        });
        assert_eq!(view.model().balance, "0.00");

        view.apply(&ViewUpdate::Balance(1000.0));
        assert_eq!(view.model().balance, "1000.00");
        assert_eq!(view.surface().balances, vec!["42.00", "0.00", "1000.00"]);
    }

    #[test]
    fn test_close_detail_always_releases() {
        let mut view = ViewReconciler::new(Counting::default());
        view.apply(&ViewUpdate::CloseDetail);

        let directory = five_node_directory();
        let detail = NodeDetail::from_directory(&directory, &node_id(1), NodePhase::Idle)
            .expect("node listed");
        view.apply(&ViewUpdate::NodeDetail(detail));
        assert_eq!(view.model().detail, Some(node_id(1)));
        assert_eq!(view.surface().detail_titles, vec!["FBA Node 1 Details"]);

        view.apply(&ViewUpdate::CloseDetail);
        assert_eq!(view.model().detail, None);
        assert_eq!(view.surface().closes, 2);
    }
}
