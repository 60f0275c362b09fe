//! Line-oriented terminal surface.

use crate::render::{HistoryRow, NodeCard, StatsPanel};
use crate::surface::DisplaySurface;
use fba_core::NotifyLevel;
use std::io::{self, Write};
use tracing::warn;

/// Writes each render as a block of plain text lines.
///
/// Logs go to stderr; this surface is meant for stdout.
#[derive(Debug)]
pub struct TerminalSurface<W> {
    out: W,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_block(&mut self, header: &str, lines: impl IntoIterator<Item = String>) {
        if let Err(e) = self.try_write_block(header, lines) {
            warn!(error = %e, "Failed to write to terminal");
        }
    }

    fn try_write_block(
        &mut self,
        header: &str,
        lines: impl IntoIterator<Item = String>,
    ) -> io::Result<()> {
        writeln!(self.out, "== {} ==", header)?;
        for line in lines {
            writeln!(self.out, "  {}", line)?;
        }
        self.out.flush()
    }
}

impl<W: Write> DisplaySurface for TerminalSurface<W> {
    fn show_dashboard(&mut self, address: &str) {
        self.write_block("Wallet", [format!("Address: {}", address)]);
    }

    fn show_setup(&mut self) {
        self.write_block(
            "Wallet",
            ["No wallet loaded. Use `generate` or `import <seed>`.".to_string()],
        );
    }

    fn clear_transfer_form(&mut self) {}

    fn render_balance(&mut self, balance: &str) {
        self.write_block("Balance", [format!("{} FBA", balance)]);
    }

    fn render_history(&mut self, rows: &[HistoryRow]) {
        self.write_block("History", rows.iter().map(ToString::to_string));
    }

    fn render_stats(&mut self, stats: &StatsPanel) {
        self.write_block("Network", [stats.to_string()]);
    }

    fn render_nodes(&mut self, cards: &[NodeCard]) {
        self.write_block("Nodes", cards.iter().map(ToString::to_string));
    }

    fn show_detail(&mut self, title: &str, fields: &[(&'static str, String)]) {
        self.write_block(
            title,
            fields.iter().map(|(label, value)| format!("{}: {}", label, value)),
        );
    }

    fn close_detail(&mut self) {}

    fn render_consensus(&mut self, lines: &[String]) {
        self.write_block("Consensus", lines.iter().cloned());
    }

    fn notify(&mut self, message: &str, level: NotifyLevel) {
        if let Err(e) = writeln!(self.out, "[{}] {}", level, message).and_then(|_| self.out.flush())
        {
            warn!(error = %e, "Failed to write to terminal");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(surface: TerminalSurface<Vec<u8>>) -> String {
        String::from_utf8(surface.into_inner()).unwrap()
    }

    #[test]
    fn test_history_block() {
        let mut surface = TerminalSurface::new(Vec::new());
        surface.render_history(&[HistoryRow::Empty]);
        assert_eq!(output(surface), "== History ==\n  No transactions yet\n");
    }

    #[test]
    fn test_notification_carries_level() {
        let mut surface = TerminalSurface::new(Vec::new());
        surface.notify("No wallet loaded", NotifyLevel::Error);
        assert!(output(surface).contains("No wallet loaded"));
    }
}
