//! Rendering for the FBA ledger console.
//!
//! [`render`] turns console state into rows. [`ViewReconciler`] applies
//! [`ViewUpdate`](fba_core::ViewUpdate)s to a [`DisplaySurface`], of which
//! [`TerminalSurface`] is the line-oriented one used by the binary.

pub mod render;
mod surface;
mod terminal;

pub use render::{HistoryRow, NodeCard, StatsPanel};
pub use surface::{DisplaySurface, ViewModel, ViewReconciler};
pub use terminal::TerminalSurface;
