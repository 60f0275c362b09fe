//! Production runner with async I/O.
//!
//! Wraps the deterministic console state machine with real I/O:
//!
//! - Remote calls via the HTTP ledger client, each on its own task
//! - Timers via tokio sleep tasks
//! - Rendering to a terminal surface on stdout
//!
//! # Architecture
//!
//! A single task owns the state machine and receives events through mpsc
//! channels, so no state is shared between tasks.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      fba-console                             │
//! │                                                              │
//! │  stdin reader ──Command──┐                                   │
//! │                          ▼                                   │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │  ProductionRunner                                      │  │
//! │  │    └─ loop { event = recv(); actions = handle(event) } │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! │        │                    │                    │           │
//! │        ▼                    ▼                    ▼           │
//! │  Request tasks        TimerManager         ViewReconciler    │
//! │  (HttpLedgerClient)   (sleep tasks)        (stdout)          │
//! └──────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod config;
mod runner;
pub mod telemetry;
mod timers;

pub use commands::{parse_line, ConsoleInput, ParseError, HELP};
pub use config::{ConfigError, ConsoleConfig};
pub use runner::{ProductionRunner, ShutdownHandle};
pub use telemetry::{init_logging, resolve_filter, TelemetryError};
pub use timers::{FiredTimer, TimerManager};
