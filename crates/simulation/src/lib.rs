//! Deterministic simulation runner.
//!
//! Drives the console state machine against an in-memory ledger in logical
//! time. Given the same inputs and seed, it produces identical results every
//! run.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                  SimulationRunner                       │
//! │                                                         │
//! │  ┌────────────────────────────────────────────────────┐ │
//! │  │     Event Queue (BTreeMap<EventKey, Event>)        │ │
//! │  │     Ordered by: time, priority, sequence           │ │
//! │  └────────────────────────┬───────────────────────────┘ │
//! │                           │                             │
//! │                           ▼                             │
//! │  ┌────────────────────────────────────────────────────┐ │
//! │  │     ConsoleStateMachine                            │ │
//! │  └────────────────────────┬───────────────────────────┘ │
//! │                           │                             │
//! │                           ▼                             │
//! │  ┌────────────────────────────────────────────────────┐ │
//! │  │  Request → ScriptedLedger → RemoteCompleted later  │ │
//! │  │  Set/CancelTimer → queue entries                   │ │
//! │  │  Render/Notify → ViewReconciler<RecordingSurface>  │ │
//! │  └────────────────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────┘
//! ```

mod event_queue;
mod ledger;
mod runner;
mod surface;

pub use event_queue::EventKey;
pub use ledger::{LoggedRequest, ScriptedLedger, FAUCET_AMOUNT, GENESIS_ADDRESS};
pub use runner::{PhaseChange, SimulationRunner, SimulationStats};
pub use surface::{RecordingSurface, SurfaceCall};
