//! Client for the remote FBA ledger authority.
//!
//! - [`LedgerApi`]: one async operation per remote capability
//! - [`HttpLedgerClient`]: the reqwest implementation
//! - [`dispatch`]: executes a [`fba_core::RemoteRequest`] against any
//!   [`LedgerApi`] and wraps the outcome as a [`fba_core::RemoteResponse`]
//!
//! The client is a pure I/O boundary: no retries, no caching.

mod api;
mod dispatch;
mod http;
pub mod types;

pub use api::LedgerApi;
pub use dispatch::dispatch;
pub use http::{parse_base_url, ClientError, HttpLedgerClient};
