//! Capture session orchestrator.
//!
//! This crate ties source resolution, frame sampling, and analysis
//! dispatch into a repeating, cancellable capture loop, and keeps the
//! bounded history ledger the UI displays.

mod cancel;
mod ledger;
mod orchestrator;

pub use cancel::CancelToken;
pub use ledger::{HistoryLedger, MAX_COMPLETED_ENTRIES};
pub use orchestrator::{Engine, EngineConfig, DEFAULT_CYCLE_INTERVAL_MS};
