//! Typed UI<->Engine messages for the inspection pipeline.
//!
//! This crate defines all the message types used for communication
//! between a UI shell and the capture engine, plus the shared data
//! model for sources, defect reports, and ledger entries.

mod commands;
mod events;
mod state;
mod types;

pub use commands::EngineCommand;
pub use events::EngineEvent;
pub use state::{CaptureState, LoopStatus, StopReason};
pub use types::{
    AnalysisOutcome, DefectReport, LedgerEntry, PendingEntry, Severity, SourceKind, SourceRequest,
};

use tokio::sync::mpsc::{channel, Receiver, Sender};

/// Channel capacity for commands (shell -> engine).
pub const COMMAND_CHANNEL_CAPACITY: usize = 64;

/// Channel capacity for events (engine -> shell).
pub const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Creates a bounded command channel.
pub fn command_channel() -> (Sender<EngineCommand>, Receiver<EngineCommand>) {
    channel(COMMAND_CHANNEL_CAPACITY)
}

/// Creates a bounded event channel.
pub fn event_channel() -> (Sender<EngineEvent>, Receiver<EngineEvent>) {
    channel(EVENT_CHANNEL_CAPACITY)
}
