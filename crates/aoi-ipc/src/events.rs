//! Events sent from the engine to the UI shell.

use serde::{Deserialize, Serialize};

use crate::state::CaptureState;
use crate::types::{LedgerEntry, PendingEntry, SourceKind};

/// Events that the engine can send to a shell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EngineEvent {
    /// Engine is ready to accept commands.
    Ready,

    /// Session state has changed.
    StateChanged {
        /// Previous state.
        previous: CaptureState,

        /// Current state.
        current: CaptureState,
    },

    /// The resolved active source changed (None when nothing is ready).
    ActiveSourceChanged { kind: Option<SourceKind> },

    /// A source acquisition or release failed.
    SourceError {
        /// Kind the operation targeted.
        kind: SourceKind,

        /// Error message.
        message: String,
    },

    /// The history ledger changed.
    LedgerUpdated {
        /// Completed entries, newest first, bounded.
        entries: Vec<LedgerEntry>,

        /// The in-flight placeholder, if any.
        pending: Option<PendingEntry>,
    },

    /// Engine has shut down.
    Shutdown,
}
