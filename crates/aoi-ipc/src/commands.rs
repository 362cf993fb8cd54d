//! Commands sent from the UI shell to the engine.

use serde::{Deserialize, Serialize};

use crate::types::{SourceKind, SourceRequest};

/// Commands that a shell can send to the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EngineCommand {
    /// Acquire a media source. Replaces any source the request
    /// supersedes (same kind, or the camera/file slot).
    AcquireSource(SourceRequest),

    /// Release the source of the given kind, if acquired.
    ReleaseSource(SourceKind),

    /// Start the capture loop. No-op while already running.
    StartCapture,

    /// Stop the capture loop. No-op while idle.
    StopCapture,

    /// Request the current session state.
    GetState,

    /// Request a snapshot of the history ledger.
    GetLedger,

    /// Shutdown the engine completely, releasing all sources.
    Shutdown,
}
