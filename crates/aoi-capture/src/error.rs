//! Error types for the capture module.

use thiserror::Error;

/// Errors that can occur during acquisition and sampling.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// User declined the platform permission prompt.
    #[error("acquisition denied: {0}")]
    AcquisitionDenied(String),

    /// The requested device or stream does not exist or cannot open.
    #[error("device unavailable: {0}")]
    DeviceUnavailable(String),

    /// The source cannot produce a frame yet. Transient; the caller
    /// skips the cycle and retries on the next one.
    #[error("source not ready")]
    NotReady,

    /// A finite source has finished playback.
    #[error("source exhausted")]
    SourceExhausted,

    /// Still-frame encoding failed.
    #[error("frame encoding failed: {0}")]
    Encode(String),
}

impl CaptureError {
    /// Whether this error is recoverable by retrying next cycle.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::NotReady)
    }
}

/// Result type for capture operations.
pub type CaptureResult<T> = Result<T, CaptureError>;
