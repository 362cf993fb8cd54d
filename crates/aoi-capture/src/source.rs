//! Media source handles and the platform acquisition boundary.

use bytes::Bytes;
use tracing::debug;

use aoi_ipc::{SourceKind, SourceRequest};

use crate::error::CaptureResult;

/// An acquired platform media stream.
///
/// Implementations wrap whatever the platform hands back for a camera,
/// screen share, file player, or remote player. The handle that owns
/// the stream is the only component allowed to shut it down.
pub trait MediaStream: Send {
    /// Whether the stream can produce data right now.
    fn is_ready(&self) -> bool;

    /// Current spatial dimensions. Zero until the stream has buffered
    /// enough to know them.
    fn dimensions(&self) -> (u32, u32);

    /// Whether a finite stream (file playback) has ended.
    fn is_exhausted(&self) -> bool {
        false
    }

    /// Capture one compressed still frame at native resolution.
    fn capture_still(&mut self) -> CaptureResult<Bytes>;

    /// Stop all underlying tracks and turn off any capture indicator.
    /// Called at most once, through the owning handle's release.
    fn shutdown(&mut self);
}

/// Opens platform media streams. The single entry point through which
/// hardware is acquired.
pub trait MediaBackend: Send + Sync {
    /// Acquire the stream described by `request`.
    ///
    /// Fails with `AcquisitionDenied` when the user declines the
    /// permission prompt, or `DeviceUnavailable` when the device or
    /// stream cannot be opened.
    fn open(&self, request: &SourceRequest) -> CaptureResult<Box<dyn MediaStream>>;
}

/// Readiness of a source handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// Created, acquisition not attempted.
    Unacquired,

    /// Acquisition in progress.
    Acquiring,

    /// Stream acquired and owned.
    Ready,

    /// Stream released; terminal.
    Released,
}

/// An owned reference to one acquired media source.
///
/// The handle exclusively owns the underlying stream resource; release
/// goes through the handle and nowhere else.
pub struct SourceHandle {
    kind: SourceKind,
    readiness: Readiness,
    stream: Option<Box<dyn MediaStream>>,
}

impl SourceHandle {
    /// Acquire a source through the backend and wrap it in a handle.
    pub fn acquire(backend: &dyn MediaBackend, request: &SourceRequest) -> CaptureResult<Self> {
        let stream = backend.open(request)?;
        debug!(kind = ?request.kind(), "source acquired");
        Ok(Self {
            kind: request.kind(),
            readiness: Readiness::Ready,
            stream: Some(stream),
        })
    }

    /// The kind of source this handle owns.
    pub fn kind(&self) -> SourceKind {
        self.kind
    }

    /// Current readiness.
    pub fn readiness(&self) -> Readiness {
        self.readiness
    }

    /// Whether the handle owns a live stream.
    pub fn is_ready(&self) -> bool {
        self.readiness == Readiness::Ready
    }

    /// Mutable access to the owned stream, while `Ready`.
    pub fn stream_mut(&mut self) -> Option<&mut (dyn MediaStream + 'static)> {
        match self.readiness {
            Readiness::Ready => self.stream.as_deref_mut(),
            _ => None,
        }
    }

    /// Release the underlying stream.
    ///
    /// Idempotent: the second and every later call, and a call on a
    /// handle that never acquired, are no-ops.
    pub fn release(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.shutdown();
            debug!(kind = ?self.kind, "source released");
        }
        self.readiness = Readiness::Released;
    }
}

impl Drop for SourceHandle {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for SourceHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceHandle")
            .field("kind", &self.kind)
            .field("readiness", &self.readiness)
            .finish()
    }
}
