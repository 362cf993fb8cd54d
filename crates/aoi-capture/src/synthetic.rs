//! Deterministic in-process source for demos and harnesses.
//!
//! Emits the same tiny baseline JPEG every cycle, optionally for a
//! fixed number of frames so harness runs can exercise end-of-source
//! behavior.

use bytes::Bytes;
use tracing::debug;

use aoi_ipc::SourceRequest;

use crate::error::CaptureResult;
use crate::source::{MediaBackend, MediaStream};

/// Smallest valid baseline JPEG (1x1, gray).
const STILL_JPEG: &[u8] = &[
    0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46, 0x00, 0x01, 0x01, 0x00, 0x00,
    0x01, 0x00, 0x01, 0x00, 0x00, 0xFF, 0xDB, 0x00, 0x43, 0x00, 0x03, 0x02, 0x02, 0x02, 0x02,
    0x02, 0x03, 0x02, 0x02, 0x02, 0x03, 0x03, 0x03, 0x03, 0x04, 0x06, 0x04, 0x04, 0x04, 0x04,
    0x04, 0x08, 0x06, 0x06, 0x05, 0x06, 0x09, 0x08, 0x0A, 0x0A, 0x09, 0x08, 0x09, 0x09, 0x0A,
    0x0C, 0x0F, 0x0C, 0x0A, 0x0B, 0x0E, 0x0B, 0x09, 0x09, 0x0D, 0x11, 0x0D, 0x0E, 0x0F, 0x10,
    0x10, 0x11, 0x10, 0x0A, 0x0C, 0x12, 0x13, 0x12, 0x10, 0x13, 0x0F, 0x10, 0x10, 0x10, 0xFF,
    0xC9, 0x00, 0x0B, 0x08, 0x00, 0x01, 0x00, 0x01, 0x01, 0x01, 0x11, 0x00, 0xFF, 0xCC, 0x00,
    0x06, 0x00, 0x10, 0x10, 0x05, 0xFF, 0xDA, 0x00, 0x08, 0x01, 0x01, 0x00, 0x00, 0x3F, 0x00,
    0xD2, 0xCF, 0x20, 0xFF, 0xD9,
];

/// Backend that opens synthetic streams regardless of the requested
/// kind.
#[derive(Debug, Clone, Default)]
pub struct SyntheticBackend {
    /// Frames each opened stream produces before reporting exhaustion;
    /// None for an unbounded stream.
    pub frame_budget: Option<u64>,
}

impl SyntheticBackend {
    /// Unbounded synthetic backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend whose streams end after `frames` stills.
    pub fn with_frame_budget(frames: u64) -> Self {
        Self {
            frame_budget: Some(frames),
        }
    }
}

impl MediaBackend for SyntheticBackend {
    fn open(&self, request: &SourceRequest) -> CaptureResult<Box<dyn MediaStream>> {
        debug!(kind = ?request.kind(), budget = ?self.frame_budget, "opening synthetic stream");
        Ok(Box::new(SyntheticStream {
            remaining: self.frame_budget,
        }))
    }
}

struct SyntheticStream {
    remaining: Option<u64>,
}

impl MediaStream for SyntheticStream {
    fn is_ready(&self) -> bool {
        !self.is_exhausted()
    }

    fn dimensions(&self) -> (u32, u32) {
        (1, 1)
    }

    fn is_exhausted(&self) -> bool {
        self.remaining == Some(0)
    }

    fn capture_still(&mut self) -> CaptureResult<Bytes> {
        if let Some(remaining) = self.remaining.as_mut() {
            *remaining = remaining.saturating_sub(1);
        }
        Ok(Bytes::from_static(STILL_JPEG))
    }

    fn shutdown(&mut self) {
        self.remaining = Some(0);
    }
}
