//! Sampled frame types.

use bytes::Bytes;
use chrono::{DateTime, Utc};

/// One still frame pulled from the active source, compressed and
/// ready for upload.
#[derive(Debug, Clone)]
pub struct SampledFrame {
    /// Compressed image data (lossy, single still).
    pub bytes: Bytes,

    /// Frame width in pixels, at the source's native resolution.
    pub width: u32,

    /// Frame height in pixels.
    pub height: u32,

    /// When the frame was sampled.
    pub captured_at: DateTime<Utc>,
}

impl SampledFrame {
    /// Create a new sampled frame, stamped now.
    pub fn new(bytes: Bytes, width: u32, height: u32) -> Self {
        Self {
            bytes,
            width,
            height,
            captured_at: Utc::now(),
        }
    }

    /// Size of the compressed payload in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
