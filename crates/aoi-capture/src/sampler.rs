//! Frame sampling from a resolved source.

use tracing::trace;

use crate::error::{CaptureError, CaptureResult};
use crate::frame::SampledFrame;
use crate::source::SourceHandle;

/// Pull one compressed still frame from the handle's stream.
///
/// Returns `NotReady` when the handle is not `Ready`, when the stream
/// reports zero dimensions, or when it cannot produce data yet. All of
/// those mean "skip this cycle, try again next cycle", never a
/// terminal failure. `SourceExhausted` signals the end of a finite
/// source.
pub fn sample(handle: &mut SourceHandle) -> CaptureResult<SampledFrame> {
    let stream = handle.stream_mut().ok_or(CaptureError::NotReady)?;

    if stream.is_exhausted() {
        return Err(CaptureError::SourceExhausted);
    }

    let (width, height) = stream.dimensions();
    if width == 0 || height == 0 || !stream.is_ready() {
        return Err(CaptureError::NotReady);
    }

    let bytes = stream.capture_still()?;
    trace!(width, height, len = bytes.len(), "frame sampled");
    Ok(SampledFrame::new(bytes, width, height))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use bytes::Bytes;

    use aoi_ipc::SourceRequest;

    use super::*;
    use crate::source::{MediaBackend, MediaStream};

    struct GatedStream {
        ready: Arc<AtomicBool>,
        exhausted: Arc<AtomicBool>,
    }

    impl MediaStream for GatedStream {
        fn is_ready(&self) -> bool {
            self.ready.load(Ordering::SeqCst)
        }

        fn dimensions(&self) -> (u32, u32) {
            if self.ready.load(Ordering::SeqCst) {
                (800, 600)
            } else {
                (0, 0)
            }
        }

        fn is_exhausted(&self) -> bool {
            self.exhausted.load(Ordering::SeqCst)
        }

        fn capture_still(&mut self) -> CaptureResult<Bytes> {
            Ok(Bytes::from_static(b"\xff\xd8jpeg\xff\xd9"))
        }

        fn shutdown(&mut self) {}
    }

    struct GatedBackend {
        ready: Arc<AtomicBool>,
        exhausted: Arc<AtomicBool>,
    }

    impl MediaBackend for GatedBackend {
        fn open(&self, _request: &SourceRequest) -> CaptureResult<Box<dyn MediaStream>> {
            Ok(Box::new(GatedStream {
                ready: Arc::clone(&self.ready),
                exhausted: Arc::clone(&self.exhausted),
            }))
        }
    }

    fn gated_handle() -> (SourceHandle, Arc<AtomicBool>, Arc<AtomicBool>) {
        let ready = Arc::new(AtomicBool::new(true));
        let exhausted = Arc::new(AtomicBool::new(false));
        let backend = GatedBackend {
            ready: Arc::clone(&ready),
            exhausted: Arc::clone(&exhausted),
        };
        let handle =
            SourceHandle::acquire(&backend, &SourceRequest::Camera { device: None }).unwrap();
        (handle, ready, exhausted)
    }

    #[test]
    fn test_sample_ready_stream() {
        let (mut handle, _, _) = gated_handle();
        let frame = sample(&mut handle).unwrap();
        assert_eq!((frame.width, frame.height), (800, 600));
        assert!(!frame.is_empty());
    }

    #[test]
    fn test_unready_stream_is_not_ready() {
        let (mut handle, ready, _) = gated_handle();
        ready.store(false, Ordering::SeqCst);

        let err = sample(&mut handle).unwrap_err();
        assert!(matches!(err, CaptureError::NotReady));
        assert!(err.is_transient());

        // Recovers once the stream starts producing again.
        ready.store(true, Ordering::SeqCst);
        assert!(sample(&mut handle).is_ok());
    }

    #[test]
    fn test_released_handle_is_not_ready() {
        let (mut handle, _, _) = gated_handle();
        handle.release();
        assert!(matches!(sample(&mut handle), Err(CaptureError::NotReady)));
    }

    #[test]
    fn test_exhausted_stream() {
        let (mut handle, _, exhausted) = gated_handle();
        exhausted.store(true, Ordering::SeqCst);
        assert!(matches!(
            sample(&mut handle),
            Err(CaptureError::SourceExhausted)
        ));
    }
}
