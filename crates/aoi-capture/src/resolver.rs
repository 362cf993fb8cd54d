//! Active-source resolution.

use aoi_ipc::SourceKind;

use crate::source::SourceHandle;

/// Pick the single active frame producer from the set of held handles.
///
/// Pure and deterministic: among `Ready` handles, screen share beats
/// the camera/file slot, which beats a remote URL. Only one handle of
/// each rank can be ready at a time (the registry enforces that), so
/// ties cannot occur. The result must never be cached across handle-set
/// mutations.
pub fn resolve<'a>(
    handles: impl IntoIterator<Item = &'a SourceHandle>,
) -> Option<&'a SourceHandle> {
    handles
        .into_iter()
        .filter(|h| h.is_ready())
        .min_by_key(|h| priority(h.kind()))
}

/// Lower wins.
fn priority(kind: SourceKind) -> u8 {
    match kind {
        SourceKind::ScreenShare => 0,
        SourceKind::Camera | SourceKind::FileUpload => 1,
        SourceKind::RemoteUrl => 2,
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use aoi_ipc::SourceRequest;

    use super::*;
    use crate::error::CaptureResult;
    use crate::source::{MediaBackend, MediaStream};

    struct StillStream;

    impl MediaStream for StillStream {
        fn is_ready(&self) -> bool {
            true
        }

        fn dimensions(&self) -> (u32, u32) {
            (320, 240)
        }

        fn capture_still(&mut self) -> CaptureResult<Bytes> {
            Ok(Bytes::from_static(b"\xff\xd8\xff\xd9"))
        }

        fn shutdown(&mut self) {}
    }

    struct StillBackend;

    impl MediaBackend for StillBackend {
        fn open(&self, _request: &SourceRequest) -> CaptureResult<Box<dyn MediaStream>> {
            Ok(Box::new(StillStream))
        }
    }

    fn handle(request: SourceRequest) -> SourceHandle {
        SourceHandle::acquire(&StillBackend, &request).unwrap()
    }

    #[test]
    fn test_screen_share_beats_camera() {
        let camera = handle(SourceRequest::Camera { device: None });
        let screen = handle(SourceRequest::ScreenShare { display: None });

        let picked = resolve([&camera, &screen]).unwrap();
        assert_eq!(picked.kind(), SourceKind::ScreenShare);

        // Order of the handle set must not matter.
        let picked = resolve([&screen, &camera]).unwrap();
        assert_eq!(picked.kind(), SourceKind::ScreenShare);
    }

    #[test]
    fn test_camera_beats_remote_url() {
        let camera = handle(SourceRequest::Camera { device: None });
        let remote = handle(SourceRequest::RemoteUrl {
            url: "rtsp://aoi/line2".into(),
        });

        let picked = resolve([&remote, &camera]).unwrap();
        assert_eq!(picked.kind(), SourceKind::Camera);
    }

    #[test]
    fn test_released_handles_are_skipped() {
        let mut screen = handle(SourceRequest::ScreenShare { display: None });
        let camera = handle(SourceRequest::Camera { device: None });
        screen.release();

        let picked = resolve([&screen, &camera]).unwrap();
        assert_eq!(picked.kind(), SourceKind::Camera);
    }

    #[test]
    fn test_empty_set_resolves_to_none() {
        let handles: [&SourceHandle; 0] = [];
        assert!(resolve(handles).is_none());
    }
}
