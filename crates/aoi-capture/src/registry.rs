//! Slot-based ownership of acquired sources.

use tracing::{debug, info};

use aoi_ipc::{SourceKind, SourceRequest};

use crate::error::CaptureResult;
use crate::resolver::resolve;
use crate::source::{MediaBackend, SourceHandle};

/// Owns every acquired source handle and enforces the exclusivity
/// rules: at most one screen share, and at most one of camera OR
/// uploaded file (last-selected wins).
#[derive(Default)]
pub struct SourceRegistry {
    /// Screen-share slot.
    screen: Option<SourceHandle>,

    /// Camera/file slot; the two kinds displace each other.
    primary: Option<SourceHandle>,

    /// Remote-URL slot (owns no hardware).
    remote: Option<SourceHandle>,
}

impl SourceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the requested source, displacing whatever occupied its
    /// slot.
    ///
    /// The new stream is opened before the old one is released, so a
    /// same-kind replacement never exposes an intermediate released
    /// state to the rest of the system. On failure the prior occupant
    /// stays in place untouched.
    pub fn acquire(
        &mut self,
        backend: &dyn MediaBackend,
        request: &SourceRequest,
    ) -> CaptureResult<()> {
        let handle = SourceHandle::acquire(backend, request)?;
        let slot = self.slot_mut(request.kind());

        if let Some(mut old) = slot.replace(handle) {
            debug!(displaced = ?old.kind(), by = ?request.kind(), "source displaced");
            old.release();
        }

        info!(kind = ?request.kind(), "source installed");
        Ok(())
    }

    /// Release the source of the given kind, if that kind currently
    /// occupies its slot. Releasing an absent kind is a no-op.
    pub fn release(&mut self, kind: SourceKind) {
        let slot = self.slot_mut(kind);
        if slot.as_ref().is_some_and(|h| h.kind() == kind) {
            if let Some(mut handle) = slot.take() {
                handle.release();
            }
        }
    }

    /// Release every handle. Safe to call at any time, including on
    /// teardown paths where some handles are already released.
    pub fn release_all(&mut self) {
        for slot in [&mut self.screen, &mut self.primary, &mut self.remote] {
            if let Some(mut handle) = slot.take() {
                handle.release();
            }
        }
    }

    /// All currently held handles.
    pub fn handles(&self) -> impl Iterator<Item = &SourceHandle> {
        [self.screen.as_ref(), self.primary.as_ref(), self.remote.as_ref()]
            .into_iter()
            .flatten()
    }

    /// The kind the resolver currently selects, if any.
    pub fn active_kind(&self) -> Option<SourceKind> {
        resolve(self.handles()).map(|h| h.kind())
    }

    /// Mutable access to the resolved active handle.
    pub fn active_mut(&mut self) -> Option<&mut SourceHandle> {
        let kind = self.active_kind()?;
        let slot = self.slot_mut(kind);
        slot.as_mut()
    }

    fn slot_mut(&mut self, kind: SourceKind) -> &mut Option<SourceHandle> {
        match kind {
            SourceKind::ScreenShare => &mut self.screen,
            SourceKind::Camera | SourceKind::FileUpload => &mut self.primary,
            SourceKind::RemoteUrl => &mut self.remote,
        }
    }
}

impl Drop for SourceRegistry {
    fn drop(&mut self) {
        self.release_all();
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use bytes::Bytes;

    use super::*;
    use crate::source::MediaStream;

    struct TrackedStream {
        releases: Arc<AtomicUsize>,
    }

    impl MediaStream for TrackedStream {
        fn is_ready(&self) -> bool {
            true
        }

        fn dimensions(&self) -> (u32, u32) {
            (1280, 720)
        }

        fn capture_still(&mut self) -> CaptureResult<Bytes> {
            Ok(Bytes::from_static(b"\xff\xd8\xff\xd9"))
        }

        fn shutdown(&mut self) {
            self.releases.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct TrackedBackend {
        releases: Arc<AtomicUsize>,
    }

    impl MediaBackend for TrackedBackend {
        fn open(&self, _request: &SourceRequest) -> CaptureResult<Box<dyn MediaStream>> {
            Ok(Box::new(TrackedStream {
                releases: Arc::clone(&self.releases),
            }))
        }
    }

    fn setup() -> (SourceRegistry, TrackedBackend, Arc<AtomicUsize>) {
        let releases = Arc::new(AtomicUsize::new(0));
        (
            SourceRegistry::new(),
            TrackedBackend {
                releases: Arc::clone(&releases),
            },
            releases,
        )
    }

    fn camera() -> SourceRequest {
        SourceRequest::Camera { device: None }
    }

    fn file() -> SourceRequest {
        SourceRequest::FileUpload {
            path: PathBuf::from("/tmp/panel.mp4"),
        }
    }

    #[test]
    fn test_same_kind_replacement_releases_prior() {
        let (mut reg, backend, releases) = setup();

        reg.acquire(&backend, &file()).unwrap();
        reg.acquire(&backend, &file()).unwrap();

        assert_eq!(releases.load(Ordering::SeqCst), 1);
        assert_eq!(reg.handles().count(), 1);
    }

    #[test]
    fn test_camera_and_file_displace_each_other() {
        let (mut reg, backend, releases) = setup();

        reg.acquire(&backend, &camera()).unwrap();
        reg.acquire(&backend, &file()).unwrap();

        assert_eq!(releases.load(Ordering::SeqCst), 1);
        assert_eq!(reg.active_kind(), Some(SourceKind::FileUpload));

        reg.acquire(&backend, &camera()).unwrap();
        assert_eq!(releases.load(Ordering::SeqCst), 2);
        assert_eq!(reg.active_kind(), Some(SourceKind::Camera));
    }

    #[test]
    fn test_screen_share_coexists_with_camera() {
        let (mut reg, backend, releases) = setup();

        reg.acquire(&backend, &camera()).unwrap();
        reg.acquire(&backend, &SourceRequest::ScreenShare { display: None })
            .unwrap();

        assert_eq!(releases.load(Ordering::SeqCst), 0);
        assert_eq!(reg.handles().count(), 2);
        assert_eq!(reg.active_kind(), Some(SourceKind::ScreenShare));
    }

    #[test]
    fn test_release_wrong_kind_is_noop() {
        let (mut reg, backend, releases) = setup();

        reg.acquire(&backend, &camera()).unwrap();
        // The primary slot holds a camera; releasing FileUpload must
        // leave it alone.
        reg.release(SourceKind::FileUpload);

        assert_eq!(releases.load(Ordering::SeqCst), 0);
        assert_eq!(reg.active_kind(), Some(SourceKind::Camera));

        reg.release(SourceKind::Camera);
        assert_eq!(releases.load(Ordering::SeqCst), 1);
        assert_eq!(reg.active_kind(), None);
    }

    #[test]
    fn test_release_all_on_drop() {
        let (mut reg, backend, releases) = setup();

        reg.acquire(&backend, &camera()).unwrap();
        reg.acquire(&backend, &SourceRequest::ScreenShare { display: None })
            .unwrap();
        reg.acquire(
            &backend,
            &SourceRequest::RemoteUrl {
                url: "rtsp://line4/aoi".into(),
            },
        )
        .unwrap();
        drop(reg);

        assert_eq!(releases.load(Ordering::SeqCst), 3);
    }
}
