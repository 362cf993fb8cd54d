//! The dispatch seam between the capture loop and the remote endpoint.

use std::future::Future;

use aoi_capture::SampledFrame;
use aoi_ipc::AnalysisOutcome;

/// Sends exactly one frame to the analysis endpoint and suspends until
/// the call settles.
///
/// The capture loop awaits this before sampling the next frame; that
/// wait is the system's only backpressure mechanism, bounding the
/// remote service to one outstanding request per session.
pub trait Dispatch: Send + Sync {
    /// Dispatch one frame; every failure mode is folded into the
    /// outcome.
    fn dispatch(&self, frame: SampledFrame) -> impl Future<Output = AnalysisOutcome> + Send;
}
