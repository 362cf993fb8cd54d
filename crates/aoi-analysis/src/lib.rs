//! Remote defect-classification dispatcher.
//!
//! One compressed still frame goes out per call; the response is
//! classified into success, API error, or transport error. Nothing in
//! here is fatal to the capture loop.

mod client;
mod dispatch;
mod error;

pub use client::AnalysisClient;
pub use dispatch::Dispatch;
pub use error::{AnalysisError, AnalysisResult};

use std::time::Duration;

/// Default per-request timeout at the dispatcher boundary.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
