//! Media source acquisition and frame sampling.
//!
//! This crate models the four acquisition strategies (camera, screen
//! share, uploaded file, remote URL) behind a uniform handle type,
//! owns the acquired hardware/stream resources, resolves the single
//! active frame producer, and pulls compressed still frames from it.
//! The platform capture interfaces themselves sit behind the
//! [`MediaBackend`]/[`MediaStream`] traits.

mod error;
mod frame;
mod registry;
mod resolver;
mod sampler;
mod source;

#[cfg(feature = "synthetic-source")]
mod synthetic;

pub use error::{CaptureError, CaptureResult};
pub use frame::SampledFrame;
pub use registry::SourceRegistry;
pub use resolver::resolve;
pub use sampler::sample;
pub use source::{MediaBackend, MediaStream, Readiness, SourceHandle};

#[cfg(feature = "synthetic-source")]
pub use synthetic::SyntheticBackend;
