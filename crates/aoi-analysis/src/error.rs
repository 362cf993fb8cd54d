//! Error types for dispatcher construction.
//!
//! Dispatch itself never fails: every way a call can go wrong is
//! classified into an [`aoi_ipc::AnalysisOutcome`] variant instead.

use thiserror::Error;

/// Errors building an [`crate::AnalysisClient`].
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The endpoint URL did not parse.
    #[error("invalid endpoint URL: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    /// The HTTP client failed to build.
    #[error("HTTP client build failed: {0}")]
    ClientBuild(#[from] reqwest::Error),
}

/// Result type for dispatcher construction.
pub type AnalysisResult<T> = Result<T, AnalysisError>;
