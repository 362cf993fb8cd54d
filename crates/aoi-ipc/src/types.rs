//! Common types used across IPC messages.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The kind of media source feeding the inspection loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceKind {
    /// Live camera feed.
    Camera,

    /// Screen or window share.
    ScreenShare,

    /// Locally uploaded video file.
    FileUpload,

    /// Remote URL-backed player (owns no hardware).
    RemoteUrl,
}

impl SourceKind {
    /// Whether this kind holds an exclusive hardware/stream resource.
    ///
    /// At most one `Ready` handle of an exclusive kind may exist at a
    /// time; acquiring a new one must release the prior one.
    pub fn is_exclusive(self) -> bool {
        matches!(self, Self::Camera | Self::ScreenShare)
    }

    /// Display name for the UI.
    pub fn name(self) -> &'static str {
        match self {
            Self::Camera => "Camera",
            Self::ScreenShare => "Screen share",
            Self::FileUpload => "Uploaded file",
            Self::RemoteUrl => "Remote URL",
        }
    }
}

/// A request to acquire one media source, with per-kind parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceRequest {
    /// Open a camera device (platform default when `device` is None).
    Camera { device: Option<String> },

    /// Start a screen/window share.
    ScreenShare { display: Option<String> },

    /// Play back a local video file.
    FileUpload { path: PathBuf },

    /// Stream from a remote URL.
    RemoteUrl { url: String },
}

impl SourceRequest {
    /// The source kind this request acquires.
    pub fn kind(&self) -> SourceKind {
        match self {
            Self::Camera { .. } => SourceKind::Camera,
            Self::ScreenShare { .. } => SourceKind::ScreenShare,
            Self::FileUpload { .. } => SourceKind::FileUpload,
            Self::RemoteUrl { .. } => SourceKind::RemoteUrl,
        }
    }
}

/// Defect severity, as reported by the classification endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    #[serde(alias = "low", alias = "LOW")]
    Low,

    #[serde(alias = "medium", alias = "MEDIUM")]
    Medium,

    #[serde(alias = "critical", alias = "CRITICAL")]
    Critical,
}

impl Severity {
    /// Display label for the UI.
    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::Critical => "Critical",
        }
    }
}

/// A successful defect classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefectReport {
    /// Defect class, e.g. "SHORT_CIRCUIT".
    pub defect_type: String,

    /// Reported severity.
    pub severity: Severity,

    /// Model confidence, 0-100.
    pub confidence: f32,

    /// Human-readable description of the finding.
    pub description: String,

    /// Suggested mitigation / recommended action.
    pub mitigation: String,
}

/// The settled result of one analysis dispatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AnalysisOutcome {
    /// The endpoint returned a classification.
    Success(DefectReport),

    /// The endpoint answered with a structured error (non-2xx, or a
    /// body lacking the classification fields).
    ApiError { message: String },

    /// The call never produced a usable response (unreachable host,
    /// timeout, malformed body).
    TransportError { message: String },
}

impl AnalysisOutcome {
    /// Whether this outcome carries a classification.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Display message for error outcomes, None for success.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Success(_) => None,
            Self::ApiError { message } | Self::TransportError { message } => Some(message),
        }
    }
}

/// A completed entry in the history ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// When the frame was sampled.
    pub captured_at: DateTime<Utc>,

    /// When the dispatch settled.
    pub completed_at: DateTime<Utc>,

    /// The settled outcome.
    pub outcome: AnalysisOutcome,
}

/// The at-most-one placeholder for an in-flight dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PendingEntry {
    /// When the in-flight frame was sampled.
    pub captured_at: DateTime<Utc>,
}
