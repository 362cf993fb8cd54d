//! HTTP client for the defect-classification endpoint.

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use aoi_capture::SampledFrame;
use aoi_ipc::{AnalysisOutcome, DefectReport};

use crate::dispatch::Dispatch;
use crate::error::AnalysisResult;

/// Sends one frame per call to the remote defect-classification
/// endpoint.
///
/// Carries a bounded per-request timeout so a hung call surfaces as a
/// `TransportError` instead of stalling the capture loop forever.
#[derive(Debug)]
pub struct AnalysisClient {
    http: reqwest::Client,
    endpoint: Url,
}

impl AnalysisClient {
    /// Build a client for `endpoint` with the given request timeout.
    pub fn new(endpoint: &str, timeout: Duration) -> AnalysisResult<Self> {
        let endpoint = Url::parse(endpoint)?;
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, endpoint })
    }

    /// Upload `frame` and classify whatever comes back.
    ///
    /// Never returns `Err`: API-level refusals become `ApiError`,
    /// everything network-shaped becomes `TransportError`.
    pub async fn classify(&self, frame: &SampledFrame) -> AnalysisOutcome {
        let part = match Part::bytes(frame.bytes.to_vec())
            .file_name("frame.jpg")
            .mime_str("image/jpeg")
        {
            Ok(part) => part,
            Err(e) => {
                return AnalysisOutcome::TransportError {
                    message: format!("request build failed: {e}"),
                }
            }
        };
        let form = Form::new().part("image", part);

        debug!(len = frame.len(), "dispatching frame");

        let response = match self
            .http
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!("dispatch transport failure: {e}");
                let message = if e.is_timeout() {
                    "request timed out".to_string()
                } else {
                    e.to_string()
                };
                return AnalysisOutcome::TransportError { message };
            }
        };

        let status = response.status();
        match response.text().await {
            Ok(body) => interpret_response(status, &body),
            Err(e) => AnalysisOutcome::TransportError {
                message: format!("failed to read response body: {e}"),
            },
        }
    }
}

impl Dispatch for AnalysisClient {
    async fn dispatch(&self, frame: SampledFrame) -> AnalysisOutcome {
        self.classify(&frame).await
    }
}

/// Classify an HTTP response into an analysis outcome.
///
/// Non-2xx responses are API errors, with the message taken from a
/// structured `{"error": ...}` body when present. A 2xx body that is
/// not JSON counts as a transport failure; a JSON body lacking the
/// classification fields is an API error rather than being silently
/// coerced.
fn interpret_response(status: StatusCode, body: &str) -> AnalysisOutcome {
    if !status.is_success() {
        let message = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_owned))
            .unwrap_or_else(|| format!("analysis service returned {status}"));
        return AnalysisOutcome::ApiError { message };
    }

    let value: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(_) => {
            return AnalysisOutcome::TransportError {
                message: "malformed response body".to_string(),
            }
        }
    };

    if let Some(message) = value.get("error").and_then(Value::as_str) {
        return AnalysisOutcome::ApiError {
            message: message.to_owned(),
        };
    }

    match serde_json::from_value::<DefectReport>(value) {
        Ok(report) => AnalysisOutcome::Success(report),
        Err(_) => AnalysisOutcome::ApiError {
            message: "response missing classification fields".to_string(),
        },
    }
}
