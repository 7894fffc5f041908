//! HTTP adapter for the analysis service

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::application::ports::{AnalysisApi, ApiError, HealthReport, Rejection};
use crate::domain::job::{endpoint_url, Artifact, BackendChoice, Job};
use crate::domain::upload::AudioFile;

// Response types for the analysis service

#[derive(Debug, Deserialize)]
struct HealthResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

/// Analysis service client over HTTP
pub struct HttpAnalysisApi {
    base_url: String,
    client: reqwest::Client,
}

impl HttpAnalysisApi {
    /// Create a client for the service at `base_url`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    /// Create a client reusing an existing reqwest client
    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, client }
    }

    /// Build an endpoint URL, each segment percent-encoded
    fn url(&self, segments: &[&str]) -> Result<String, ApiError> {
        endpoint_url(&self.base_url, segments)
            .ok_or_else(|| ApiError::Transport(format!("Invalid API base URL: {}", self.base_url)))
    }

    /// Build the multipart upload body
    fn build_form(file: &AudioFile, backend: BackendChoice) -> Result<Form, ApiError> {
        let part = Part::bytes(file.data().to_vec())
            .file_name(file.file_name().to_string())
            .mime_str(file.mime_type().as_str())
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(Form::new()
            .part("file", part)
            .text("backend", backend.as_str()))
    }

    /// Send a request and collect the body, mapping non-success statuses
    /// to a [`Rejection`]
    async fn fetch(&self, request: reqwest::RequestBuilder) -> Result<Vec<u8>, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        if !status.is_success() {
            debug!(status = status.as_u16(), "Service answered with an error status");
            return Err(ApiError::Rejected(parse_rejection(status.as_u16(), &body)));
        }

        Ok(body.to_vec())
    }

    fn parse_job(body: &[u8]) -> Result<Job, ApiError> {
        serde_json::from_slice(body).map_err(|e| ApiError::Parse(e.to_string()))
    }
}

/// Extract the job id and message from an error body.
///
/// The service reports errors either flat (`{job_id, message}`) or nested
/// under `detail`, which is a string, an object with `message`/`job_id`,
/// or a list of validation errors carrying `msg`. Anything unreadable is
/// treated as an empty body.
fn parse_rejection(status: u16, body: &[u8]) -> Rejection {
    let value: Value = serde_json::from_slice(body).unwrap_or(Value::Null);
    let detail = value.get("detail");

    let (detail_job_id, detail_message) = match detail {
        Some(Value::String(s)) => (None, Some(s.clone())),
        Some(Value::Object(_)) => (
            string_field(detail, "job_id"),
            string_field(detail, "message"),
        ),
        Some(Value::Array(items)) => (None, items.first().and_then(|i| string_field(Some(i), "msg"))),
        _ => (None, None),
    };

    Rejection {
        status,
        job_id: string_field(Some(&value), "job_id").or(detail_job_id),
        message: string_field(Some(&value), "message").or(detail_message),
    }
}

fn string_field(value: Option<&Value>, key: &str) -> Option<String> {
    value?
        .get(key)?
        .as_str()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[async_trait]
impl AnalysisApi for HttpAnalysisApi {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn submit(&self, file: &AudioFile, backend: BackendChoice) -> Result<Job, ApiError> {
        let form = Self::build_form(file, backend)?;
        let request = self.client.post(self.url(&["analyze"])?).multipart(form);
        let body = self.fetch(request).await?;
        Self::parse_job(&body)
    }

    async fn job_status(&self, job_id: &str) -> Result<Job, ApiError> {
        let request = self.client.get(self.url(&["jobs", job_id])?);
        let body = self.fetch(request).await?;
        Self::parse_job(&body)
    }

    async fn download(&self, job_id: &str, artifact: Artifact) -> Result<Vec<u8>, ApiError> {
        let request = self.client.get(self.url(&artifact.segments(job_id))?);
        self.fetch(request).await
    }

    async fn health(&self) -> Result<HealthReport, ApiError> {
        let body = self.fetch(self.client.get(self.url(&["health"])?)).await?;
        let response: HealthResponse =
            serde_json::from_slice(&body).map_err(|e| ApiError::Parse(e.to_string()))?;

        Ok(HealthReport {
            ok: response.ok,
            error: response.error,
        })
    }
}
