//! Analysis service port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::job::{Artifact, BackendChoice, Job};
use crate::domain::upload::AudioFile;

/// Explanation extracted from a non-success response body
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rejection {
    pub status: u16,
    pub job_id: Option<String>,
    pub message: Option<String>,
}

/// Analysis service errors
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    #[error("API request failed: {0}")]
    Transport(String),

    #[error("API rejected the request (HTTP {}): {}", .0.status, .0.message.as_deref().unwrap_or("no details"))]
    Rejected(Rejection),

    #[error("Failed to parse API response: {0}")]
    Parse(String),
}

/// Result of the service's readiness check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthReport {
    pub ok: bool,
    pub error: Option<String>,
}

/// Port for the remote analysis service
#[async_trait]
pub trait AnalysisApi: Send + Sync {
    /// Base URL every endpoint is resolved against, without trailing slash
    fn base_url(&self) -> &str;

    /// Upload a recording and create a job.
    ///
    /// # Arguments
    /// * `file` - The recording to analyze
    /// * `backend` - Transcription engine to run the job with
    ///
    /// # Returns
    /// The freshly created job, usually in a non-terminal state
    async fn submit(&self, file: &AudioFile, backend: BackendChoice) -> Result<Job, ApiError>;

    /// Fetch the current state of a job.
    async fn job_status(&self, job_id: &str) -> Result<Job, ApiError>;

    /// Fetch a report artifact of a finished job.
    async fn download(&self, job_id: &str, artifact: Artifact) -> Result<Vec<u8>, ApiError>;

    /// Query the service readiness endpoint.
    async fn health(&self) -> Result<HealthReport, ApiError>;
}
