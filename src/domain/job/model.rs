//! Job entity and its status value object

use std::fmt;

use serde::{Deserialize, Serialize};

/// Sentinel id used when the service never handed out a real one
pub const UNKNOWN_JOB_ID: &str = "unknown";

/// Fallback message when a rejected upload carries no explanation
pub const UPLOAD_FAILED: &str = "Upload failed.";

/// Message when the upload request never completed
pub const UPLOAD_UNREACHABLE: &str = "Upload failed. Check API connectivity.";

/// Message when a status query fails
pub const POLL_FAILED: &str = "Failed to poll job status.";

/// Job status as reported by the service.
///
/// The set of values is open: only `done` and `error` carry meaning for the
/// client, anything else is treated as still in progress.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobStatus(String);

impl JobStatus {
    pub const DONE: &'static str = "done";
    pub const ERROR: &'static str = "error";

    pub fn new(status: impl Into<String>) -> Self {
        Self(status.into())
    }

    pub fn done() -> Self {
        Self::new(Self::DONE)
    }

    pub fn error() -> Self {
        Self::new(Self::ERROR)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Exactly `done`
    pub fn is_done(&self) -> bool {
        self.0 == Self::DONE
    }

    /// Exactly `error`
    pub fn is_error(&self) -> bool {
        self.0 == Self::ERROR
    }

    /// Terminal statuses end polling
    pub fn is_terminal(&self) -> bool {
        self.is_done() || self.is_error()
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for JobStatus {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for JobStatus {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A single analysis task tracked by the service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub job_id: String,
    pub status: JobStatus,
    #[serde(default)]
    pub error: Option<String>,
    /// Original file name, echoed by the service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    /// Backend the job runs on, echoed by the service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend: Option<String>,
}

impl Job {
    pub fn new(job_id: impl Into<String>, status: impl Into<JobStatus>) -> Self {
        Self {
            job_id: job_id.into(),
            status: status.into(),
            error: None,
            filename: None,
            backend: None,
        }
    }

    /// A job in `error` state with the given message
    pub fn failed(job_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::new(job_id, JobStatus::error())
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Whether a real id was assigned by the service
    pub fn has_known_id(&self) -> bool {
        !self.job_id.is_empty() && self.job_id != UNKNOWN_JOB_ID
    }
}

/// Client-side failure kinds, each folded into an `error` job
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobFailure {
    /// The service answered the upload with a non-success status
    SubmissionRejected {
        job_id: Option<String>,
        message: Option<String>,
    },
    /// The upload request never completed or its answer was unreadable
    SubmissionTransport,
    /// A status query failed
    PollTransport { last_job_id: Option<String> },
}

impl JobFailure {
    /// Build the job state this failure is surfaced as
    pub fn into_job(self) -> Job {
        match self {
            Self::SubmissionRejected { job_id, message } => Job::failed(
                non_empty(job_id).unwrap_or_else(|| UNKNOWN_JOB_ID.to_string()),
                non_empty(message).unwrap_or_else(|| UPLOAD_FAILED.to_string()),
            ),
            Self::SubmissionTransport => Job::failed(UNKNOWN_JOB_ID, UPLOAD_UNREACHABLE),
            Self::PollTransport { last_job_id } => Job::failed(
                non_empty(last_job_id).unwrap_or_else(|| UNKNOWN_JOB_ID.to_string()),
                POLL_FAILED,
            ),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}
