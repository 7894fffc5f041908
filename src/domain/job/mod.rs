//! Analysis job domain module

mod backend;
mod links;
mod model;
pub mod remediation;

pub use backend::{BackendChoice, ALL_BACKENDS};
pub use links::{endpoint_url, Artifact, DownloadLinks};
pub use model::{
    Job, JobFailure, JobStatus, POLL_FAILED, UNKNOWN_JOB_ID, UPLOAD_FAILED, UPLOAD_UNREACHABLE,
};
