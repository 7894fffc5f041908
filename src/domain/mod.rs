//! Domain layer - Core business logic
//!
//! Contains value objects, entities, and domain errors.
//! This layer has no dependencies on external systems.

pub mod config;
pub mod error;
pub mod job;
pub mod upload;

// Re-export common types
pub use config::AppConfig;
pub use error::*;
pub use job::{Artifact, BackendChoice, DownloadLinks, Job, JobFailure, JobStatus};
pub use upload::{AudioFile, AudioMimeType};
