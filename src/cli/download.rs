//! Report download to disk

use std::path::{Component, Path, PathBuf};

use thiserror::Error;
use tokio::fs;
use tracing::debug;

use crate::application::ports::{AnalysisApi, ApiError};
use crate::domain::job::Artifact;

/// Errors while saving reports
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("Job id '{0}' cannot be used as a directory name")]
    InvalidJobId(String),

    #[error("Failed to download {artifact}: {source}")]
    Api {
        artifact: Artifact,
        #[source]
        source: ApiError,
    },

    #[error("Downloaded {0} is empty")]
    Empty(Artifact),

    #[error("Failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// A report written to disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedReport {
    pub artifact: Artifact,
    pub path: PathBuf,
    pub size_bytes: usize,
}

/// Fetch every report of a job into `<output_dir>/<job_id>/`.
///
/// Stops at the first failure; reports already written stay on disk.
pub async fn save_reports<A: AnalysisApi + ?Sized>(
    api: &A,
    job_id: &str,
    output_dir: &Path,
) -> Result<Vec<SavedReport>, DownloadError> {
    let job_dir = job_dir(output_dir, job_id)?;
    fs::create_dir_all(&job_dir)
        .await
        .map_err(|source| DownloadError::Write {
            path: job_dir.display().to_string(),
            source,
        })?;

    let mut saved = Vec::with_capacity(Artifact::ALL.len());
    for artifact in Artifact::ALL {
        let bytes = api
            .download(job_id, artifact)
            .await
            .map_err(|source| DownloadError::Api { artifact, source })?;
        if bytes.is_empty() {
            return Err(DownloadError::Empty(artifact));
        }

        let path = job_dir.join(artifact.file_name());
        fs::write(&path, &bytes)
            .await
            .map_err(|source| DownloadError::Write {
                path: path.display().to_string(),
                source,
            })?;
        debug!(job_id, artifact = %artifact, size = bytes.len(), "Report saved");

        saved.push(SavedReport {
            artifact,
            path,
            size_bytes: bytes.len(),
        });
    }

    Ok(saved)
}

/// Directory for a job's reports. The id comes from the service, so it
/// must be exactly one plain path component.
fn job_dir(output_dir: &Path, job_id: &str) -> Result<PathBuf, DownloadError> {
    let mut components = Path::new(job_id).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(name)), None) if name == job_id => Ok(output_dir.join(name)),
        _ => Err(DownloadError::InvalidJobId(job_id.to_string())),
    }
}
