//! Report artifacts and their download links

use std::fmt;

use url::Url;

use super::model::Job;

/// Resolve path segments against a base URL, percent-encoding each one.
///
/// Segments are appended to whatever path the base already has. Returns
/// `None` when the base is not an absolute URL that can carry a path.
pub fn endpoint_url<S: AsRef<str>>(base_url: &str, segments: &[S]) -> Option<String> {
    let mut url = Url::parse(base_url).ok()?;
    url.path_segments_mut()
        .ok()?
        .pop_if_empty()
        .extend(segments);
    Some(url.into())
}

/// Result files produced by a finished job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Artifact {
    Pdf,
    Json,
}

impl Artifact {
    pub const ALL: [Artifact; 2] = [Artifact::Pdf, Artifact::Json];

    /// File name of the artifact on the service and on disk
    pub const fn file_name(&self) -> &'static str {
        match self {
            Self::Pdf => "report.pdf",
            Self::Json => "report.json",
        }
    }

    /// Download path segments for a job, unencoded
    pub fn segments<'a>(&self, job_id: &'a str) -> [&'a str; 3] {
        ["download", job_id, self.file_name()]
    }

    /// Download URL for a job under the service base URL
    pub fn url(&self, base_url: &str, job_id: &str) -> Option<String> {
        endpoint_url(base_url, &self.segments(job_id))
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.file_name())
    }
}

/// Download URLs for a job's reports.
/// Both are empty unless the job finished successfully.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadLinks {
    pub pdf_url: String,
    pub json_url: String,
}

impl DownloadLinks {
    /// Derive links for the given job, if any. An unusable base URL
    /// yields no links.
    pub fn derive(base_url: &str, job: Option<&Job>) -> Self {
        let Some(job) = job.filter(|j| j.status.is_done() && !j.job_id.is_empty()) else {
            return Self::default();
        };

        match (
            Artifact::Pdf.url(base_url, &job.job_id),
            Artifact::Json.url(base_url, &job.job_id),
        ) {
            (Some(pdf_url), Some(json_url)) => Self { pdf_url, json_url },
            _ => Self::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pdf_url.is_empty() && self.json_url.is_empty()
    }

    /// URL for a single artifact
    pub fn url(&self, artifact: Artifact) -> &str {
        match artifact {
            Artifact::Pdf => &self.pdf_url,
            Artifact::Json => &self.json_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::job::JobStatus;

    const BASE: &str = "http://localhost:8000";

    #[test]
    fn no_job_has_no_links() {
        let links = DownloadLinks::derive(BASE, None);
        assert!(links.is_empty());
        assert_eq!(links, DownloadLinks::default());
    }

    #[test]
    fn non_done_statuses_have_no_links() {
        for status in ["uploaded", "queued", "running", "processing", "error", "Done", ""] {
            let job = Job::new("j1", status);
            let links = DownloadLinks::derive(BASE, Some(&job));
            assert!(links.pdf_url.is_empty(), "status {:?}", status);
            assert!(links.json_url.is_empty(), "status {:?}", status);
        }
    }

    #[test]
    fn done_job_has_both_links() {
        let job = Job::new("j1", JobStatus::done());
        let links = DownloadLinks::derive(BASE, Some(&job));
        assert_eq!(links.pdf_url, "http://localhost:8000/download/j1/report.pdf");
        assert_eq!(links.json_url, "http://localhost:8000/download/j1/report.json");
        assert_eq!(links.url(Artifact::Pdf), links.pdf_url);
    }

    #[test]
    fn done_job_without_id_has_no_links() {
        let job = Job::new("", JobStatus::done());
        assert!(DownloadLinks::derive(BASE, Some(&job)).is_empty());
    }

    #[test]
    fn artifact_urls() {
        assert_eq!(
            Artifact::Pdf.url(BASE, "abc").as_deref(),
            Some("http://localhost:8000/download/abc/report.pdf")
        );
        assert_eq!(Artifact::Json.segments("abc"), ["download", "abc", "report.json"]);
        assert_eq!(Artifact::Json.to_string(), "report.json");
    }

    #[test]
    fn job_id_is_encoded_as_one_segment() {
        let job = Job::new("../a b/c?d#e", JobStatus::done());
        let links = DownloadLinks::derive(BASE, Some(&job));
        assert_eq!(
            links.pdf_url,
            "http://localhost:8000/download/..%2Fa%20b%2Fc%3Fd%23e/report.pdf"
        );
    }

    #[test]
    fn endpoint_url_keeps_base_path() {
        assert_eq!(
            endpoint_url("http://gateway.local/analyzer", &["jobs", "j1"]).as_deref(),
            Some("http://gateway.local/analyzer/jobs/j1")
        );
        assert_eq!(
            endpoint_url("http://localhost:8000", &["health"]).as_deref(),
            Some("http://localhost:8000/health")
        );
    }

    #[test]
    fn unusable_base_has_no_links() {
        assert!(endpoint_url("not a url", &["health"]).is_none());
        assert!(endpoint_url("localhost:8000", &["health"]).is_none());
        let job = Job::new("j1", JobStatus::done());
        assert!(DownloadLinks::derive("not a url", Some(&job)).is_empty());
    }
}
