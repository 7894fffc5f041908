//! Application configuration value object

use serde::{Deserialize, Serialize};

use crate::domain::job::BackendChoice;

/// Base URL used when nothing else is configured
pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

/// Directory reports are downloaded into when nothing else is configured
pub const DEFAULT_OUTPUT_DIR: &str = "reports";

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    pub api_base: Option<String>,
    pub backend: Option<String>,
    pub output_dir: Option<String>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            api_base: Some(DEFAULT_API_BASE.to_string()),
            backend: Some(BackendChoice::default().to_string()),
            output_dir: Some(DEFAULT_OUTPUT_DIR.to_string()),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            api_base: other.api_base.or(self.api_base),
            backend: other.backend.or(self.backend),
            output_dir: other.output_dir.or(self.output_dir),
        }
    }

    /// Get the service base URL without a trailing slash, or the default
    pub fn api_base_or_default(&self) -> String {
        self.api_base
            .as_deref()
            .map(|s| s.trim().trim_end_matches('/'))
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_API_BASE)
            .to_string()
    }

    /// Get backend as parsed BackendChoice, or default if not set/invalid
    pub fn backend_or_default(&self) -> BackendChoice {
        self.backend
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    /// Get the download directory, or "reports" if not set
    pub fn output_dir_or_default(&self) -> &str {
        self.output_dir.as_deref().unwrap_or(DEFAULT_OUTPUT_DIR)
    }
}
