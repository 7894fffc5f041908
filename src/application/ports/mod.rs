//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod analysis_api;
pub mod config;

// Re-export common types
pub use analysis_api::{AnalysisApi, ApiError, HealthReport, Rejection};
pub use config::ConfigStore;
