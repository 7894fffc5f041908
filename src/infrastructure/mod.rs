//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces,
//! integrating with the analysis service over HTTP and the
//! config file on disk.

pub mod api;
pub mod config;

// Re-export adapters
pub use api::HttpAnalysisApi;
pub use config::XdgConfigStore;
