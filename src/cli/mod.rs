//! CLI layer - Command-line interface
//!
//! Contains argument parsing, output formatting, signal handling,
//! report downloads and the command runners.

pub mod app;
pub mod args;
pub mod config_cmd;
pub mod download;
pub mod presenter;
pub mod signals;

// Re-export commonly used types
pub use app::{
    run_analyze, run_download, run_health, run_status, EXIT_ERROR, EXIT_INTERRUPTED,
    EXIT_SUCCESS, EXIT_USAGE_ERROR,
};
pub use args::{AnalyzeOptions, Cli, Commands, ConfigAction};
pub use presenter::Presenter;
