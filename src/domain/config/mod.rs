//! Configuration domain module

mod app_config;

pub use app_config::{AppConfig, DEFAULT_API_BASE, DEFAULT_OUTPUT_DIR};
