//! Domain error types

use thiserror::Error;

/// Error when an unknown analysis backend is requested
#[derive(Debug, Clone, Error)]
#[error("Invalid backend: \"{input}\". Valid backends are: faster, openai")]
pub struct InvalidBackendError {
    pub input: String,
}

/// Error when a recording cannot be turned into an upload payload
#[derive(Debug, Clone, Error)]
pub enum AudioFileError {
    #[error("Failed to read recording '{path}': {message}")]
    ReadError { path: String, message: String },

    #[error("Unsupported file type '{path}'. Accepted extensions: mp3, wav, m4a, aac")]
    UnsupportedExtension { path: String },

    #[error("Recording '{0}' is empty")]
    Empty(String),
}

/// Error when configuration fails
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),

    #[error("Failed to parse config file: {0}")]
    ParseError(String),

    #[error("Failed to write config file: {0}")]
    WriteError(String),

    #[error("Invalid config value for '{key}': {message}")]
    ValidationError { key: String, message: String },

    #[error("Config file already exists at: {0}")]
    AlreadyExists(String),
}
