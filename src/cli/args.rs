//! CLI argument definitions using Clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::domain::job::BackendChoice;

/// Sales Analyzer - upload call recordings and fetch their analysis reports
#[derive(Parser, Debug)]
#[command(name = "sales-analyzer")]
#[command(version)]
#[command(about = "Upload a sales call recording for transcription and analysis, then fetch the reports")]
#[command(long_about = None)]
pub struct Cli {
    /// Analysis service base URL (default: http://localhost:8000)
    #[arg(long, global = true, value_name = "URL")]
    pub api_base: Option<String>,

    /// Enable debug logging on stderr (RUST_LOG overrides)
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Upload a recording and track the analysis job until it finishes
    Analyze {
        /// Recording to upload (mp3, wav, m4a or aac)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Transcription backend to run the job with
        #[arg(short = 'b', long, value_name = "BACKEND")]
        backend: Option<BackendArg>,

        /// Print the job id right after upload instead of waiting
        #[arg(long)]
        no_wait: bool,

        /// Download the reports once the job is done
        #[arg(short = 'd', long, conflicts_with = "no_wait")]
        download: bool,

        /// Directory reports are downloaded into
        #[arg(short = 'o', long, value_name = "DIR")]
        output_dir: Option<PathBuf>,
    },
    /// Show the status of a job
    Status {
        /// Job id returned by `analyze`
        job_id: String,

        /// Keep polling until the job finishes
        #[arg(short = 'w', long)]
        watch: bool,
    },
    /// Download the PDF and JSON reports of a finished job
    Download {
        /// Job id returned by `analyze`
        job_id: String,

        /// Directory reports are downloaded into
        #[arg(short = 'o', long, value_name = "DIR")]
        output_dir: Option<PathBuf>,
    },
    /// Check that the analysis service is up
    Health,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Backend argument for clap ValueEnum
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum BackendArg {
    Faster,
    Openai,
}

impl From<BackendArg> for BackendChoice {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Faster => BackendChoice::Faster,
            BackendArg::Openai => BackendChoice::Openai,
        }
    }
}

/// Parsed options for `analyze`
#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    pub file: PathBuf,
    pub backend: BackendChoice,
    pub wait: bool,
    pub download: bool,
    pub output_dir: PathBuf,
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &["api_base", "backend", "output_dir"];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}
