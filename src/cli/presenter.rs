//! CLI presenter for output formatting

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

use crate::domain::job::{remediation, Artifact, DownloadLinks, Job};

/// Presenter for CLI output formatting.
///
/// Status and diagnostics go to stderr; stdout only carries results
/// (job ids, report links, config values) so it can be piped.
pub struct Presenter {
    spinner: Option<ProgressBar>,
}

impl Presenter {
    /// Create a new presenter
    pub fn new() -> Self {
        Self { spinner: None }
    }

    /// Start a spinner with message
    pub fn start_spinner(&mut self, message: &str) {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.cyan} {msg} {elapsed:.dim}")
        {
            spinner.set_style(style);
        }
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        self.spinner = Some(spinner);
    }

    /// Update spinner message
    pub fn update_spinner(&self, message: &str) {
        if let Some(ref spinner) = self.spinner {
            spinner.set_message(message.to_string());
        }
    }

    /// Mark spinner as success and finish
    pub fn spinner_success(&mut self, message: &str) {
        match self.spinner.take() {
            Some(spinner) if !spinner.is_hidden() => {
                spinner.finish_with_message(format!("{} {}", "✓".green(), message))
            }
            // stderr is not a terminal, the spinner never drew anything
            _ => self.success(message),
        }
    }

    /// Mark spinner as failed and finish
    pub fn spinner_fail(&mut self, message: &str) {
        match self.spinner.take() {
            Some(spinner) if !spinner.is_hidden() => {
                spinner.finish_with_message(format!("{} {}", "✗".red(), message))
            }
            _ => self.error(message),
        }
    }

    /// Print info message to stderr
    pub fn info(&self, message: &str) {
        eprintln!("{} {}", "ℹ".cyan(), message);
    }

    /// Print success message to stderr
    pub fn success(&self, message: &str) {
        eprintln!("{} {}", "✓".green(), message);
    }

    /// Print error message to stderr
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Output text to stdout
    pub fn output(&self, text: &str) {
        println!("{}", text);
    }

    /// Print a key-value pair to stdout
    pub fn key_value(&self, key: &str, value: &str) {
        println!("{}: {}", key.cyan(), value);
    }

    /// One-line progress text for the spinner
    pub fn format_progress(job: &Job) -> String {
        format!("Job {}: {}", job.job_id, job.status)
    }

    /// Print the fields of a job to stdout
    pub fn job_details(&self, job: &Job) {
        self.key_value("job_id", &job.job_id);
        self.key_value("status", job.status.as_str());
        if let Some(ref filename) = job.filename {
            self.key_value("filename", filename);
        }
        if let Some(ref backend) = job.backend {
            self.key_value("backend", backend);
        }
    }

    /// Print report links to stdout; nothing when there are none
    pub fn links(&self, links: &DownloadLinks) {
        if links.is_empty() {
            return;
        }
        for artifact in Artifact::ALL {
            self.key_value(artifact.file_name(), links.url(artifact));
        }
    }

    /// Print a job's error message followed by remediation hints
    pub fn job_error(&self, job: &Job) {
        let message = job.error.as_deref().unwrap_or("Job failed without an error message.");
        self.error(message);
        self.hints(message);
    }

    /// Print remediation hints for an error text, if any
    pub fn hints(&self, error_text: &str) {
        let hints = remediation::suggest(error_text);
        if hints.is_empty() {
            return;
        }
        eprintln!("{}", "Possible fixes:".yellow());
        for hint in hints {
            eprintln!("  {} {}", "-".yellow(), hint);
        }
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}
