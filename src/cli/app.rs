//! Command runners

use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use tokio::fs;
use tracing::{debug, warn};

use crate::application::ports::{AnalysisApi, ConfigStore};
use crate::application::JobController;
use crate::domain::config::AppConfig;
use crate::domain::error::AudioFileError;
use crate::domain::job::{DownloadLinks, Job, JobFailure};
use crate::domain::upload::{human_readable_size, AudioFile, AudioMimeType};
use crate::infrastructure::{HttpAnalysisApi, XdgConfigStore};

use super::args::AnalyzeOptions;
use super::download::save_reports;
use super::presenter::Presenter;
use super::signals::ShutdownSignal;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;
pub const EXIT_INTERRUPTED: u8 = 130;

/// Environment overrides
pub const API_BASE_ENV: &str = "SALES_ANALYZER_API_BASE";
pub const BACKEND_ENV: &str = "SALES_ANALYZER_BACKEND";

const HEALTH_UNREACHABLE: &str = "Health check failed. Check API connectivity.";

/// How waiting on a job ended
enum Tracked {
    Settled(Option<Job>),
    Interrupted,
}

/// Upload a recording and follow the job until it finishes
pub async fn run_analyze(api_base: String, options: AnalyzeOptions) -> ExitCode {
    let mut presenter = Presenter::new();

    let file = match read_recording(&options.file).await {
        Ok(file) => file,
        Err(e @ AudioFileError::UnsupportedExtension { .. }) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let shutdown = ShutdownSignal::new();
    shutdown.install();

    let controller = JobController::new(HttpAnalysisApi::new(api_base));

    presenter.start_spinner(&format!(
        "Uploading {} ({}) with {} backend",
        file.file_name(),
        file.human_readable_size(),
        options.backend
    ));

    let job = tokio::select! {
        job = controller.submit(&file, options.backend) => job,
        _ = shutdown.wait() => {
            presenter.spinner_fail("Interrupted during upload");
            return ExitCode::from(EXIT_INTERRUPTED);
        }
    };

    if job.status.is_error() {
        presenter.spinner_fail(&Presenter::format_progress(&job));
        presenter.job_error(&job);
        if job.has_known_id() {
            presenter.output(&job.job_id);
        }
        return ExitCode::from(EXIT_ERROR);
    }

    if !options.wait {
        controller.stop_polling();
        presenter.spinner_success(&format!("Uploaded, job {} is {}", job.job_id, job.status));
        presenter.output(&job.job_id);
        return ExitCode::from(EXIT_SUCCESS);
    }

    let job = match track(&controller, &mut presenter, &shutdown).await {
        Tracked::Settled(job) => job,
        Tracked::Interrupted => return interrupted(&mut presenter, &job.job_id),
    };

    let code = finish(&controller, &mut presenter, job.as_ref());
    if code != EXIT_SUCCESS || !options.download {
        return ExitCode::from(code);
    }

    match job {
        Some(job) => {
            download_reports(controller.api(), &presenter, &job.job_id, &options.output_dir).await
        }
        None => ExitCode::from(EXIT_ERROR),
    }
}

/// Show the status of a job, optionally following it until it finishes
pub async fn run_status(api_base: String, job_id: String, watch: bool) -> ExitCode {
    let mut presenter = Presenter::new();
    let api = HttpAnalysisApi::new(api_base);

    if !watch {
        return match api.job_status(&job_id).await {
            Ok(job) => {
                presenter.job_details(&job);
                presenter.links(&DownloadLinks::derive(api.base_url(), Some(&job)));
                if job.status.is_error() {
                    presenter.job_error(&job);
                    ExitCode::from(EXIT_ERROR)
                } else {
                    ExitCode::from(EXIT_SUCCESS)
                }
            }
            Err(e) => {
                warn!(job_id = %job_id, error = %e, "Status query failed");
                let failed = JobFailure::PollTransport {
                    last_job_id: Some(job_id),
                }
                .into_job();
                presenter.job_error(&failed);
                presenter.info(&e.to_string());
                ExitCode::from(EXIT_ERROR)
            }
        };
    }

    let shutdown = ShutdownSignal::new();
    shutdown.install();

    let controller = JobController::new(api);
    presenter.start_spinner(&format!("Waiting for job {}", job_id));
    controller.start_polling(&job_id);

    match track(&controller, &mut presenter, &shutdown).await {
        Tracked::Settled(job) => ExitCode::from(finish(&controller, &mut presenter, job.as_ref())),
        Tracked::Interrupted => interrupted(&mut presenter, &job_id),
    }
}

/// Download the reports of a finished job
pub async fn run_download(api_base: String, job_id: String, output_dir: PathBuf) -> ExitCode {
    let presenter = Presenter::new();
    let api = HttpAnalysisApi::new(api_base);
    download_reports(&api, &presenter, &job_id, &output_dir).await
}

/// Query the service readiness endpoint
pub async fn run_health(api_base: String) -> ExitCode {
    let presenter = Presenter::new();
    let api = HttpAnalysisApi::new(api_base);

    match api.health().await {
        Ok(report) if report.ok => {
            presenter.success(&format!("Service at {} is healthy", api.base_url()));
            ExitCode::from(EXIT_SUCCESS)
        }
        Ok(report) => {
            let message = report
                .error
                .unwrap_or_else(|| "Service reported it is not ready".to_string());
            presenter.error(&message);
            presenter.hints(&message);
            ExitCode::from(EXIT_ERROR)
        }
        Err(e) => {
            warn!(error = %e, "Health check failed");
            presenter.error(HEALTH_UNREACHABLE);
            presenter.info(&e.to_string());
            presenter.hints(HEALTH_UNREACHABLE);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Load a recording from disk as an upload payload
pub async fn read_recording(path: &Path) -> Result<AudioFile, AudioFileError> {
    let display = path.display().to_string();
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| display.clone());

    // Reject by extension before reading the whole file
    if AudioMimeType::from_file_name(&file_name).is_none() {
        return Err(AudioFileError::UnsupportedExtension { path: display });
    }

    let data = fs::read(path)
        .await
        .map_err(|e| AudioFileError::ReadError {
            path: display,
            message: e.to_string(),
        })?;
    debug!(file = %file_name, size = data.len(), "Recording loaded");

    AudioFile::new(file_name, data)
}

/// Load and merge configuration from file, env, and CLI
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let store = XdgConfigStore::new();
    let file_config = match store.load().await {
        Ok(config) => config,
        Err(e) => {
            warn!(path = %store.path().display(), error = %e, "Ignoring unreadable config file");
            AppConfig::empty()
        }
    };

    let env_config = AppConfig {
        api_base: env_value(API_BASE_ENV),
        backend: env_value(BACKEND_ENV),
        ..AppConfig::empty()
    };

    // Merge: defaults < file < env < cli
    AppConfig::defaults()
        .merge(file_config)
        .merge(env_config)
        .merge(cli_config)
}

fn env_value(name: &str) -> Option<String> {
    env::var(name).ok().filter(|s| !s.trim().is_empty())
}

/// Render controller updates until nothing is in flight or Ctrl-C
async fn track<A: AnalysisApi + 'static>(
    controller: &JobController<A>,
    presenter: &mut Presenter,
    shutdown: &ShutdownSignal,
) -> Tracked {
    let mut updates = controller.subscribe();
    loop {
        let state = updates.borrow_and_update().clone();
        if let Some(ref job) = state.job {
            presenter.update_spinner(&Presenter::format_progress(job));
        }
        if state.is_settled() {
            return Tracked::Settled(state.job);
        }

        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    return Tracked::Settled(controller.job());
                }
            }
            _ = shutdown.wait() => {
                controller.stop_polling();
                return Tracked::Interrupted;
            }
        }
    }
}

/// Report the final job state, returning the exit code
fn finish<A: AnalysisApi + 'static>(
    controller: &JobController<A>,
    presenter: &mut Presenter,
    job: Option<&Job>,
) -> u8 {
    match job {
        Some(job) if job.status.is_done() => {
            presenter.spinner_success(&Presenter::format_progress(job));
            presenter.links(&controller.download_links());
            EXIT_SUCCESS
        }
        Some(job) => {
            presenter.spinner_fail(&Presenter::format_progress(job));
            presenter.job_error(job);
            EXIT_ERROR
        }
        None => {
            presenter.spinner_fail("Job state was lost");
            EXIT_ERROR
        }
    }
}

fn interrupted(presenter: &mut Presenter, job_id: &str) -> ExitCode {
    presenter.spinner_fail(&format!("Interrupted, job {} keeps running on the service", job_id));
    presenter.output(job_id);
    ExitCode::from(EXIT_INTERRUPTED)
}

async fn download_reports<A: AnalysisApi + ?Sized>(
    api: &A,
    presenter: &Presenter,
    job_id: &str,
    output_dir: &Path,
) -> ExitCode {
    match save_reports(api, job_id, output_dir).await {
        Ok(saved) => {
            for report in saved {
                presenter.success(&format!(
                    "Saved {} ({})",
                    report.path.display(),
                    human_readable_size(report.size_bytes)
                ));
            }
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            presenter.error(&e.to_string());
            ExitCode::from(EXIT_ERROR)
        }
    }
}
