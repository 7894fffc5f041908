//! Sales Analyzer CLI entry point

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sales_analyzer::cli::{
    app::load_merged_config,
    args::{AnalyzeOptions, Cli, Commands},
    config_cmd::handle_config_command,
    run_analyze, run_download, run_health, run_status, Presenter, EXIT_ERROR, EXIT_USAGE_ERROR,
};
use sales_analyzer::domain::config::AppConfig;
use sales_analyzer::domain::job::BackendChoice;
use sales_analyzer::infrastructure::XdgConfigStore;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let presenter = Presenter::new();

    if let Commands::Config { action } = cli.command {
        let store = XdgConfigStore::new();
        if let Err(e) = handle_config_command(action, &store, &presenter).await {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
        return ExitCode::SUCCESS;
    }

    // Build CLI config from args
    let (backend, output_dir) = match &cli.command {
        Commands::Analyze {
            backend, output_dir, ..
        } => (*backend, output_dir.clone()),
        Commands::Download { output_dir, .. } => (None, output_dir.clone()),
        _ => (None, None),
    };
    let cli_config = AppConfig {
        api_base: cli.api_base.clone(),
        backend: backend.map(|b| BackendChoice::from(b).to_string()),
        output_dir: output_dir.map(|dir| dir.to_string_lossy().into_owned()),
    };

    // Merge config
    let config = load_merged_config(cli_config).await;
    let api_base = config.api_base_or_default();

    match cli.command {
        Commands::Analyze { file, no_wait, download, .. } => {
            let backend = match config.backend.as_deref() {
                Some(s) => match s.parse::<BackendChoice>() {
                    Ok(b) => b,
                    Err(e) => {
                        presenter.error(&e.to_string());
                        return ExitCode::from(EXIT_USAGE_ERROR);
                    }
                },
                None => BackendChoice::default(),
            };

            let options = AnalyzeOptions {
                file,
                backend,
                wait: !no_wait,
                download,
                output_dir: PathBuf::from(config.output_dir_or_default()),
            };

            run_analyze(api_base, options).await
        }
        Commands::Status { job_id, watch } => run_status(api_base, job_id, watch).await,
        Commands::Download { job_id, .. } => {
            run_download(api_base, job_id, PathBuf::from(config.output_dir_or_default())).await
        }
        Commands::Health => run_health(api_base).await,
        Commands::Config { .. } => ExitCode::SUCCESS,
    }
}

/// Diagnostics go to stderr so stdout stays clean for results
fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "sales_analyzer=debug"
    } else {
        "sales_analyzer=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
