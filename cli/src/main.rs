//! CLI entrypoint for quest-tally
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::path::Path;
use std::sync::Arc;
use tally_application::{
    NoProgress, RunTallyError, RunTallyUseCase, TallyEventLogger, TallyProgressNotifier,
};
use tally_domain::{OutputFormat, TallySettings};
use tally_infrastructure::{ConfigLoader, FileConfig, JsonPostSource, JsonlTallyLogger};
use tally_presentation::{Cli, ConsoleFormatter, OutputFormatter, ProgressReporter};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let _log_guard = init_logging(cli.verbose, cli.log_dir.as_deref())?;

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    // === Configuration ===
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("Failed to load configuration")?
    };
    let settings = settings_from(&cli, &config)?;
    info!(
        "Starting quest-tally: partition {}, ranking {}",
        settings.partition_mode, settings.ranking_method
    );

    if cli.no_color || !config.output.color {
        colored::control::set_override(false);
    }

    // === Dependency Injection ===
    let mut source = JsonPostSource::new(cli.posts.clone());
    if let Some(thread) = &cli.thread {
        source = source.with_thread(thread.clone());
    }

    let cancellation = CancellationToken::new();
    let mut use_case =
        RunTallyUseCase::new(Arc::new(source)).with_cancellation(cancellation.clone());

    if let Some(path) = &cli.event_log {
        match JsonlTallyLogger::open(path) {
            Ok(logger) => {
                let logger: Arc<dyn TallyEventLogger> = Arc::new(logger);
                use_case = use_case.with_logger(logger);
            }
            Err(e) => warn!("Event log disabled; could not open {}: {}", path.display(), e),
        }
    }

    tokio::spawn({
        let cancellation = cancellation.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancellation.cancel();
            }
        }
    });

    let progress: Box<dyn TallyProgressNotifier> = if cli.quiet {
        Box::new(NoProgress)
    } else {
        Box::new(ProgressReporter::new())
    };

    let output = match use_case
        .execute_with_progress(settings, progress.as_ref())
        .await
    {
        Ok(output) => output,
        Err(RunTallyError::Cancelled) => {
            eprintln!("Tally cancelled.");
            std::process::exit(130);
        }
        Err(e) => return Err(e.into()),
    };

    // === Output ===
    let formatter = ConsoleFormatter::new()
        .with_supporters(!cli.no_supporters && config.output.show_supporters);
    let format = cli.output.or(config.output.format).unwrap_or_default();
    let rendered = match format {
        OutputFormat::Text => formatter.format(&output.report),
        OutputFormat::Json => formatter.format_json(&output.report),
    };
    println!("{}", rendered);

    Ok(())
}

/// Merge file configuration with CLI overrides.
///
/// Configuration errors (e.g. an unknown partition mode) stop the run;
/// warnings are logged and defaults used.
fn settings_from(cli: &Cli, config: &FileConfig) -> Result<TallySettings> {
    let issues = config.validate();
    for issue in issues.iter().filter(|i| !i.is_error()) {
        warn!("{}", issue.message);
    }
    if let Some(issue) = issues.iter().find(|i| i.is_error()) {
        bail!("Invalid configuration: {}", issue.message);
    }

    let mut settings = config.quest.to_settings()?;
    if let Some(mode) = cli.partition {
        settings = settings.with_partition_mode(mode);
    }
    if let Some(method) = cli.ranking {
        settings = settings.with_ranking_method(method);
    }
    if !cli.task.is_empty() {
        settings = settings.with_task_filter(cli.task.clone());
    }
    if cli.no_proxy {
        settings = settings.with_proxy_votes(false);
    }
    Ok(settings)
}

/// Initialize logging based on verbosity level.
///
/// With `log_dir`, diagnostics also go to a daily rolling file; the returned
/// guard flushes it on drop.
fn init_logging(verbose: u8, log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let Some(dir) = log_dir else {
        tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer)
            .init();
        return Ok(None);
    };

    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
    let appender = tracing_appender::rolling::daily(dir, "quest-tally.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let file_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_writer(writer);

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();
    Ok(Some(guard))
}
