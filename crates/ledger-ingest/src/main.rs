//! Ledger Ingest - spreadsheet to Postgres ingestion tool

use anyhow::{Context, Result};
use clap::Parser;
use ledger_common::logging::{init_logging, LogConfig, LogLevel};
use ledger_ingest::config::IngestConfig;
use ledger_ingest::orchestrator::{log_summary, Orchestrator};
use ledger_ingest::sink::{DryRunSink, PgSink, RecordSink};
use ledger_ingest::source::SheetsClient;
use ledger_ingest::tasks::TaskId;
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "ledger-ingest")]
#[command(author, version, about = "Spreadsheet ledger ingestion pipeline")]
struct Cli {
    /// Run only these tasks (repeatable); all tasks run by default
    #[arg(long, value_enum)]
    only: Vec<TaskId>,

    /// Fetch and validate, but do not write to the database
    #[arg(long)]
    dry_run: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Directory for the run log and diagnostic logs
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Environment file loaded before configuration is read
    #[arg(long, default_value = ".env")]
    env_file: PathBuf,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let env_file_loaded = match dotenvy::from_path(&cli.env_file) {
        Ok(()) => true,
        Err(e) if e.not_found() => false,
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to load {}", cli.env_file.display()))
        },
    };

    let mut log_config = LogConfig::from_env().context("Invalid logging configuration")?;
    if cli.verbose {
        log_config.level = LogLevel::Debug;
    }
    if let Some(dir) = &cli.log_dir {
        log_config.log_dir = dir.clone();
    }

    // Held until exit so buffered log lines are flushed.
    let guard = init_logging(&log_config).context("Failed to initialize logging")?;

    if env_file_loaded {
        info!("Loaded environment from {}", cli.env_file.display());
    }

    let mut config = IngestConfig::load(&cli.only, cli.dry_run)
        .inspect_err(|e| error!("Configuration error: {}", e))
        .context("Failed to load configuration")?;
    if let Some(dir) = cli.log_dir {
        config.log_dir = dir;
    }

    let source = SheetsClient::new(&config.sheets).context("Failed to create Sheets client")?;

    let sink: Box<dyn RecordSink> = match (&config.database, config.upload.dry_run) {
        (Some(database), false) => Box::new(
            PgSink::connect(database, &config.upload).context("Failed to create database pool")?,
        ),
        _ => {
            info!("Dry run: nothing will be written to the database");
            Box::new(DryRunSink)
        },
    };

    let orchestrator = Orchestrator::new(&source, sink.as_ref(), &config.log_dir);
    let summary = orchestrator.run(&config.tasks).await;

    log_summary(&summary, guard.log_file());

    Ok(())
}
