use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use hireflow::config::AppConfig;
use hireflow::error::AppError;
use hireflow::workflows::recruitment::{render_csv, AnalyticsStore, JsonAnalyticsStore};

use crate::demo::{run_demo, DemoArgs};
use crate::server;

#[derive(Parser, Debug)]
#[command(
    name = "Recruitment Workflow Orchestrator",
    about = "Run and demonstrate the recruitment workflow service from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Run an end-to-end CLI demo of the candidate workflow
    Demo(DemoArgs),
    /// Verify that all provider credentials are configured
    Preflight,
    /// Analytics reporting for recruiters
    Analytics {
        #[command(subcommand)]
        command: AnalyticsCommand,
    },
}

#[derive(Subcommand, Debug)]
enum AnalyticsCommand {
    /// Export the per-role counters as CSV
    Export(ExportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Override the configured data directory for the JSON stores
    #[arg(long)]
    pub(crate) data_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ExportArgs {
    /// Override the configured data directory for the JSON stores
    #[arg(long)]
    data_dir: Option<PathBuf>,
    /// Write the CSV to a file instead of stdout
    #[arg(long)]
    out: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Demo(args) => run_demo(args),
        Command::Preflight => run_preflight(),
        Command::Analytics {
            command: AnalyticsCommand::Export(args),
        } => run_analytics_export(args),
    }
}

/// Standalone credential check: lists every missing provider variable and
/// fails the process rather than letting the service fall back to blanks.
fn run_preflight() -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let missing = config.providers.missing();

    if missing.is_empty() {
        println!("All provider credentials are configured.");
        return Ok(());
    }

    for name in &missing {
        println!("{name} is missing");
    }
    config.providers.require().map_err(AppError::from)
}

fn run_analytics_export(args: ExportArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let data_dir = args.data_dir.unwrap_or(config.data.dir);

    let store = JsonAnalyticsStore::open(data_dir.join("analytics.json"));
    let snapshot = store
        .snapshot()
        .map_err(|err| AppError::Workflow(err.into()))?;
    let csv = render_csv(&snapshot).map_err(|err| AppError::Workflow(err.into()))?;

    match args.out {
        Some(path) => std::fs::write(&path, csv)?,
        None => print!("{csv}"),
    }
    Ok(())
}
