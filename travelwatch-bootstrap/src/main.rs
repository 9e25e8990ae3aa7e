use anyhow::Result;
use clap::{Parser, Subcommand};

use travelwatch_infrastructure::{AppConfig, CONFIG_PATH_ENV};

#[derive(Parser, Debug)]
#[command(name = "travelwatch")]
#[command(about = "Impossible travel detector", long_about = None)]
struct Args {
    /// Path to config file
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Command {
    /// Scan on a fixed interval until interrupted (default)
    Run,
    /// Run a single scan pass and print its report
    ScanOnce,
    /// Print persisted anomalies as JSON
    Anomalies,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(config) = args.config {
        std::env::set_var(CONFIG_PATH_ENV, config);
    }

    let (config, origin) = AppConfig::load().await?;
    let _log_guard = travelwatch_bootstrap::logging::init(&config)?;
    origin.log();

    match args.command.unwrap_or(Command::Run) {
        Command::Run => travelwatch_bootstrap::run_standalone(config).await,
        Command::ScanOnce => travelwatch_bootstrap::scan_once(config).await,
        Command::Anomalies => travelwatch_bootstrap::print_anomalies(config).await,
    }
}
