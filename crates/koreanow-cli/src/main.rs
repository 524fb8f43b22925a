mod ingest;
mod schedule;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "koreanow-cli")]
#[command(about = "Korea Now policy news feed tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run one ingestion pass and rewrite the feed file.
    Fetch {
        /// Feed file to write instead of `KOREANOW_FEED_PATH`.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Keep running ingestion on a cron schedule until interrupted.
    Schedule {
        /// Six-field cron expression (with seconds) instead of `KOREANOW_FETCH_SCHEDULE`.
        #[arg(long)]
        cron: Option<String>,
        /// Feed file to write instead of `KOREANOW_FEED_PATH`.
        #[arg(long)]
        output: Option<PathBuf>,
        /// Run once immediately before waiting for the first tick.
        #[arg(long)]
        run_now: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = koreanow_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Fetch { output } => ingest::run_fetch(&config, output.as_deref()).await,
        Commands::Schedule {
            cron,
            output,
            run_now,
        } => {
            let cron = cron.unwrap_or_else(|| config.fetch_schedule.clone());
            schedule::run_schedule(&config, &cron, output.as_deref(), run_now).await
        }
    }
}
