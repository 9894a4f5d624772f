mod nearest;
mod output;
mod refresh;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "leafdex")]
#[command(about = "Leafdex store directory command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch the live feed once, reconcile against the static catalogue, and
    /// print the nearest listings.
    Refresh {
        /// Origin latitude; falls back to the configured origin when absent.
        #[arg(long)]
        lat: Option<f64>,
        /// Origin longitude.
        #[arg(long)]
        lng: Option<f64>,
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Rank the static catalogue by distance without touching the network.
    Nearest {
        #[arg(long)]
        lat: Option<f64>,
        #[arg(long)]
        lng: Option<f64>,
        #[arg(long, default_value_t = 10)]
        limit: usize,
        /// Previously exported catalogue snapshot overriding the bundled one.
        #[arg(long, env = "LEAFDEX_SNAPSHOT_PATH")]
        snapshot: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Refresh { lat, lng, limit } => refresh::run(lat, lng, limit).await,
        Commands::Nearest {
            lat,
            lng,
            limit,
            snapshot,
        } => nearest::run(lat, lng, limit, snapshot),
    }
}
