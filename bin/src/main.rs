//! Ronda CLI binary.
//!
//! Scores management quality from announcement and price history stored in
//! per-entity directories.

mod cmd;
mod data;

use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::{Parser, Subcommand};
use cmd::analyze::{OutputFormat, analyze_entities};
use cmd::thresholds::show_thresholds;
use ronda::AssetClass;
use tracing_subscriber::EnvFilter;

/// Environment variable naming a default configuration file.
const CONFIG_ENV: &str = "RONDA_CONFIG";

#[derive(Parser)]
#[command(name = "ronda")]
#[command(about = "Management quality scoring from announcement price reactions", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze one or more entity directories
    Analyze {
        /// Entity directories (events.json, prices.csv, optional news.json and fundamentals.json)
        #[arg(required = true)]
        dirs: Vec<PathBuf>,

        /// Analysis date (YYYY-MM-DD); defaults to the latest price date
        #[arg(long)]
        as_of: Option<String>,

        /// JSON configuration file; falls back to $RONDA_CONFIG
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Asset class (small, mid, large), overriding the configuration
        #[arg(short, long)]
        asset_class: Option<AssetClass>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Show classification thresholds
    Thresholds {
        /// Asset class; all classes when omitted
        #[arg(short, long)]
        asset_class: Option<AssetClass>,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var("RUST_LOG").ok().as_deref()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            dirs,
            as_of,
            config,
            asset_class,
            format,
        } => {
            let config = config.or_else(|| std::env::var(CONFIG_ENV).ok().map(PathBuf::from));
            analyze_entities(&dirs, as_of, config, asset_class, format).await?;
        }
        Commands::Thresholds { asset_class } => {
            show_thresholds(asset_class)?;
        }
    }

    Ok(())
}

/// Log filter from `RUST_LOG` directives, `info` when unset or invalid.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}
