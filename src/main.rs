use std::path::PathBuf;

use anyhow::Context;
use chrono::Datelike;
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use watch_wrapped::config::Config;
use watch_wrapped::constants::API_KEY_ENV;
use watch_wrapped::history::{available_years, load_watch_history};
use watch_wrapped::infra::youtube_client::YouTubeClient;
use watch_wrapped::observability;
use watch_wrapped::pipeline::{EnrichmentOptions, Pipeline};
use watch_wrapped::presenter::{render_text, WrappedReport};
use watch_wrapped::types::YearFilter;

#[derive(Parser)]
#[command(name = "watch_wrapped")]
#[command(about = "Year-in-review statistics for a YouTube watch history export")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize a watch-history.json export
    Analyze {
        /// Path to watch-history.json from Google Takeout
        #[arg(long)]
        history: PathBuf,
        /// Year to analyze, or "all" (default: current year)
        #[arg(long)]
        year: Option<YearFilter>,
        /// YouTube Data API key for exact watch time and categories
        #[arg(long)]
        api_key: Option<String>,
        /// Config file (default: ./config.toml if present)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Print the report as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// List the years present in a watch-history.json export
    Years {
        #[arg(long)]
        history: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    observability::init_logging();
    observability::init_metrics();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            history,
            year,
            api_key,
            config,
            json,
        } => {
            let config = match config {
                Some(path) => Config::load_from(&path)?,
                None => Config::load()?,
            };
            let events = load_watch_history(&history)
                .with_context(|| format!("reading {}", history.display()))?;
            let year = year.unwrap_or_else(|| YearFilter::Year(chrono::Utc::now().year()));

            let api_key = api_key
                .or_else(|| std::env::var(API_KEY_ENV).ok())
                .filter(|k| !k.trim().is_empty());
            let client = match api_key {
                Some(key) => Some(YouTubeClient::new(&config.enrichment, key)?),
                None => {
                    info!("No API key supplied; watch time will be estimated");
                    None
                }
            };
            let options = client.as_ref().map(|c| EnrichmentOptions {
                port: c,
                policy: config.enrichment.fallback_policy(),
                batch_size: config.enrichment.batch_size,
            });

            let result = Pipeline::run(&events, year, options).await;
            if result.summary.total_videos == 0 {
                warn!("No videos found for {}", year);
            }

            let report = WrappedReport::build(&result.summary, year, result.enrichment);
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", render_text(&report));
            }
        }
        Commands::Years { history } => {
            let events = load_watch_history(&history)
                .with_context(|| format!("reading {}", history.display()))?;
            for (year, count) in available_years(&events) {
                println!("{year}: {count} videos");
            }
        }
    }
    Ok(())
}
