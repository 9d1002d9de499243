//! Rates CLI
//!
//! The externally scheduled entry point for rate ingestion, plus store
//! maintenance and a feed health probe. A cron entry drives `rates ingest`
//! on a fixed cadence; the process exit status reflects the run outcome.

use anyhow::Result;
use clap::{Parser, Subcommand};

use rates_feed::{BinanceFeed, DEFAULT_BASE_URL};
use rates_hex::{IngestOptions, IngestRunner, RateService};
use rates_repo::build_repo;
use rates_types::{CurrencyPair, RateFeed};

#[derive(Parser)]
#[command(name = "rates")]
#[command(author, version, about = "EUR crypto rates ingestion and maintenance", long_about = None)]
struct Cli {
    /// Database connection URL
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    /// Base URL of the upstream price feed
    #[arg(long, env = "BINANCE_API_URL", default_value = DEFAULT_BASE_URL)]
    feed_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch current rates and persist one sample per pair
    Ingest {
        /// Restrict the run to a single pair, e.g. EUR/BTC
        #[arg(long)]
        pair: Option<String>,
        /// Compute rates without persisting them
        #[arg(long)]
        dry_run: bool,
    },
    /// Delete samples older than the retention window
    Cleanup {
        /// Days of history to keep
        #[arg(long, default_value_t = 90)]
        days_to_keep: u32,
    },
    /// Probe upstream feed availability
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Ingest { pair, dry_run } => {
            let pair: Option<CurrencyPair> = pair.map(|raw| raw.parse()).transpose()?;

            let repo = build_repo(&cli.database_url).await?;
            let feed = BinanceFeed::new(&cli.feed_url)?;
            let runner = IngestRunner::new(repo, feed);

            match runner.run(&IngestOptions { pair, dry_run }).await {
                Ok(report) => {
                    println!("{}", report.summary());
                    if !report.is_success() {
                        std::process::exit(1);
                    }
                }
                Err(err) => {
                    eprintln!("ingestion run failed: {}", err);
                    std::process::exit(1);
                }
            }
        }
        Commands::Cleanup { days_to_keep } => {
            let repo = build_repo(&cli.database_url).await?;
            let service = RateService::new(repo);

            let deleted = service.cleanup(days_to_keep).await?;
            println!(
                "deleted {} samples older than {} days",
                deleted, days_to_keep
            );
        }
        Commands::Health => {
            let feed = BinanceFeed::new(&cli.feed_url)?;

            if feed.is_available().await {
                println!("upstream feed is reachable");
            } else {
                eprintln!("upstream feed is unreachable");
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
