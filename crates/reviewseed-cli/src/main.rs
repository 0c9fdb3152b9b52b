//! reviewseed — sample Japanese Amazon reviews and seed a review store.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use reviewseed_cli::run_import;
use reviewseed_core::{Catalog, ImportConfig, StoreLocation, DEFAULT_PER_SENTIMENT, DEFAULT_SEED};
use reviewseed_ingest::preview_jsonl;

#[derive(Parser)]
#[command(name = "reviewseed", version, about = "Seed a review store from the amazon_reviews_multi_ja dataset")]
struct Cli {
    /// Debug-level logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download the dataset, sample reviews, and load them into the store
    Import {
        /// Directory holding the amazon_reviews_{split}.jsonl files
        #[arg(long, default_value = "data/amazon_reviews")]
        data_dir: PathBuf,

        /// Reviews per product and sentiment
        #[arg(long, default_value_t = DEFAULT_PER_SENTIMENT)]
        per_sentiment: usize,

        /// Download again even if the files exist
        #[arg(long)]
        force_download: bool,

        /// Use local files only
        #[arg(long)]
        skip_download: bool,

        /// Append reviews instead of replacing each product's reviews
        #[arg(long)]
        keep_existing: bool,

        /// Store URI (falls back to REVIEWSEED_STORE_URI)
        #[arg(long)]
        store_uri: Option<String>,

        /// Database name (falls back to REVIEWSEED_STORE_DB, then review-system)
        #[arg(long)]
        store_db: Option<String>,

        /// Random seed
        #[arg(long, default_value_t = DEFAULT_SEED)]
        seed: u64,
    },

    /// Print the first records of a JSONL file
    Preview {
        file: PathBuf,

        #[arg(short, long, default_value_t = 5)]
        limit: usize,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    if let Err(e) = run(cli.command).await {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Import {
            data_dir,
            per_sentiment,
            force_download,
            skip_download,
            keep_existing,
            store_uri,
            store_db,
            seed,
        } => {
            // Resolve the store first so a missing URI fails before any I/O.
            let store = StoreLocation::resolve(store_uri.as_deref(), store_db.as_deref())?;

            let mut config = ImportConfig::new(data_dir, store);
            config.per_sentiment = per_sentiment;
            config.force_download = force_download;
            config.skip_download = skip_download;
            config.keep_existing = keep_existing;
            config.seed = seed;

            let catalog = Catalog::default();
            let summary = run_import(&config, &catalog).await?;

            info!(
                "Import finished into {}/{}",
                config.store.uri, config.store.db_name
            );
            for line in summary.lines() {
                println!("{}", line);
            }
        }
        Commands::Preview { file, limit } => {
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            preview_jsonl(&file, limit, &mut out)?;
        }
    }
    Ok(())
}
