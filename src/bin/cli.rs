//! Grazer Crawler CLI
//!
//! Reads seed URLs from one column of a CSV file and crawls each domain
//! breadth-first, persisting page text into a SQLite store.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use clap::{Parser, Subcommand};
use grazer::{
    error::Result,
    models::Config,
    pipeline,
    services::{CrawlLimits, DomainCrawler, DomainLockRegistry, PageFetcher},
    storage::SqliteStore,
    utils::seeds,
};

/// Grazer - Bounded Per-Domain Web Crawler
#[derive(Parser, Debug)]
#[command(name = "grazer", version, about = "Bounded per-domain web crawler")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "data/config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl every seed listed in a CSV file
    Crawl {
        /// CSV file holding the seed URLs
        seeds: PathBuf,

        /// CSV column holding the seeds (default from config)
        #[arg(long)]
        column: Option<String>,

        /// Maximum link-following depth
        #[arg(long)]
        depth: Option<usize>,

        /// Maximum pages scraped per domain
        #[arg(long)]
        max_pages: Option<usize>,

        /// Number of concurrent domain traversals
        #[arg(long)]
        workers: Option<usize>,
    },

    /// Validate the configuration file
    Validate,

    /// Show store record counts
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load_or_default(&cli.config);

    match cli.command {
        Command::Crawl {
            seeds: seed_file,
            column,
            depth,
            max_pages,
            workers,
        } => {
            if let Some(column) = column {
                config.seeds.column = column;
            }
            if let Some(depth) = depth {
                config.crawler.max_depth = depth;
            }
            if let Some(max_pages) = max_pages {
                config.crawler.max_pages_per_domain = max_pages;
            }
            if let Some(workers) = workers {
                config.crawler.max_workers = workers;
            }
            config.validate()?;

            // The one fatal error of a run: an unreadable seed list.
            let seed_list = seeds::read_seed_column(&seed_file, &config.seeds.column)?;
            if seed_list.is_empty() {
                log::warn!("No seeds found in {}", seed_file.display());
                return Ok(());
            }
            log::info!(
                "Loaded {} seeds from {}",
                seed_list.len(),
                seed_file.display()
            );

            let store = Arc::new(SqliteStore::new(&config.storage.db_path));
            store.init().await?;

            let fetcher = Arc::new(PageFetcher::new(&config.crawler)?);
            let locks = Arc::new(DomainLockRegistry::new());
            let crawler = DomainCrawler::new(
                fetcher,
                store,
                locks,
                CrawlLimits::from_config(&config.crawler),
            );

            let started = Instant::now();
            let summary =
                pipeline::run_crawler(crawler, seed_list, config.crawler.max_workers).await;

            log::info!(
                "Crawl finished in {:.2}s: {}/{} seeds completed, {} faulted, {} pages scraped",
                started.elapsed().as_secs_f64(),
                summary.completed,
                summary.total,
                summary.faulted,
                summary.pages_scraped
            );
        }

        Command::Validate => {
            config.validate()?;
            log::info!("Configuration OK");
        }

        Command::Info => {
            let store = SqliteStore::new(&config.storage.db_path);
            store.init().await?;
            log::info!("Store: {}", config.storage.db_path);
            log::info!("Scraped pages: {}", store.scraped_count().await?);
            log::info!("Inaccessible sites: {}", store.inaccessible_count().await?);
        }
    }

    Ok(())
}
