//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// HTTP and crawling behavior settings
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// Durable store settings
    #[serde(default)]
    pub storage: StorageConfig,

    /// Seed list input settings
    #[serde(default)]
    pub seeds: SeedConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.crawler.user_agent.trim().is_empty() {
            return Err(AppError::config("crawler.user_agent is empty"));
        }
        if self.crawler.fetch_timeout_secs == 0 {
            return Err(AppError::config("crawler.fetch_timeout_secs must be > 0"));
        }
        if self.crawler.probe_timeout_secs == 0 {
            return Err(AppError::config("crawler.probe_timeout_secs must be > 0"));
        }
        if self.crawler.link_timeout_secs == 0 {
            return Err(AppError::config("crawler.link_timeout_secs must be > 0"));
        }
        if self.crawler.max_pages_per_domain == 0 {
            return Err(AppError::config("crawler.max_pages_per_domain must be > 0"));
        }
        if self.crawler.max_workers == 0 {
            return Err(AppError::config("crawler.max_workers must be > 0"));
        }
        if self.storage.db_path.trim().is_empty() {
            return Err(AppError::config("storage.db_path is empty"));
        }
        if self.seeds.column.trim().is_empty() {
            return Err(AppError::config("seeds.column is empty"));
        }
        Ok(())
    }
}

/// HTTP client and crawling behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Timeout for page content fetches, in seconds
    #[serde(default = "defaults::fetch_timeout")]
    pub fetch_timeout_secs: u64,

    /// Timeout for the protocol-resolution probe, in seconds
    #[serde(default = "defaults::probe_timeout")]
    pub probe_timeout_secs: u64,

    /// Timeout for the link-extraction fetch, in seconds
    #[serde(default = "defaults::link_timeout")]
    pub link_timeout_secs: u64,

    /// Maximum link-following depth from each seed
    #[serde(default = "defaults::max_depth")]
    pub max_depth: usize,

    /// Maximum number of pages scraped per domain traversal
    #[serde(default = "defaults::max_pages")]
    pub max_pages_per_domain: usize,

    /// Number of domain traversals run concurrently
    #[serde(default = "defaults::max_workers")]
    pub max_workers: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            fetch_timeout_secs: defaults::fetch_timeout(),
            probe_timeout_secs: defaults::probe_timeout(),
            link_timeout_secs: defaults::link_timeout(),
            max_depth: defaults::max_depth(),
            max_pages_per_domain: defaults::max_pages(),
            max_workers: defaults::max_workers(),
        }
    }
}

/// Durable store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path to the SQLite database file
    #[serde(default = "defaults::db_path")]
    pub db_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: defaults::db_path(),
        }
    }
}

/// Seed list input settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedConfig {
    /// CSV column holding the seed URLs
    #[serde(default = "defaults::seed_column")]
    pub column: String,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            column: defaults::seed_column(),
        }
    }
}

mod defaults {
    // Crawler defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
         AppleWebKit/537.36 (KHTML, like Gecko) \
         Chrome/90.0.4430.93 Safari/537.36"
            .into()
    }
    pub fn fetch_timeout() -> u64 {
        10
    }
    pub fn probe_timeout() -> u64 {
        5
    }
    pub fn link_timeout() -> u64 {
        5
    }
    pub fn max_depth() -> usize {
        1
    }
    pub fn max_pages() -> usize {
        20
    }
    pub fn max_workers() -> usize {
        5
    }

    // Storage defaults
    pub fn db_path() -> String {
        "data/scrape.db".into()
    }

    // Seed defaults
    pub fn seed_column() -> String {
        "Website".into()
    }
}
