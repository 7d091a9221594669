//! Service layer for the crawler application.
//!
//! This module contains the working parts of a crawl:
//! - Page fetching and protocol resolution (`PageFetcher`)
//! - Per-domain mutual exclusion (`DomainLockRegistry`)
//! - Single-domain BFS traversal (`DomainCrawler`)

mod crawler;
mod fetcher;
mod locks;

pub use crawler::{CrawlLimits, DomainCrawler};
pub use fetcher::{FetchFailure, PageFetcher};
pub use locks::DomainLockRegistry;
