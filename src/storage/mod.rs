//! Durable dedup store for crawl results.
//!
//! The store is the cross-run memory of the crawler: URLs whose text was
//! persisted are never fetched again by a later traversal, and sites that
//! could not be reached are recorded with the reason. Both sinks are
//! insert-or-ignore, so a duplicate write is a no-op rather than an error.

pub mod sqlite;

use async_trait::async_trait;

use crate::error::Result;

// Re-export for convenience
pub use sqlite::SqliteStore;

/// Trait for dedup store backends.
#[async_trait]
pub trait ScrapeStore: Send + Sync {
    /// True iff a scraped record for this exact URL exists.
    async fn is_scraped(&self, url: &str) -> Result<bool>;

    /// Persist scraped page text. Duplicate URLs are ignored.
    async fn save_scraped(&self, url: &str, text: &str) -> Result<()>;

    /// Record a site that could not be fetched. Duplicate URLs are ignored.
    async fn save_inaccessible(&self, url: &str, reason: &str) -> Result<()>;
}
