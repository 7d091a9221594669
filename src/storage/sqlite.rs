//! SQLite-backed dedup store.
//!
//! A connection is opened per operation against a single database file
//! holding the scraped-content and inaccessible-site tables. Operations run
//! on the blocking thread pool so traversal workers never stall on disk I/O.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{Connection, params};

use crate::error::{AppError, Result};
use crate::storage::ScrapeStore;

const SCHEMA: &str = r#"
    -- Successfully scraped pages
    CREATE TABLE IF NOT EXISTS web_content (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        url TEXT NOT NULL UNIQUE,
        text_content TEXT NOT NULL,
        created_at TEXT NOT NULL
    );

    -- Sites that could not be fetched, with the failure reason
    CREATE TABLE IF NOT EXISTS inaccessible_sites (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        url TEXT NOT NULL UNIQUE,
        reason TEXT NOT NULL,
        created_at TEXT NOT NULL
    );
"#;

/// SQLite store rooted at a single database file.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    db_path: PathBuf,
}

impl SqliteStore {
    /// Create a store handle for the given database file.
    ///
    /// No I/O happens until [`SqliteStore::init`] is called.
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    /// Create the parent directory and both tables if missing.
    pub async fn init(&self) -> Result<()> {
        if let Some(parent) = self.db_path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        self.with_conn(|conn| conn.execute_batch(SCHEMA)).await
    }

    /// Number of scraped records.
    pub async fn scraped_count(&self) -> Result<i64> {
        self.with_conn(|conn| {
            conn.query_row("SELECT COUNT(*) FROM web_content", [], |row| row.get(0))
        })
        .await
    }

    /// Number of inaccessible-site records.
    pub async fn inaccessible_count(&self) -> Result<i64> {
        self.with_conn(|conn| {
            conn.query_row("SELECT COUNT(*) FROM inaccessible_sites", [], |row| {
                row.get(0)
            })
        })
        .await
    }

    /// Run one operation against a fresh connection on the blocking pool.
    async fn with_conn<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> rusqlite::Result<T> + Send + 'static,
    {
        let path = self.db_path.clone();
        tokio::task::spawn_blocking(move || -> Result<T> {
            let conn = Connection::open(&path)?;
            Ok(op(&conn)?)
        })
        .await
        .map_err(|e| AppError::storage(format!("storage task failed: {e}")))?
    }
}

#[async_trait]
impl ScrapeStore for SqliteStore {
    async fn is_scraped(&self, url: &str) -> Result<bool> {
        let url = url.to_string();
        self.with_conn(move |conn| {
            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM web_content WHERE url = ?1",
                params![url],
                |row| row.get(0),
            )?;
            Ok(count > 0)
        })
        .await
    }

    async fn save_scraped(&self, url: &str, text: &str) -> Result<()> {
        let url = url.to_string();
        let text = text.to_string();
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT OR IGNORE INTO web_content (url, text_content, created_at)
                 VALUES (?1, ?2, ?3)",
                params![url, text, Utc::now().to_rfc3339()],
            )?;
            Ok(())
        })
        .await
    }

    async fn save_inaccessible(&self, url: &str, reason: &str) -> Result<()> {
        let url = url.to_string();
        let reason = reason.to_string();
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT OR IGNORE INTO inaccessible_sites (url, reason, created_at)
                 VALUES (?1, ?2, ?3)",
                params![url, reason, Utc::now().to_rfc3339()],
            )?;
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn temp_store(tmp: &TempDir) -> SqliteStore {
        let store = SqliteStore::new(tmp.path().join("scrape.db"));
        store.init().await.unwrap();
        store
    }

    #[tokio::test]
    async fn save_and_check_scraped() {
        let tmp = TempDir::new().unwrap();
        let store = temp_store(&tmp).await;

        assert!(!store.is_scraped("http://a.test/").await.unwrap());
        store
            .save_scraped("http://a.test/", "hello world")
            .await
            .unwrap();
        assert!(store.is_scraped("http://a.test/").await.unwrap());
        assert_eq!(store.scraped_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn duplicate_save_is_a_noop() {
        let tmp = TempDir::new().unwrap();
        let store = temp_store(&tmp).await;

        store.save_scraped("http://a.test/", "first").await.unwrap();
        store
            .save_scraped("http://a.test/", "second")
            .await
            .unwrap();
        assert_eq!(store.scraped_count().await.unwrap(), 1);

        // The first write wins
        let conn = Connection::open(tmp.path().join("scrape.db")).unwrap();
        let text: String = conn
            .query_row(
                "SELECT text_content FROM web_content WHERE url = ?1",
                params!["http://a.test/"],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(text, "first");
    }

    #[tokio::test]
    async fn inaccessible_records_are_a_separate_namespace() {
        let tmp = TempDir::new().unwrap();
        let store = temp_store(&tmp).await;

        store
            .save_inaccessible("http://b.test/", "status code 404")
            .await
            .unwrap();
        store
            .save_inaccessible("http://b.test/", "timed out")
            .await
            .unwrap();

        assert_eq!(store.inaccessible_count().await.unwrap(), 1);
        assert_eq!(store.scraped_count().await.unwrap(), 0);
        // An inaccessible record does not mark the URL as scraped
        assert!(!store.is_scraped("http://b.test/").await.unwrap());
    }

    #[tokio::test]
    async fn init_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let store = temp_store(&tmp).await;
        store.save_scraped("http://a.test/", "text").await.unwrap();

        store.init().await.unwrap();
        assert_eq!(store.scraped_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn init_creates_missing_parent_dirs() {
        let tmp = TempDir::new().unwrap();
        let store = SqliteStore::new(tmp.path().join("nested/dir/scrape.db"));
        store.init().await.unwrap();
        assert_eq!(store.scraped_count().await.unwrap(), 0);
    }
}
