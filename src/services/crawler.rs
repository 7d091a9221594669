// src/services/crawler.rs

//! Single-domain traversal.
//!
//! One [`DomainCrawler::crawl`] call runs one bounded breadth-first
//! traversal: resolve the seed's scheme, take the domain lock, then walk
//! same-domain links FIFO until the frontier drains or the page cap is hit.
//! Failures are per-URL; nothing inside a traversal aborts it.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use std::time::Instant;

use crate::error::{AppError, Result};
use crate::models::{CrawlerConfig, TraversalOutcome};
use crate::services::fetcher::{FetchFailure, PageFetcher};
use crate::services::locks::DomainLockRegistry;
use crate::storage::ScrapeStore;
use crate::utils::domain_of;

/// Bounds applied to every traversal.
#[derive(Debug, Clone, Copy)]
pub struct CrawlLimits {
    /// Maximum link-following depth; the seed is depth 0
    pub max_depth: usize,
    /// Maximum pages scraped per traversal
    pub max_pages: usize,
}

impl CrawlLimits {
    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self {
            max_depth: config.max_depth,
            max_pages: config.max_pages_per_domain,
        }
    }
}

/// Runs bounded BFS traversals, one domain at a time per invocation.
///
/// Cheap to clone; clones share the fetcher, the store, and the lock
/// registry, so one crawler can be handed to every worker of a run.
#[derive(Clone)]
pub struct DomainCrawler {
    fetcher: Arc<PageFetcher>,
    store: Arc<dyn ScrapeStore>,
    locks: Arc<DomainLockRegistry>,
    limits: CrawlLimits,
}

impl DomainCrawler {
    pub fn new(
        fetcher: Arc<PageFetcher>,
        store: Arc<dyn ScrapeStore>,
        locks: Arc<DomainLockRegistry>,
        limits: CrawlLimits,
    ) -> Self {
        Self {
            fetcher,
            store,
            locks,
            limits,
        }
    }

    /// Crawl one domain starting from `seed`, to completion.
    ///
    /// Traversals of the same domain are strictly serialized by the lock
    /// registry; the guard is dropped on every exit path, early returns
    /// included.
    pub async fn crawl(&self, seed: &str) -> Result<TraversalOutcome> {
        let started = Instant::now();

        let seed_url = self.fetcher.force_protocol(seed).await;
        let domain = domain_of(&seed_url)
            .ok_or_else(|| AppError::crawl(seed, "resolved URL has no host"))?;

        log::debug!("[{domain}] waiting for domain lock");
        let _guard = self.locks.acquire(&domain).await;
        log::debug!("[{domain}] domain lock acquired");

        let mut outcome = TraversalOutcome::new(seed, domain.as_str());

        if self.check_scraped(&seed_url).await {
            log::info!("[{domain}] already scraped, skipping: {seed_url}");
            outcome.skipped = true;
            outcome.elapsed = started.elapsed();
            return Ok(outcome);
        }

        let mut frontier: VecDeque<(String, usize)> = VecDeque::new();
        frontier.push_back((seed_url, 0));
        let mut visited: HashSet<String> = HashSet::new();

        while let Some((current, depth)) = frontier.pop_front() {
            if !visited.insert(current.clone()) {
                continue;
            }
            if outcome.pages_scraped >= self.limits.max_pages {
                log::info!(
                    "[{domain}] reached cap of {} pages",
                    self.limits.max_pages
                );
                break;
            }

            log::info!(
                "[{domain}] scraping ({}/{}): {current}",
                outcome.pages_scraped + 1,
                self.limits.max_pages
            );

            match self.fetcher.fetch_text(&current).await {
                Ok(text) => {
                    self.persist_scraped(&current, &text).await;
                    outcome.pages_scraped += 1;
                    if depth < self.limits.max_depth {
                        self.descend(
                            &domain,
                            &current,
                            depth,
                            &visited,
                            &mut frontier,
                            outcome.pages_scraped,
                        )
                        .await;
                    }
                }
                Err(failure) => {
                    log::warn!("[{domain}] failed to scrape {current}: {failure}");
                    outcome.pages_failed += 1;
                    self.persist_inaccessible(&current, &failure).await;
                }
            }
        }

        outcome.elapsed = started.elapsed();
        log::info!(
            "[{domain}] completed in {:.2}s ({} scraped, {} failed)",
            outcome.elapsed.as_secs_f64(),
            outcome.pages_scraped,
            outcome.pages_failed
        );
        Ok(outcome)
    }

    /// Re-fetch `current` for its anchors and queue eligible children.
    ///
    /// A child is eligible when it stays on the traversal's domain and is in
    /// neither the visited set nor the durable store. Children are queued in
    /// document order; once `frontier + scraped` reaches the cap no further
    /// children are taken from this page. A transport failure here records
    /// the page as inaccessible and abandons the descent -- the page text
    /// persisted from the first fetch stands. A non-200 answer abandons the
    /// descent without a record.
    async fn descend(
        &self,
        domain: &str,
        current: &str,
        depth: usize,
        visited: &HashSet<String>,
        frontier: &mut VecDeque<(String, usize)>,
        scraped: usize,
    ) {
        let links = match self.fetcher.fetch_links(current).await {
            Ok(links) => links,
            Err(failure @ FetchFailure::Transport(_)) => {
                log::warn!("[{domain}] link extraction failed for {current}: {failure}");
                self.persist_inaccessible(current, &failure).await;
                return;
            }
            Err(FetchFailure::Status(_)) => return,
        };

        for child in links {
            if domain_of(&child).as_deref() != Some(domain) {
                continue;
            }
            if visited.contains(&child) {
                continue;
            }
            if self.check_scraped(&child).await {
                continue;
            }
            frontier.push_back((child, depth + 1));
            if frontier.len() + scraped >= self.limits.max_pages {
                break;
            }
        }
    }

    /// Dedup check; a storage fault reads as "not scraped" so the traversal
    /// can continue.
    async fn check_scraped(&self, url: &str) -> bool {
        match self.store.is_scraped(url).await {
            Ok(seen) => seen,
            Err(error) => {
                log::error!("dedup check failed for {url}: {error}");
                false
            }
        }
    }

    async fn persist_scraped(&self, url: &str, text: &str) {
        if let Err(error) = self.store.save_scraped(url, text).await {
            log::error!("could not save scraped page {url}: {error}");
        }
    }

    async fn persist_inaccessible(&self, url: &str, failure: &FetchFailure) {
        if let Err(error) = self.store.save_inaccessible(url, &failure.reason()).await {
            log::error!("could not record inaccessible site {url}: {error}");
        }
    }
}
