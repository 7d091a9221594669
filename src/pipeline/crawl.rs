// src/pipeline/crawl.rs

//! Crawl orchestration.
//!
//! Fans a seed list out across a fixed-size pool of workers, each running
//! one domain traversal to completion. Results are collected in completion
//! order; one seed's fault never cancels another seed. Seeds resolving to
//! the same domain serialize against each other through the lock registry,
//! not here.

use futures::stream::{self, StreamExt};

use crate::models::CrawlSummary;
use crate::services::DomainCrawler;

/// Crawl every seed, at most `workers` concurrently.
///
/// A seed whose traversal returns an error, or whose task panics, is logged
/// with the offending seed and counted as faulted; the rest of the run is
/// unaffected.
pub async fn run_crawler(
    crawler: DomainCrawler,
    seeds: Vec<String>,
    workers: usize,
) -> CrawlSummary {
    let total = seeds.len();
    let mut summary = CrawlSummary {
        total,
        ..CrawlSummary::default()
    };

    log::info!("Crawling {total} seeds with {workers} workers");

    let mut results = stream::iter(seeds)
        .map(|seed| {
            let crawler = crawler.clone();
            let task_seed = seed.clone();
            // Each traversal runs in its own task so a panic surfaces as a
            // JoinError here instead of taking down neighbouring seeds.
            let handle = tokio::spawn(async move { crawler.crawl(&task_seed).await });
            async move { (seed, handle.await) }
        })
        .buffer_unordered(workers.max(1));

    while let Some((seed, joined)) = results.next().await {
        match joined {
            Ok(Ok(outcome)) => {
                summary.completed += 1;
                summary.pages_scraped += outcome.pages_scraped;
                log::info!(
                    "Completed {}/{} seeds ({})",
                    summary.completed,
                    total,
                    outcome.domain
                );
            }
            Ok(Err(error)) => {
                summary.faulted += 1;
                log::error!("Seed {seed} failed: {error}");
            }
            Err(join_error) => {
                summary.faulted += 1;
                log::error!("Worker for seed {seed} panicked: {join_error}");
            }
        }
    }

    summary
}
