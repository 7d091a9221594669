// src/services/fetcher.rs

//! Page fetching and protocol resolution.
//!
//! One [`PageFetcher`] is shared by all traversals. It issues plain GETs
//! with a fixed user agent: a long-timeout fetch for page text, a
//! short-timeout fetch for outbound anchors, and a best-effort probe that
//! decides between `http://` and `https://` for schemeless seeds.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use scraper::{Html, Selector};
use thiserror::Error;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::CrawlerConfig;

/// A single failed fetch attempt. Never retried; the rendered reason string
/// is what gets persisted for the URL.
#[derive(Debug, Clone, Error)]
pub enum FetchFailure {
    /// The server answered with a non-200 status
    #[error("status code {0}")]
    Status(u16),

    /// Timeout, connection, DNS, or TLS failure
    #[error("{0}")]
    Transport(String),
}

impl FetchFailure {
    /// Reason string persisted alongside the URL.
    pub fn reason(&self) -> String {
        self.to_string()
    }

    fn transport(error: reqwest::Error) -> Self {
        Self::Transport(error.to_string())
    }
}

/// HTTP fetcher shared across domain traversals.
pub struct PageFetcher {
    client: Client,
    anchors: Selector,
    probe_timeout: Duration,
    link_timeout: Duration,
}

impl PageFetcher {
    /// Create a fetcher with the configured user agent and timeouts.
    pub fn new(config: &CrawlerConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.fetch_timeout_secs))
            .build()?;
        let anchors =
            Selector::parse("a[href]").map_err(|e| AppError::selector("a[href]", format!("{e:?}")))?;
        Ok(Self {
            client,
            anchors,
            probe_timeout: Duration::from_secs(config.probe_timeout_secs),
            link_timeout: Duration::from_secs(config.link_timeout_secs),
        })
    }

    /// Ensure a raw seed string carries an explicit scheme.
    ///
    /// A schemeless input gets `http://` prepended, then one probe GET is
    /// issued. Anything other than a 200 answer (including transport
    /// failures, which are swallowed) rewrites the scheme to `https://` --
    /// without verifying that the secure variant actually works. An input
    /// already using `https://` comes back unchanged.
    pub async fn force_protocol(&self, raw: &str) -> String {
        let mut url = raw.trim().to_string();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            url = format!("http://{url}");
        }

        let probe = self
            .client
            .get(&url)
            .timeout(self.probe_timeout)
            .send()
            .await;
        match probe {
            Ok(response) if response.status() == StatusCode::OK => url,
            _ => to_https(&url),
        }
    }

    /// Fetch a page and extract its visible text.
    pub async fn fetch_text(&self, url: &str) -> std::result::Result<String, FetchFailure> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(FetchFailure::transport)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchFailure::Status(status.as_u16()));
        }

        let html = response.text().await.map_err(FetchFailure::transport)?;
        Ok(extract_text(&html))
    }

    /// Fetch a page again and extract all anchor targets as absolute URLs.
    ///
    /// Resolution happens against the page's own URL, so relative hrefs stay
    /// on the page's host. Empty and whitespace-only hrefs are skipped.
    pub async fn fetch_links(&self, url: &str) -> std::result::Result<Vec<String>, FetchFailure> {
        let response = self
            .client
            .get(url)
            .timeout(self.link_timeout)
            .send()
            .await
            .map_err(FetchFailure::transport)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchFailure::Status(status.as_u16()));
        }

        let html = response.text().await.map_err(FetchFailure::transport)?;
        let base = Url::parse(url).map_err(|e| FetchFailure::Transport(e.to_string()))?;
        Ok(self.extract_links(&html, &base))
    }

    fn extract_links(&self, html: &str, base: &Url) -> Vec<String> {
        let document = Html::parse_document(html);
        let mut links = Vec::new();
        for element in document.select(&self.anchors) {
            let href = element.value().attr("href").unwrap_or_default().trim();
            if href.is_empty() {
                continue;
            }
            if let Ok(resolved) = base.join(href) {
                links.push(resolved.to_string());
            }
        }
        links
    }
}

/// Rewrite the scheme of an `http://` URL to `https://`.
///
/// Anchored at the start of the string; a no-op for anything else.
fn to_https(url: &str) -> String {
    match url.strip_prefix("http://") {
        Some(rest) => format!("https://{rest}"),
        None => url.to_string(),
    }
}

/// Extract visible text from an HTML document, whitespace-normalized:
/// every run of whitespace collapses to a single space.
fn extract_text(html: &str) -> String {
    let document = Html::parse_document(html);
    document
        .root_element()
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
