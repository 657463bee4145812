//! Scrape pipeline for ScrapeKit
//!
//! This module provides the main entry points: validate the URL, fetch the
//! page, extract the target and render it. Each call is independent and
//! keeps no state between requests.

use crate::error::ScrapeError;
use crate::extract::extract;
use crate::fetchers::{check_prefixes, validate_url, Fetcher, HttpFetcher};
use crate::render::{render_with_options, RenderOptions, DEFAULT_MAX_LENGTH, NOTHING_FOUND};
use crate::types::{Document, ScrapeRequest, ScrapeResponse};
use std::time::Duration;
use tracing::debug;

/// Default fetch timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default cap on response body size
pub const DEFAULT_MAX_BODY_BYTES: usize = 5 * 1024 * 1024;

/// Scrape options that can be configured via tool builder
#[derive(Debug, Clone)]
pub struct ScrapeOptions {
    /// Custom User-Agent
    pub user_agent: Option<String>,
    /// Bound on the whole fetch, connect through last body byte
    pub timeout: Duration,
    /// Largest body accepted, in bytes
    pub max_body_bytes: usize,
    /// Allow list of URL prefixes
    pub allow_prefixes: Vec<String>,
    /// Block list of URL prefixes
    pub block_prefixes: Vec<String>,
    /// Output length cap when the request sets none
    pub max_length: usize,
    /// Reply for pages where nothing matched
    pub empty_message: String,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            user_agent: None,
            timeout: DEFAULT_TIMEOUT,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            allow_prefixes: Vec::new(),
            block_prefixes: Vec::new(),
            max_length: DEFAULT_MAX_LENGTH,
            empty_message: NOTHING_FOUND.to_string(),
        }
    }
}

/// Fetch a single page with the default HTTP fetcher
///
/// Fails with [`ScrapeError::InvalidUrl`] before any network call if `url`
/// is not an absolute http(s) URL.
pub async fn fetch(url: &str, timeout: Duration) -> Result<Document, ScrapeError> {
    let options = ScrapeOptions {
        timeout,
        ..Default::default()
    };
    let url = validate_url(url)?;
    HttpFetcher::new().fetch(&url, &options).await
}

/// Scrape a page with default options
///
/// For custom options, use [`scrape_with_options`].
pub async fn scrape(req: ScrapeRequest) -> Result<ScrapeResponse, ScrapeError> {
    scrape_with_options(req, ScrapeOptions::default()).await
}

/// Scrape a page with custom options over HTTP
pub async fn scrape_with_options(
    req: ScrapeRequest,
    options: ScrapeOptions,
) -> Result<ScrapeResponse, ScrapeError> {
    scrape_with_fetcher(&HttpFetcher::new(), &req, &options).await
}

/// Scrape a page using any [`Fetcher`]
pub async fn scrape_with_fetcher(
    fetcher: &dyn Fetcher,
    req: &ScrapeRequest,
    options: &ScrapeOptions,
) -> Result<ScrapeResponse, ScrapeError> {
    let url = validate_url(&req.url)?;
    check_prefixes(&url, options)?;

    let target = req.target();
    debug!(fetcher = fetcher.name(), url = %url, ?target, "Scraping page");

    let doc = fetcher.fetch(&url, options).await?;
    let outcome = extract(&doc, &target)?;

    let render_options = RenderOptions::new(req.max_length.unwrap_or(options.max_length))
        .top_n(req.top_n)
        .empty_message(options.empty_message.clone());
    let rendered = render_with_options(&outcome, &render_options);

    if rendered.truncated {
        debug!(
            original_length = rendered.original_length,
            max_length = render_options.max_length,
            "Rendered text truncated"
        );
    }

    Ok(ScrapeResponse {
        url: doc.url,
        status_code: doc.status_code,
        content_type: doc.content_type,
        target,
        item_count: outcome.len(),
        text: rendered.text,
        truncated: rendered.truncated,
        original_length: rendered.original_length,
    })
}
