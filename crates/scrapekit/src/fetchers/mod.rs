//! Page fetchers
//!
//! Design: a [`Fetcher`] turns a validated URL into a [`Document`]. The
//! extraction pipeline only sees this trait, so hosts can swap the HTTP
//! implementation for a cache, a headless browser or a fixture.

mod http;

pub use http::HttpFetcher;

use crate::client::ScrapeOptions;
use crate::error::ScrapeError;
use crate::types::Document;
use async_trait::async_trait;
use url::Url;

/// Source of page content
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Identifier for logging
    fn name(&self) -> &'static str;

    /// Fetch the page at `url`
    ///
    /// Called only with URLs that passed [`validate_url`]. Performs at most
    /// one request and must honor `options.timeout`.
    async fn fetch(&self, url: &Url, options: &ScrapeOptions) -> Result<Document, ScrapeError>;
}

/// Fetcher that serves the same HTML for every URL
///
/// Useful when the page is already at hand, e.g. uploaded by the user.
#[derive(Debug, Clone)]
pub struct StaticFetcher {
    html: String,
}

impl StaticFetcher {
    /// Serve `html` for every request
    pub fn new(html: impl Into<String>) -> Self {
        Self { html: html.into() }
    }
}

#[async_trait]
impl Fetcher for StaticFetcher {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn fetch(&self, url: &Url, _options: &ScrapeOptions) -> Result<Document, ScrapeError> {
        Ok(Document::new(url.as_str(), self.html.clone()))
    }
}

/// Check that `raw` is an absolute http(s) URL
///
/// Runs before any network activity.
pub fn validate_url(raw: &str) -> Result<Url, ScrapeError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ScrapeError::MissingUrl);
    }

    let url = Url::parse(raw).map_err(|_| ScrapeError::InvalidUrl)?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(ScrapeError::InvalidUrl);
    }
    Ok(url)
}

/// Apply allow/block prefix lists
pub(crate) fn check_prefixes(url: &Url, options: &ScrapeOptions) -> Result<(), ScrapeError> {
    let url = url.as_str();

    if !options.allow_prefixes.is_empty()
        && !options
            .allow_prefixes
            .iter()
            .any(|prefix| url.starts_with(prefix))
    {
        return Err(ScrapeError::BlockedUrl);
    }

    if options
        .block_prefixes
        .iter()
        .any(|prefix| url.starts_with(prefix))
    {
        return Err(ScrapeError::BlockedUrl);
    }

    Ok(())
}
