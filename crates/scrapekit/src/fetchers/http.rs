//! HTTP fetcher
//!
//! One GET per call, bounded by the configured timeout from connect to the
//! last body byte. No retries.

use crate::client::ScrapeOptions;
use crate::error::ScrapeError;
use crate::fetchers::{check_prefixes, Fetcher};
use crate::types::Document;
use crate::DEFAULT_USER_AGENT;
use async_trait::async_trait;
use bytes::Bytes;
use encoding_rs::{Encoding, UTF_8};
use futures::StreamExt;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_LENGTH, CONTENT_TYPE, USER_AGENT};
use tokio::time::Instant;
use tracing::{debug, warn};
use url::Url;

/// Binary content type prefixes
const BINARY_PREFIXES: &[&str] = &[
    "image/",
    "audio/",
    "video/",
    "application/octet-stream",
    "application/pdf",
    "application/zip",
    "application/gzip",
    "application/x-tar",
    "application/x-rar",
    "application/x-7z",
    "application/vnd.ms-",
    "application/vnd.openxmlformats",
    "font/",
];

const ACCEPT_HTML: &str = "text/html, application/xhtml+xml, text/plain;q=0.9, */*;q=0.8";

/// Fetches pages over HTTP(S) with reqwest
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher;

impl HttpFetcher {
    /// Create a new HTTP fetcher
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn fetch(&self, url: &Url, options: &ScrapeOptions) -> Result<Document, ScrapeError> {
        let deadline = Instant::now() + options.timeout;

        let mut headers = HeaderMap::new();
        let user_agent = options.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT);
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(user_agent)
                .unwrap_or_else(|_| HeaderValue::from_static(DEFAULT_USER_AGENT)),
        );
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(options.timeout)
            .timeout(options.timeout)
            .build()
            .map_err(ScrapeError::ClientBuildError)?;

        debug!(url = %url, timeout_ms = options.timeout.as_millis() as u64, "Fetching page");

        let response = client
            .get(url.clone())
            .send()
            .await
            .map_err(ScrapeError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::HttpStatus(status.as_u16()));
        }

        // Redirects may leave the allowed prefixes
        check_prefixes(response.url(), options)?;

        let final_url = response.url().to_string();
        let resp_headers = response.headers();

        let content_type = resp_headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        if let Some(ref ct) = content_type {
            if is_binary_content_type(ct) {
                return Err(ScrapeError::UnsupportedContent(ct.clone()));
            }
        }

        let content_length: Option<u64> = resp_headers
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse().ok());

        if content_length.is_some_and(|len| len > options.max_body_bytes as u64) {
            return Err(ScrapeError::BodyTooLarge(options.max_body_bytes));
        }

        let body = read_body(response, deadline, options.max_body_bytes).await?;
        let html = decode_body(&body, content_type.as_deref());
        debug!(url = %final_url, status = status.as_u16(), bytes = body.len(), "Page fetched");

        Ok(Document {
            url: final_url,
            status_code: status.as_u16(),
            content_type,
            html,
        })
    }
}

/// Check if content type indicates binary content
fn is_binary_content_type(content_type: &str) -> bool {
    let ct_lower = content_type.to_lowercase();
    BINARY_PREFIXES
        .iter()
        .any(|prefix| ct_lower.starts_with(prefix))
}

/// Charset label from a Content-Type header value
fn charset_label(content_type: &str) -> Option<&str> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        name.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches('"'))
    })
}

/// Decode `body` using the declared charset, falling back to UTF-8
fn decode_body(body: &[u8], content_type: Option<&str>) -> String {
    let encoding = content_type
        .and_then(charset_label)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .unwrap_or(UTF_8);
    let (text, used, had_errors) = encoding.decode(body);
    if had_errors {
        debug!(encoding = used.name(), "Body contained malformed sequences");
    }
    text.into_owned()
}

/// Read the whole body before `deadline`, refusing more than `max_bytes`
async fn read_body(
    response: reqwest::Response,
    deadline: Instant,
    max_bytes: usize,
) -> Result<Bytes, ScrapeError> {
    let mut body = Vec::new();
    let mut stream = response.bytes_stream();

    loop {
        match tokio::time::timeout_at(deadline, stream.next()).await {
            Ok(Some(Ok(chunk))) => {
                if body.len() + chunk.len() > max_bytes {
                    warn!(max_bytes, "Body exceeds size cap");
                    return Err(ScrapeError::BodyTooLarge(max_bytes));
                }
                body.extend_from_slice(&chunk);
            }
            Ok(Some(Err(e))) => return Err(ScrapeError::from_reqwest(e)),
            Ok(None) => return Ok(Bytes::from(body)),
            Err(_) => {
                warn!("Body timeout reached");
                return Err(ScrapeError::Timeout);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_binary_content_type() {
        assert!(is_binary_content_type("image/png"));
        assert!(is_binary_content_type("IMAGE/JPEG"));
        assert!(is_binary_content_type("application/pdf"));
        assert!(is_binary_content_type("application/octet-stream"));
        assert!(is_binary_content_type(
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        ));
        assert!(is_binary_content_type("font/woff2"));

        assert!(!is_binary_content_type("text/html; charset=utf-8"));
        assert!(!is_binary_content_type("text/plain"));
        assert!(!is_binary_content_type("application/xhtml+xml"));
        assert!(!is_binary_content_type("application/json"));
    }

    #[test]
    fn test_charset_label() {
        assert_eq!(charset_label("text/html; charset=windows-1251"), Some("windows-1251"));
        assert_eq!(charset_label("text/html;Charset=\"KOI8-R\""), Some("KOI8-R"));
        assert_eq!(charset_label("text/html"), None);
        assert_eq!(charset_label("text/html; boundary=x"), None);
    }

    #[test]
    fn test_decode_body_uses_declared_charset() {
        let (bytes, _, _) = encoding_rs::WINDOWS_1251.encode("Песня");
        assert_eq!(
            decode_body(&bytes, Some("text/html; charset=windows-1251")),
            "Песня"
        );
        assert_eq!(decode_body("Café".as_bytes(), Some("text/html")), "Café");
        assert_eq!(decode_body("Café".as_bytes(), None), "Café");
        assert_eq!(
            decode_body("Café".as_bytes(), Some("text/html; charset=no-such-thing")),
            "Café"
        );
    }

    #[test]
    fn test_http_fetcher_name() {
        assert_eq!(HttpFetcher::new().name(), "http");
    }
}
