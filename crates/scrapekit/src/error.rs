//! Error types for ScrapeKit

use thiserror::Error;

/// Broad class of a [`ScrapeError`]
///
/// Every variant belongs to exactly one class. Callers that only need to
/// decide how to phrase a reply can match on this instead of the variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Rejected before any network call
    InvalidUrl,
    /// Network failure, timeout, bad status or unusable body
    Fetch,
    /// The page was fetched but could not be examined
    Extraction,
}

/// Errors that can occur while scraping a page
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// URL is missing
    #[error("Missing required parameter: url")]
    MissingUrl,

    /// URL is not an absolute http(s) URL
    #[error("Invalid URL: must be an absolute http:// or https:// address")]
    InvalidUrl,

    /// URL is blocked by prefix list
    #[error("Blocked URL: prefix not allowed")]
    BlockedUrl,

    /// Failed to build HTTP client
    #[error("Failed to create HTTP client")]
    ClientBuildError(#[source] reqwest::Error),

    /// The server did not answer in time
    #[error("Request timed out: the page did not respond in time")]
    Timeout,

    /// Failed to connect to server
    #[error("Failed to connect to server")]
    ConnectError(#[source] reqwest::Error),

    /// Server answered with a non-success status
    #[error("Server responded with HTTP status {0}")]
    HttpStatus(u16),

    /// Response is not textual
    #[error("Unsupported content type: {0}")]
    UnsupportedContent(String),

    /// Response body exceeded the configured cap
    #[error("Page is too large: more than {0} bytes")]
    BodyTooLarge(usize),

    /// Other request error
    #[error("Request failed")]
    RequestError(#[source] reqwest::Error),

    /// Selector could not be parsed
    #[error("Invalid selector: {0}")]
    InvalidSelector(String),
}

impl ScrapeError {
    /// Create an error from a reqwest error
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ScrapeError::Timeout
        } else if err.is_connect() {
            ScrapeError::ConnectError(err)
        } else if let Some(status) = err.status() {
            ScrapeError::HttpStatus(status.as_u16())
        } else {
            ScrapeError::RequestError(err)
        }
    }

    /// Class of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ScrapeError::MissingUrl | ScrapeError::InvalidUrl | ScrapeError::BlockedUrl => {
                ErrorKind::InvalidUrl
            }
            ScrapeError::ClientBuildError(_)
            | ScrapeError::Timeout
            | ScrapeError::ConnectError(_)
            | ScrapeError::HttpStatus(_)
            | ScrapeError::UnsupportedContent(_)
            | ScrapeError::BodyTooLarge(_)
            | ScrapeError::RequestError(_) => ErrorKind::Fetch,
            ScrapeError::InvalidSelector(_) => ErrorKind::Extraction,
        }
    }

    /// Single reply line for the person who sent the request
    pub fn user_message(&self) -> String {
        match self.kind() {
            ErrorKind::InvalidUrl => format!("Please send a valid link. {}", self),
            ErrorKind::Fetch => format!("Could not load the page. {}", self),
            ErrorKind::Extraction => format!("Could not read the page. {}", self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ScrapeError::MissingUrl.to_string(),
            "Missing required parameter: url"
        );
        assert_eq!(
            ScrapeError::InvalidUrl.to_string(),
            "Invalid URL: must be an absolute http:// or https:// address"
        );
        assert_eq!(
            ScrapeError::BlockedUrl.to_string(),
            "Blocked URL: prefix not allowed"
        );
        assert_eq!(
            ScrapeError::HttpStatus(404).to_string(),
            "Server responded with HTTP status 404"
        );
        assert_eq!(
            ScrapeError::BodyTooLarge(1024).to_string(),
            "Page is too large: more than 1024 bytes"
        );
        assert_eq!(
            ScrapeError::InvalidSelector("h3[".to_string()).to_string(),
            "Invalid selector: h3["
        );
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(ScrapeError::MissingUrl.kind(), ErrorKind::InvalidUrl);
        assert_eq!(ScrapeError::InvalidUrl.kind(), ErrorKind::InvalidUrl);
        assert_eq!(ScrapeError::BlockedUrl.kind(), ErrorKind::InvalidUrl);
        assert_eq!(ScrapeError::Timeout.kind(), ErrorKind::Fetch);
        assert_eq!(ScrapeError::HttpStatus(500).kind(), ErrorKind::Fetch);
        assert_eq!(
            ScrapeError::UnsupportedContent("image/png".to_string()).kind(),
            ErrorKind::Fetch
        );
        assert_eq!(
            ScrapeError::InvalidSelector(String::new()).kind(),
            ErrorKind::Extraction
        );
    }

    #[test]
    fn test_user_message_prefixes() {
        assert!(ScrapeError::InvalidUrl
            .user_message()
            .starts_with("Please send a valid link."));
        assert!(ScrapeError::Timeout
            .user_message()
            .starts_with("Could not load the page."));
        assert!(ScrapeError::InvalidSelector("::".to_string())
            .user_message()
            .starts_with("Could not read the page."));
    }
}
