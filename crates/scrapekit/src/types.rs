//! Core types for ScrapeKit

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Selector used for element extraction when the request names none
pub const DEFAULT_SELECTOR: &str = "h3";

/// A fetched page, alive for a single request
#[derive(Debug, Clone, Default)]
pub struct Document {
    /// Final URL after redirects
    pub url: String,
    /// HTTP status code
    pub status_code: u16,
    /// Content-Type header value
    pub content_type: Option<String>,
    /// Body decoded as text
    pub html: String,
}

impl Document {
    /// Create a document from raw HTML, without fetch metadata
    pub fn new(url: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status_code: 200,
            content_type: None,
            html: html.into(),
        }
    }
}

/// What to pull out of a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExtractionTarget {
    /// Every row of the first table in document order
    FirstTable,
    /// Text of every element matching a CSS selector, optionally filtered
    Elements {
        /// CSS selector, usually a bare tag name such as `h3`
        selector: String,
        /// Keep only values containing this keyword (case-insensitive)
        #[serde(default, skip_serializing_if = "Option::is_none")]
        keyword: Option<String>,
    },
}

impl ExtractionTarget {
    /// Target the first table
    pub fn first_table() -> Self {
        ExtractionTarget::FirstTable
    }

    /// Target all elements matching `selector`
    pub fn elements(selector: impl Into<String>) -> Self {
        ExtractionTarget::Elements {
            selector: selector.into(),
            keyword: None,
        }
    }

    /// Target elements matching `selector` whose text contains `keyword`
    pub fn filtered(selector: impl Into<String>, keyword: impl Into<String>) -> Self {
        ExtractionTarget::Elements {
            selector: selector.into(),
            keyword: Some(keyword.into()),
        }
    }
}

/// One table row: cell texts in column order
pub type Row = Vec<String>;

/// Result of running an [`ExtractionTarget`] over a [`Document`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionOutcome {
    /// Rows of the first table, none of them entirely empty
    Table(Vec<Row>),
    /// Non-empty element texts in document order
    TextList(Vec<String>),
    /// Nothing matched; a valid answer, not an error
    Empty,
}

impl ExtractionOutcome {
    /// Number of rows or values
    pub fn len(&self) -> usize {
        match self {
            ExtractionOutcome::Table(rows) => rows.len(),
            ExtractionOutcome::TextList(values) => values.len(),
            ExtractionOutcome::Empty => 0,
        }
    }

    /// True for [`ExtractionOutcome::Empty`]
    pub fn is_empty(&self) -> bool {
        matches!(self, ExtractionOutcome::Empty)
    }
}

/// Text ready to hand to the messaging layer
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct RenderedResult {
    /// Final text, never longer than the requested maximum
    pub text: String,
    /// True if the composed text was cut
    pub truncated: bool,
    /// Length of the composed text before truncation, in characters
    pub original_length: usize,
}

/// Extraction mode selectable by callers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// First table on the page
    #[default]
    Table,
    /// Elements matching a selector
    Elements,
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(Mode::Table),
            "elements" => Ok(Mode::Elements),
            _ => Err("Invalid mode: must be table or elements".to_string()),
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Table => write!(f, "table"),
            Mode::Elements => write!(f, "elements"),
        }
    }
}

/// Request to scrape a page
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ScrapeRequest {
    /// The URL to fetch (required, must be http:// or https://)
    pub url: String,

    /// Extraction mode (optional; elements when a selector or keyword is set, table otherwise)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<Mode>,

    /// CSS selector for elements mode (optional, default "h3")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,

    /// Keep only elements containing this keyword, case-insensitive (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,

    /// Return only the first N elements, numbered (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_n: Option<usize>,

    /// Maximum length of the returned text in characters (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
}

impl ScrapeRequest {
    /// Create a new request with the given URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Extract the first table
    pub fn table(mut self) -> Self {
        self.mode = Some(Mode::Table);
        self
    }

    /// Extract elements matching `selector`
    pub fn elements(mut self, selector: impl Into<String>) -> Self {
        self.mode = Some(Mode::Elements);
        self.selector = Some(selector.into());
        self
    }

    /// Filter elements by keyword
    pub fn keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    /// Keep only the first `n` elements
    pub fn top(mut self, n: usize) -> Self {
        self.top_n = Some(n);
        self
    }

    /// Cap the output length
    pub fn max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    /// Get the effective mode
    pub fn effective_mode(&self) -> Mode {
        match self.mode {
            Some(mode) => mode,
            None if self.selector.is_some() || self.keyword.is_some() => Mode::Elements,
            None => Mode::Table,
        }
    }

    /// Resolve the request into an extraction target
    pub fn target(&self) -> ExtractionTarget {
        match self.effective_mode() {
            Mode::Table => ExtractionTarget::first_table(),
            Mode::Elements => {
                let selector = self
                    .selector
                    .as_deref()
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .unwrap_or(DEFAULT_SELECTOR);
                let keyword = self
                    .keyword
                    .as_deref()
                    .map(str::trim)
                    .filter(|k| !k.is_empty());
                match keyword {
                    Some(keyword) => ExtractionTarget::filtered(selector, keyword),
                    None => ExtractionTarget::elements(selector),
                }
            }
        }
    }
}

/// Response from a scrape operation
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ScrapeResponse {
    /// Final URL after redirects
    pub url: String,

    /// HTTP status code
    pub status_code: u16,

    /// Content-Type header value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,

    /// What was extracted
    pub target: ExtractionTarget,

    /// Rows or elements found, before any top-N cut
    pub item_count: usize,

    /// Rendered text
    pub text: String,

    /// True if the text was cut to the length limit
    pub truncated: bool,

    /// Length of the text before truncation, in characters
    pub original_length: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_from_str() {
        assert_eq!(Mode::from_str("table").unwrap(), Mode::Table);
        assert_eq!(Mode::from_str("TABLE").unwrap(), Mode::Table);
        assert_eq!(Mode::from_str("Elements").unwrap(), Mode::Elements);
        assert!(Mode::from_str("list").is_err());
    }

    #[test]
    fn test_mode_display() {
        assert_eq!(Mode::Table.to_string(), "table");
        assert_eq!(Mode::Elements.to_string(), "elements");
    }

    #[test]
    fn test_request_defaults_to_table() {
        let req = ScrapeRequest::new("https://example.com");
        assert_eq!(req.effective_mode(), Mode::Table);
        assert_eq!(req.target(), ExtractionTarget::first_table());
    }

    #[test]
    fn test_request_keyword_implies_elements() {
        let req = ScrapeRequest::new("https://example.com").keyword("  song ");
        assert_eq!(req.effective_mode(), Mode::Elements);
        assert_eq!(req.target(), ExtractionTarget::filtered("h3", "song"));
    }

    #[test]
    fn test_request_builder() {
        let req = ScrapeRequest::new("https://example.com")
            .elements("h2.title")
            .top(5)
            .max_length(100);

        assert_eq!(req.url, "https://example.com");
        assert_eq!(req.mode, Some(Mode::Elements));
        assert_eq!(req.top_n, Some(5));
        assert_eq!(req.max_length, Some(100));
        assert_eq!(req.target(), ExtractionTarget::elements("h2.title"));
    }

    #[test]
    fn test_blank_selector_and_keyword_fall_back() {
        let req = ScrapeRequest::new("https://example.com")
            .elements("  ")
            .keyword("");
        assert_eq!(req.target(), ExtractionTarget::elements(DEFAULT_SELECTOR));
    }

    #[test]
    fn test_explicit_table_ignores_selector() {
        let mut req = ScrapeRequest::new("https://example.com").elements("li");
        req.mode = Some(Mode::Table);
        assert_eq!(req.target(), ExtractionTarget::FirstTable);
    }

    #[test]
    fn test_request_serialization() {
        let req = ScrapeRequest::new("https://example.com").elements("h3");
        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains("\"url\":\"https://example.com\""));
        assert!(json.contains("\"mode\":\"elements\""));
        assert!(!json.contains("keyword"));
    }

    #[test]
    fn test_target_serialization() {
        let json = serde_json::to_value(ExtractionTarget::filtered("h3", "song")).unwrap();
        assert_eq!(json["kind"], "elements");
        assert_eq!(json["selector"], "h3");
        assert_eq!(json["keyword"], "song");

        let json = serde_json::to_value(ExtractionTarget::FirstTable).unwrap();
        assert_eq!(json["kind"], "first_table");
    }

    #[test]
    fn test_outcome_len() {
        let table = ExtractionOutcome::Table(vec![vec!["a".to_string()]]);
        assert_eq!(table.len(), 1);
        assert!(!table.is_empty());
        assert_eq!(ExtractionOutcome::Empty.len(), 0);
        assert!(ExtractionOutcome::Empty.is_empty());
    }
}
