//! ScrapeKit - fetch a page, pull out a table or headlines, reply in plain text
//!
//! The crate turns one URL into one bounded-length text reply:
//!
//! 1. A [`Fetcher`] downloads the page ([`HttpFetcher`] by default) with a
//!    strict timeout.
//! 2. [`extract`] runs an [`ExtractionTarget`] over the HTML: rows of the
//!    first table, or texts of elements matching a selector, optionally
//!    filtered by keyword.
//! 3. [`render`] joins the result into lines and cuts it to a maximum
//!    length, ending with [`TRUNCATION_MARKER`] when it had to cut.
//!
//! [`Tool`] bundles the three steps with configuration and converts every
//! failure into a single human-readable reply.
//!
//! ```no_run
//! # async fn demo() {
//! use scrapekit::{ScrapeRequest, Tool};
//!
//! let tool = Tool::default();
//! let reply = tool
//!     .reply(ScrapeRequest::new("https://example.com/chart").elements("h3").top(10))
//!     .await;
//! println!("{reply}");
//! # }
//! ```

pub mod client;
mod error;
mod extract;
pub mod fetchers;
mod render;
mod text;
mod tool;
mod types;

pub use client::{
    fetch, scrape, scrape_with_fetcher, scrape_with_options, ScrapeOptions,
    DEFAULT_MAX_BODY_BYTES, DEFAULT_TIMEOUT,
};
pub use error::{ErrorKind, ScrapeError};
pub use extract::extract;
pub use fetchers::{validate_url, Fetcher, HttpFetcher, StaticFetcher};
pub use render::{
    render, render_with_options, RenderOptions, COLUMN_SEPARATOR, DEFAULT_MAX_LENGTH,
    NOTHING_FOUND, TRUNCATION_MARKER,
};
pub use tool::{Tool, ToolBuilder, ToolStatus};
pub use types::{
    Document, ExtractionOutcome, ExtractionTarget, Mode, RenderedResult, Row, ScrapeRequest,
    ScrapeResponse, DEFAULT_SELECTOR,
};

/// Default User-Agent string
pub const DEFAULT_USER_AGENT: &str = "ScrapeKit/1.0";

/// Tool description for LLM consumption
pub const TOOL_DESCRIPTION: &str = r#"Fetches a web page and returns its first table or matching elements as plain text.

- Table mode: every non-empty row of the first table, cells joined with " | "
- Elements mode: text of every element matching a CSS selector (default h3)
- Optional case-insensitive keyword filter and top-N limit
- Output capped at 4000 characters by default"#;

/// Extended documentation for LLM consumption (llmtxt)
pub const TOOL_LLMTXT: &str = r#"# ScrapeKit Tool

Fetches a single web page and extracts either the first HTML table or the text
of elements matching a selector, returned as bounded plain text.

## Capabilities
- First-table extraction (header and data cells, empty rows dropped)
- Element extraction by CSS selector, in document order
- Case-insensitive keyword filter
- Top-N limit with numbered lines
- Length cap with a "...[truncated]" marker

## Input Parameters
- `url` (required): The page to fetch (must be http:// or https://)
- `mode` (optional): "table" or "elements" (default: elements when a selector
  or keyword is given, table otherwise)
- `selector` (optional): CSS selector for elements mode (default: h3)
- `keyword` (optional): Keep only elements containing this text
- `top_n` (optional): Keep only the first N elements
- `max_length` (optional): Maximum reply length in characters (default: 4000)

## Output Fields
- `url`: Final URL after redirects
- `status_code`: HTTP status code
- `content_type`: Content-Type header value
- `target`: What was extracted
- `item_count`: Rows or elements found
- `text`: The rendered reply
- `truncated`: True if the reply was cut to the length cap
- `original_length`: Reply length before cutting

## Examples

### First table of a page
```json
{"url": "https://example.com/standings"}
```

### Top 10 headlines
```json
{"url": "https://example.com/news", "selector": "h3", "top_n": 10}
```

### Headlines mentioning a keyword
```json
{"url": "https://example.com/chart", "keyword": "song"}
```

## Error Handling
- Invalid URLs are rejected before any request
- Timeouts, connection failures and non-2xx statuses return an error
- Pages with nothing matching return "Nothing found." (not an error)
"#;
