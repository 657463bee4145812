//! Tool builder and contract for ScrapeKit

use crate::client::{scrape_with_fetcher, ScrapeOptions};
use crate::error::ScrapeError;
use crate::fetchers::{Fetcher, HttpFetcher};
use crate::types::{ScrapeRequest, ScrapeResponse};
use crate::{TOOL_DESCRIPTION, TOOL_LLMTXT};
use schemars::schema_for;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Status update during tool execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolStatus {
    /// Current phase ("validate", "fetch", "complete" or "failed")
    pub phase: String,
    /// Optional message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Estimated completion percentage (0-100)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent_complete: Option<f32>,
}

impl ToolStatus {
    /// Create a new status with phase
    pub fn new(phase: impl Into<String>) -> Self {
        Self {
            phase: phase.into(),
            message: None,
            percent_complete: None,
        }
    }

    /// Set message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Set completion percentage
    pub fn with_percent(mut self, percent: f32) -> Self {
        self.percent_complete = Some(percent);
        self
    }
}

/// Builder for configuring the scrape tool
#[derive(Clone, Default)]
pub struct ToolBuilder {
    options: ScrapeOptions,
    fetcher: Option<Arc<dyn Fetcher>>,
}

impl ToolBuilder {
    /// Create a new tool builder with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Set custom User-Agent
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.options.user_agent = Some(ua.into());
        self
    }

    /// Set the fetch timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.options.timeout = timeout;
        self
    }

    /// Set the largest accepted body, in bytes
    pub fn max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.options.max_body_bytes = max_body_bytes;
        self
    }

    /// Set the default output length cap, in characters
    pub fn max_length(mut self, max_length: usize) -> Self {
        self.options.max_length = max_length;
        self
    }

    /// Set the reply used when nothing matched
    pub fn empty_message(mut self, message: impl Into<String>) -> Self {
        self.options.empty_message = message.into();
        self
    }

    /// Add URL prefix to allow list
    pub fn allow_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.options.allow_prefixes.push(prefix.into());
        self
    }

    /// Add URL prefix to block list
    pub fn block_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.options.block_prefixes.push(prefix.into());
        self
    }

    /// Use a custom fetcher instead of HTTP
    pub fn fetcher(mut self, fetcher: impl Fetcher + 'static) -> Self {
        self.fetcher = Some(Arc::new(fetcher));
        self
    }

    /// Build the tool
    pub fn build(self) -> Tool {
        Tool {
            options: self.options,
            fetcher: self.fetcher.unwrap_or_else(|| Arc::new(HttpFetcher::new())),
        }
    }
}

/// Configured scrape tool
///
/// Immutable once built and cheap to clone, so one instance can serve
/// concurrent requests.
#[derive(Clone)]
pub struct Tool {
    options: ScrapeOptions,
    fetcher: Arc<dyn Fetcher>,
}

impl std::fmt::Debug for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tool")
            .field("options", &self.options)
            .field("fetcher", &self.fetcher.name())
            .finish()
    }
}

impl Default for Tool {
    fn default() -> Self {
        ToolBuilder::new().build()
    }
}

impl Tool {
    /// Create a new tool builder
    pub fn builder() -> ToolBuilder {
        ToolBuilder::new()
    }

    /// Get tool description
    pub fn description(&self) -> &'static str {
        TOOL_DESCRIPTION
    }

    /// Get full documentation (llmtxt)
    pub fn llmtxt(&self) -> &'static str {
        TOOL_LLMTXT
    }

    /// Get the effective options
    pub fn options(&self) -> &ScrapeOptions {
        &self.options
    }

    /// Get input schema as JSON
    pub fn input_schema(&self) -> serde_json::Value {
        let schema = schema_for!(ScrapeRequest);
        serde_json::to_value(schema).unwrap_or_default()
    }

    /// Get output schema as JSON
    pub fn output_schema(&self) -> serde_json::Value {
        let schema = schema_for!(ScrapeResponse);
        serde_json::to_value(schema).unwrap_or_default()
    }

    /// Execute the tool with the given request
    pub async fn execute(&self, req: ScrapeRequest) -> Result<ScrapeResponse, ScrapeError> {
        scrape_with_fetcher(self.fetcher.as_ref(), &req, &self.options).await
    }

    /// Execute the tool with status updates
    pub async fn execute_with_status<F>(
        &self,
        req: ScrapeRequest,
        mut status_callback: F,
    ) -> Result<ScrapeResponse, ScrapeError>
    where
        F: FnMut(ToolStatus),
    {
        status_callback(ToolStatus::new("validate").with_percent(0.0));
        status_callback(
            ToolStatus::new("fetch")
                .with_message(req.url.clone())
                .with_percent(10.0),
        );

        let result = self.execute(req).await;

        match &result {
            Ok(resp) => status_callback(
                ToolStatus::new("complete")
                    .with_message(format!("{} items", resp.item_count))
                    .with_percent(100.0),
            ),
            Err(e) => status_callback(ToolStatus::new("failed").with_message(e.to_string())),
        }

        result
    }

    /// Execute and turn any outcome into a single reply text
    ///
    /// Errors become a short human-readable message; they are logged here
    /// and never reach the caller as values.
    pub async fn reply(&self, req: ScrapeRequest) -> String {
        match self.execute(req).await {
            Ok(resp) => resp.text,
            Err(e) => {
                warn!(error = %e, kind = ?e.kind(), "Scrape failed");
                e.user_message()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetchers::StaticFetcher;

    #[test]
    fn test_tool_builder() {
        let tool = Tool::builder()
            .user_agent("TestAgent/1.0")
            .timeout(Duration::from_secs(3))
            .max_length(500)
            .allow_prefix("https://allowed.com")
            .block_prefix("https://blocked.com")
            .build();

        let options = tool.options();
        assert_eq!(options.user_agent, Some("TestAgent/1.0".to_string()));
        assert_eq!(options.timeout, Duration::from_secs(3));
        assert_eq!(options.max_length, 500);
        assert_eq!(options.allow_prefixes, vec!["https://allowed.com"]);
        assert_eq!(options.block_prefixes, vec!["https://blocked.com"]);
    }

    #[test]
    fn test_tool_description() {
        let tool = Tool::default();
        assert!(!tool.description().is_empty());
        assert!(!tool.llmtxt().is_empty());
        assert!(format!("{:?}", tool).contains("http"));
    }

    #[test]
    fn test_tool_schemas() {
        let tool = Tool::default();
        let input_schema = tool.input_schema();
        let output_schema = tool.output_schema();

        assert!(input_schema["properties"]["url"].is_object());
        assert!(input_schema["properties"]["keyword"].is_object());
        assert!(output_schema["properties"]["text"].is_object());
        assert!(output_schema["properties"]["truncated"].is_object());
    }

    #[test]
    fn test_reply_for_invalid_url() {
        let tool = Tool::default();
        let reply = tokio_test::block_on(tool.reply(ScrapeRequest::new("not-a-url")));
        assert!(reply.starts_with("Please send a valid link."));
    }

    #[tokio::test]
    async fn test_reply_for_selector_error() {
        let tool = Tool::builder()
            .fetcher(StaticFetcher::new("<h3>x</h3>"))
            .build();
        let reply = tool
            .reply(ScrapeRequest::new("https://example.com").elements("h3[["))
            .await;
        assert_eq!(reply, "Could not read the page. Invalid selector: h3[[");
    }

    #[tokio::test]
    async fn test_reply_for_empty_is_not_error() {
        let tool = Tool::builder()
            .fetcher(StaticFetcher::new("<p>no tables</p>"))
            .build();
        let reply = tool.reply(ScrapeRequest::new("https://example.com")).await;
        assert_eq!(reply, "Nothing found.");
    }

    #[tokio::test]
    async fn test_reply_for_top_zero() {
        let tool = Tool::builder()
            .fetcher(StaticFetcher::new("<h3>Song One</h3><h3>Two</h3>"))
            .build();
        let reply = tool
            .reply(ScrapeRequest::new("https://example.com").elements("h3").top(0))
            .await;
        assert_eq!(reply, "Nothing found.");
    }

    #[tokio::test]
    async fn test_execute_with_status_phases() {
        let tool = Tool::builder()
            .fetcher(StaticFetcher::new(
                "<table><tr><th>k</th><th>v</th></tr><tr><td>a</td><td>1</td></tr></table>",
            ))
            .build();

        let mut phases = Vec::new();
        let resp = tool
            .execute_with_status(ScrapeRequest::new("https://example.com"), |s| {
                phases.push(s.phase)
            })
            .await
            .unwrap();

        assert_eq!(resp.text, "k | v\na | 1");
        assert_eq!(phases, vec!["validate", "fetch", "complete"]);
    }

    #[tokio::test]
    async fn test_execute_with_status_failure() {
        let tool = Tool::default();
        let mut phases = Vec::new();
        let result = tool
            .execute_with_status(ScrapeRequest::new("ftp://example.com"), |s| {
                phases.push(s.phase)
            })
            .await;

        assert!(matches!(result, Err(ScrapeError::InvalidUrl)));
        assert_eq!(phases.last().map(String::as_str), Some("failed"));
    }

    #[test]
    fn test_tool_status() {
        let status = ToolStatus::new("fetch")
            .with_message("Fetching URL")
            .with_percent(50.0);

        assert_eq!(status.phase, "fetch");
        assert_eq!(status.message, Some("Fetching URL".to_string()));
        assert_eq!(status.percent_complete, Some(50.0));
    }
}
