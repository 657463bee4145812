//! Bounded plain-text rendering of extraction results

use crate::text::{char_len, take_chars};
use crate::types::{ExtractionOutcome, RenderedResult};

/// Default maximum length of a rendered result, in characters
pub const DEFAULT_MAX_LENGTH: usize = 4000;

/// Marker that replaces the cut tail of a truncated result
pub const TRUNCATION_MARKER: &str = "...[truncated]";

/// Column separator for table rows
pub const COLUMN_SEPARATOR: &str = " | ";

/// Reply used when nothing matched
pub const NOTHING_FOUND: &str = "Nothing found.";

/// Rendering parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Hard cap on output length, in characters
    pub max_length: usize,
    /// Keep only the first N values of a text list
    pub top_n: Option<usize>,
    /// Prefix text-list lines with `1. `, `2. `, ...
    ///
    /// `None` numbers lines exactly when `top_n` is set.
    pub numbered: Option<bool>,
    /// Separator placed between table cells
    pub separator: String,
    /// Appended when the output was cut
    pub marker: String,
    /// Text for an empty outcome
    pub empty_message: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LENGTH)
    }
}

impl RenderOptions {
    /// Options with the given length cap and default markup
    pub fn new(max_length: usize) -> Self {
        Self {
            max_length,
            top_n: None,
            numbered: None,
            separator: COLUMN_SEPARATOR.to_string(),
            marker: TRUNCATION_MARKER.to_string(),
            empty_message: NOTHING_FOUND.to_string(),
        }
    }

    /// Keep only the first `top_n` values
    pub fn top_n(mut self, top_n: Option<usize>) -> Self {
        self.top_n = top_n;
        self
    }

    /// Force numbering on or off
    pub fn numbered(mut self, numbered: bool) -> Self {
        self.numbered = Some(numbered);
        self
    }

    /// Set the column separator
    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Set the truncation marker
    pub fn marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = marker.into();
        self
    }

    /// Set the "nothing found" text
    pub fn empty_message(mut self, message: impl Into<String>) -> Self {
        self.empty_message = message.into();
        self
    }

    fn wants_numbers(&self) -> bool {
        self.numbered.unwrap_or(self.top_n.is_some())
    }
}

/// Render `outcome` with the default markup
pub fn render(
    outcome: &ExtractionOutcome,
    max_length: usize,
    top_n: Option<usize>,
) -> RenderedResult {
    render_with_options(outcome, &RenderOptions::new(max_length).top_n(top_n))
}

/// Render `outcome` with custom options
pub fn render_with_options(outcome: &ExtractionOutcome, options: &RenderOptions) -> RenderedResult {
    let composed = compose(outcome, options);
    bound(composed, options.max_length, &options.marker)
}

/// Build the full text before any length limit applies
fn compose(outcome: &ExtractionOutcome, options: &RenderOptions) -> String {
    match outcome {
        ExtractionOutcome::Table(rows) => rows
            .iter()
            .map(|row| row.join(&options.separator))
            .collect::<Vec<_>>()
            .join("\n"),
        ExtractionOutcome::TextList(values) => {
            let limit = options.top_n.unwrap_or(values.len());
            let numbered = options.wants_numbers();
            let lines = values
                .iter()
                .take(limit)
                .enumerate()
                .map(|(i, value)| {
                    if numbered {
                        format!("{}. {}", i + 1, value)
                    } else {
                        value.clone()
                    }
                })
                .collect::<Vec<_>>();
            if lines.is_empty() {
                options.empty_message.clone()
            } else {
                lines.join("\n")
            }
        }
        ExtractionOutcome::Empty => options.empty_message.clone(),
    }
}

/// Cut `composed` to `max_length` characters, ending with `marker` if cut
fn bound(composed: String, max_length: usize, marker: &str) -> RenderedResult {
    let original_length = char_len(&composed);
    if original_length <= max_length {
        return RenderedResult {
            text: composed,
            truncated: false,
            original_length,
        };
    }

    let marker_length = char_len(marker);
    let text = if max_length < marker_length {
        // No room for content; keep the bound even if the marker is clipped
        take_chars(marker, max_length).to_string()
    } else {
        let mut text = take_chars(&composed, max_length - marker_length).to_string();
        text.push_str(marker);
        text
    };

    RenderedResult {
        text,
        truncated: true,
        original_length,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_table_rendering() {
        let outcome = ExtractionOutcome::Table(vec![strings(&["A", "B"]), strings(&["C", ""])]);
        let result = render(&outcome, DEFAULT_MAX_LENGTH, None);
        assert_eq!(result.text, "A | B\nC | ");
        assert!(!result.truncated);
        assert_eq!(result.original_length, 10);
    }

    #[test]
    fn test_text_list_plain() {
        let outcome = ExtractionOutcome::TextList(strings(&["One", "Two"]));
        let result = render(&outcome, DEFAULT_MAX_LENGTH, None);
        assert_eq!(result.text, "One\nTwo");
    }

    #[test]
    fn test_text_list_top_n_is_numbered_prefix() {
        let outcome = ExtractionOutcome::TextList(strings(&["c", "a", "b", "d"]));
        let result = render(&outcome, DEFAULT_MAX_LENGTH, Some(3));
        assert_eq!(result.text, "1. c\n2. a\n3. b");
    }

    #[test]
    fn test_top_n_larger_than_list() {
        let outcome = ExtractionOutcome::TextList(strings(&["only"]));
        let result = render(&outcome, DEFAULT_MAX_LENGTH, Some(10));
        assert_eq!(result.text, "1. only");
    }

    #[test]
    fn test_top_zero_renders_empty_message() {
        let outcome = ExtractionOutcome::TextList(strings(&["a", "b"]));
        let result = render(&outcome, DEFAULT_MAX_LENGTH, Some(0));
        assert_eq!(result.text, NOTHING_FOUND);
        assert!(!result.truncated);
    }

    #[test]
    fn test_numbering_override() {
        let outcome = ExtractionOutcome::TextList(strings(&["x", "y"]));
        let options = RenderOptions::new(100).numbered(true);
        assert_eq!(render_with_options(&outcome, &options).text, "1. x\n2. y");

        let options = RenderOptions::new(100).top_n(Some(1)).numbered(false);
        assert_eq!(render_with_options(&outcome, &options).text, "x");
    }

    #[test]
    fn test_custom_separator_and_marker() {
        let outcome = ExtractionOutcome::Table(vec![strings(&["a", "b", "c"])]);
        let options = RenderOptions::new(4).separator("\t").marker("…");
        let result = render_with_options(&outcome, &options);
        assert_eq!(result.text, "a\tb…");
        assert_eq!(result.original_length, 5);
    }

    #[test]
    fn test_empty_rendering() {
        let result = render(&ExtractionOutcome::Empty, DEFAULT_MAX_LENGTH, None);
        assert_eq!(result.text, NOTHING_FOUND);
        assert!(!result.truncated);

        let options = RenderOptions::new(100).empty_message("Ничего не найдено");
        let result = render_with_options(&ExtractionOutcome::Empty, &options);
        assert_eq!(result.text, "Ничего не найдено");
    }

    #[test]
    fn test_truncation_to_limit() {
        assert_eq!(char_len(TRUNCATION_MARKER), 14);

        let outcome = ExtractionOutcome::TextList(vec!["x".repeat(5000)]);
        let result = render(&outcome, 4000, None);

        assert_eq!(char_len(&result.text), 4000);
        assert!(result.truncated);
        assert!(result.text.ends_with(TRUNCATION_MARKER));
        assert_eq!(result.original_length, 5000);
        assert!(result.text.starts_with(&"x".repeat(3986)));
    }

    #[test]
    fn test_exact_fit_is_not_truncated() {
        let outcome = ExtractionOutcome::TextList(vec!["y".repeat(50)]);
        let result = render(&outcome, 50, None);
        assert!(!result.truncated);
        assert_eq!(result.text, "y".repeat(50));
    }

    #[test]
    fn test_length_bound_holds_for_all_limits() {
        let outcome = ExtractionOutcome::Table(vec![
            strings(&["Привет", "мир"]),
            strings(&["long cell value", "another"]),
        ]);
        let full = render(&outcome, usize::MAX, None);

        for max_length in 0..=full.original_length + 2 {
            let result = render(&outcome, max_length, None);
            assert!(char_len(&result.text) <= max_length);
            assert_eq!(result.original_length, full.original_length);
            if full.original_length > max_length {
                assert!(result.truncated);
                if max_length >= char_len(TRUNCATION_MARKER) {
                    assert!(result.text.ends_with(TRUNCATION_MARKER));
                }
            } else {
                assert!(!result.truncated);
                assert_eq!(result.text, full.text);
            }
        }
    }

    #[test]
    fn test_truncation_counts_characters_not_bytes() {
        let outcome = ExtractionOutcome::TextList(vec!["ж".repeat(30)]);
        let result = render(&outcome, 20, None);
        assert_eq!(char_len(&result.text), 20);
        assert!(result.text.starts_with("жжжжжж"));
        assert!(result.text.ends_with(TRUNCATION_MARKER));
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let outcome = ExtractionOutcome::TextList(strings(&["a", "b", "c"]));
        let options = RenderOptions::new(5).top_n(Some(2));
        assert_eq!(
            render_with_options(&outcome, &options),
            render_with_options(&outcome, &options)
        );
    }
}
