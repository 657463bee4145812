//! Table and element extraction
//!
//! Parsing goes through html5ever (via `scraper`), which builds a tree from
//! any input the way a browser would. Broken markup therefore never fails;
//! the only extraction error is a selector that cannot be parsed.

use crate::error::ScrapeError;
use crate::text::{contains_keyword, normalize_whitespace};
use crate::types::{Document, ExtractionOutcome, ExtractionTarget, Row};
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

/// Elements whose text never reaches the reader
const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Elements that separate words even without surrounding whitespace
const BREAKING_ELEMENTS: &[&str] = &[
    "br", "p", "div", "li", "ul", "ol", "tr", "td", "th", "h1", "h2", "h3", "h4", "h5", "h6",
    "section", "article", "header", "footer", "blockquote", "pre", "table",
];

/// Run `target` over `doc`
pub fn extract(
    doc: &Document,
    target: &ExtractionTarget,
) -> Result<ExtractionOutcome, ScrapeError> {
    let html = Html::parse_document(&doc.html);

    let outcome = match target {
        ExtractionTarget::FirstTable => extract_first_table(&html),
        ExtractionTarget::Elements { selector, keyword } => {
            extract_elements(&html, selector, keyword.as_deref())?
        }
    };

    debug!(url = %doc.url, items = outcome.len(), "Extraction finished");
    Ok(outcome)
}

/// Rows of the first table in document order
fn extract_first_table(html: &Html) -> ExtractionOutcome {
    let table = html
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "table");

    let Some(table) = table else {
        return ExtractionOutcome::Empty;
    };

    let mut rows = Vec::new();
    collect_rows(table, &mut rows);

    if rows.is_empty() {
        ExtractionOutcome::Empty
    } else {
        ExtractionOutcome::Table(rows)
    }
}

/// Collect rows belonging to `parent`, skipping nested tables
fn collect_rows(parent: ElementRef<'_>, rows: &mut Vec<Row>) {
    for child in parent.children().filter_map(ElementRef::wrap) {
        match child.value().name() {
            "tr" => {
                let row: Row = child
                    .children()
                    .filter_map(ElementRef::wrap)
                    .filter(|cell| matches!(cell.value().name(), "td" | "th"))
                    .map(element_text)
                    .collect();
                if row.iter().any(|cell| !cell.is_empty()) {
                    rows.push(row);
                }
            }
            "thead" | "tbody" | "tfoot" => collect_rows(child, rows),
            _ => {}
        }
    }
}

/// Non-empty texts of elements matching `selector`, optionally filtered
fn extract_elements(
    html: &Html,
    selector: &str,
    keyword: Option<&str>,
) -> Result<ExtractionOutcome, ScrapeError> {
    let parsed = Selector::parse(selector)
        .map_err(|_| ScrapeError::InvalidSelector(selector.to_string()))?;

    let values: Vec<String> = html
        .select(&parsed)
        .map(element_text)
        .filter(|value| !value.is_empty())
        .filter(|value| keyword.map_or(true, |k| contains_keyword(value, k)))
        .collect();

    if values.is_empty() {
        Ok(ExtractionOutcome::Empty)
    } else {
        Ok(ExtractionOutcome::TextList(values))
    }
}

/// Visible text of an element, whitespace-normalized
fn element_text(el: ElementRef<'_>) -> String {
    let mut raw = String::new();
    push_text(el, &mut raw);
    normalize_whitespace(&raw)
}

fn push_text(el: ElementRef<'_>, out: &mut String) {
    for child in el.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
        } else if let Some(child_el) = ElementRef::wrap(child) {
            let name = child_el.value().name();
            if SKIPPED_ELEMENTS.contains(&name) {
                continue;
            }
            let breaking = BREAKING_ELEMENTS.contains(&name);
            if breaking {
                out.push(' ');
            }
            push_text(child_el, out);
            if breaking {
                out.push(' ');
            }
        }
    }
}
