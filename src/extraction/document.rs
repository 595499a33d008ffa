//! Parsed document and input validation
//!
//! Every entry point parses its own copy of the input. Noise filtering
//! works on a clone so the parsed original stays untouched.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::error::{ExtractionError, Result};
use crate::extraction::noise;

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[A-Za-z!/?]").expect("tag pattern is valid"));

static BODY: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("body").expect("body selector is valid"));

/// Reject input that cannot be treated as an HTML document.
///
/// Empty, whitespace-only and tag-free input all fail with
/// [`ExtractionError::InvalidHtml`]. This is the only hard failure of
/// the engine.
pub fn validate_input(html: &str) -> Result<()> {
    if html.trim().is_empty() {
        return Err(ExtractionError::InvalidHtml("empty input".to_string()).into());
    }
    if !TAG_RE.is_match(html) {
        return Err(ExtractionError::InvalidHtml("no HTML tags found".to_string()).into());
    }
    Ok(())
}

/// A validated, parsed HTML document.
///
/// Read-only: extractors borrow it and never mutate it.
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    html: Html,
}

impl ParsedDocument {
    /// Validate and parse raw HTML
    pub fn parse(input: &str) -> Result<Self> {
        validate_input(input)?;
        let html = Html::parse_document(input);
        debug!(
            "Parsed document ({} bytes, {} parse errors)",
            input.len(),
            html.errors.len()
        );
        Ok(Self { html })
    }

    /// The parsed tree
    pub fn html(&self) -> &Html {
        &self.html
    }

    /// A copy of the document with all noise elements removed
    pub fn without_noise(&self) -> Html {
        let mut copy = self.html.clone();
        noise::remove_noise(&mut copy);
        copy
    }
}

/// The `<body>` element, or the root element if the parser produced none
pub fn body(html: &Html) -> ElementRef<'_> {
    html.select(&BODY)
        .next()
        .unwrap_or_else(|| html.root_element())
}

/// Collapse every whitespace run to a single space and trim
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// All text under `element`, whitespace-collapsed
pub fn visible_text(element: &ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

/// Trimmed attribute value, `None` when missing or blank
pub fn attr(element: &ElementRef<'_>, name: &str) -> Option<String> {
    element
        .value()
        .attr(name)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}
