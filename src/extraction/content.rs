//! Main content extraction
//!
//! This module extracts the main content from web pages as clean,
//! paragraph-structured text. The document is parsed, a noise-filtered
//! copy is scored, and the best candidate is formatted; pages without a
//! convincing candidate fall back to the filtered `<body>`.

use std::sync::LazyLock;

use scraper::{ElementRef, Selector};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::config::ExtractionConfig;
use crate::error::{ExtractionError, Result};
use crate::extraction::candidates::select_best_content;
use crate::extraction::document::{body, ParsedDocument};
use crate::extraction::scoring::ContentScorer;
use crate::extraction::text::{format_text, paragraph_count, word_count};

/// Extracted content from a page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedContent {
    /// Clean plain text
    pub text: String,
    /// Inner HTML of the element the text came from
    pub html: String,
    /// Word count of `text`
    pub word_count: usize,
    /// Character count of `text`
    pub char_count: usize,
    /// Paragraph count of `text`
    pub paragraph_count: usize,
    /// Whether the source element contains code
    pub has_code: bool,
    /// Whether the source element contains tables
    pub has_tables: bool,
    /// Whether content came from a scored candidate rather than `<body>`
    pub from_main: bool,
}

impl ExtractedContent {
    fn from_element(element: &ElementRef<'_>, text: String, from_main: bool) -> Self {
        Self {
            word_count: word_count(&text),
            char_count: text.chars().count(),
            paragraph_count: paragraph_count(&text),
            has_code: element.select(&CODE).next().is_some(),
            has_tables: element.select(&TABLES).next().is_some(),
            html: element.inner_html(),
            text,
            from_main,
        }
    }
}

static CODE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("pre, code").expect("code selector is valid"));
static TABLES: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table").expect("table selector is valid"));

/// Content extraction functionality
#[derive(Debug, Clone, Default)]
pub struct ContentExtractor {
    config: ExtractionConfig,
}

impl ContentExtractor {
    /// Create an extractor with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an extractor with a custom configuration
    pub fn with_config(config: ExtractionConfig) -> Self {
        Self { config }
    }

    /// Configuration in use
    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Extract main content from the page
    #[instrument(skip_all)]
    pub fn extract_main_content(&self, html: &str) -> Result<ExtractedContent> {
        info!("Extracting main content");
        let doc = ParsedDocument::parse(html)?;
        Ok(self.extract_from_document(&doc))
    }

    /// Clean main-content text only
    #[instrument(skip_all)]
    pub fn clean_text(&self, html: &str) -> Result<String> {
        Ok(self.extract_main_content(html)?.text)
    }

    /// Extract main content from an already parsed document
    pub fn extract_from_document(&self, doc: &ParsedDocument) -> ExtractedContent {
        let filtered = doc.without_noise();
        let scorer = ContentScorer::new(&self.config);

        if let Some(candidate) = select_best_content(&filtered, &scorer) {
            let text = format_text(&candidate.element);
            if text.chars().count() >= self.config.min_content_length {
                let content = ExtractedContent::from_element(&candidate.element, text, true);
                debug!(
                    "Extracted {} words, {} chars, from_main=true",
                    content.word_count, content.char_count
                );
                return content;
            }
            debug!("Best candidate text too short, using <body>");
        } else {
            debug!("No content candidate, using <body>");
        }

        let body = body(&filtered);
        let content = ExtractedContent::from_element(&body, format_text(&body), false);
        debug!(
            "Extracted {} words, {} chars, from_main=false",
            content.word_count, content.char_count
        );
        content
    }

    /// Extract content from the first element matching `selector`
    #[instrument(skip(self, html))]
    pub fn extract_from_selector(&self, html: &str, selector: &str) -> Result<ExtractedContent> {
        info!("Extracting from selector: {}", selector);

        let doc = ParsedDocument::parse(html)?;
        let parsed = Selector::parse(selector)
            .map_err(|e| ExtractionError::InvalidSelector(format!("{}: {}", selector, e)))?;

        let element = doc
            .html()
            .select(&parsed)
            .next()
            .ok_or_else(|| ExtractionError::ElementNotFound(selector.to_string()))?;

        Ok(ExtractedContent::from_element(
            &element,
            format_text(&element),
            false,
        ))
    }

    /// Extract all text from the page body, noise included
    #[instrument(skip_all)]
    pub fn extract_all_text(&self, html: &str) -> Result<String> {
        let doc = ParsedDocument::parse(html)?;
        Ok(format_text(&body(doc.html())))
    }
}
