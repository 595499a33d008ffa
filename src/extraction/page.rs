//! Whole-page extraction
//!
//! Runs every extractor against a single parse of the page.

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::config::ExtractionConfig;
use crate::error::Result;
use crate::extraction::code::{CodeBlock, CodeExtractor};
use crate::extraction::content::{ContentExtractor, ExtractedContent};
use crate::extraction::document::ParsedDocument;
use crate::extraction::links::{ExtractedLink, LinkExtractor};
use crate::extraction::metadata::{MetadataExtractor, PageMetadata};
use crate::extraction::tables::{TableData, TableExtractor};

/// Everything extracted from one page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageExtraction {
    /// Main content
    pub content: ExtractedContent,
    /// Page metadata
    pub metadata: PageMetadata,
    /// Links
    pub links: Vec<ExtractedLink>,
    /// Tables
    pub tables: Vec<TableData>,
    /// Code blocks
    pub code_blocks: Vec<CodeBlock>,
}

/// Runs all extractors over one parsed document
#[derive(Debug, Clone, Default)]
pub struct PageExtractor {
    config: ExtractionConfig,
}

impl PageExtractor {
    /// Create an extractor with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an extractor with a custom configuration
    pub fn with_config(config: ExtractionConfig) -> Self {
        Self { config }
    }

    /// Extract content, metadata, links, tables and code from `html`
    #[instrument(skip(self, html))]
    pub fn extract(&self, html: &str, base_url: Option<&str>) -> Result<PageExtraction> {
        info!("Extracting full page");
        let doc = ParsedDocument::parse(html)?;

        let content = ContentExtractor::with_config(self.config.clone()).extract_from_document(&doc);
        let metadata =
            MetadataExtractor::with_config(self.config.clone()).extract_with_text(&doc, &content.text);

        Ok(PageExtraction {
            links: LinkExtractor::from_document(&doc, base_url),
            tables: TableExtractor::from_document(&doc),
            code_blocks: CodeExtractor::with_config(self.config.clone()).from_document(&doc),
            content,
            metadata,
        })
    }
}
