//! Content extraction module
//!
//! This module provides heuristic content extraction from HTML documents,
//! including main content, metadata, links, tables and code blocks.
//!
//! Every entry point validates and parses its own input, works on
//! immutable data and shares no state, so extractors may be used from
//! several threads at once.

pub mod candidates;
pub mod code;
pub mod content;
pub mod document;
pub mod json_ld;
pub mod links;
pub mod metadata;
pub mod noise;
pub mod page;
pub mod scoring;
pub mod tables;
pub mod text;

pub use candidates::{select_best_content, ContentCandidate};
pub use code::{CodeBlock, CodeExtractor};
pub use content::{ContentExtractor, ExtractedContent};
pub use document::{validate_input, ParsedDocument};
pub use links::{ExtractedLink, LinkExtractor, LinkType};
pub use metadata::{MetadataExtractor, PageMetadata};
pub use page::{PageExtraction, PageExtractor};
pub use scoring::ContentScorer;
pub use tables::{TableData, TableExtractor};
