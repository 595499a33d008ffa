//! ReasonKit Extract - Content Extraction & Metadata Engine
//!
//! This crate turns arbitrary HTML documents into clean, structured data
//! without a browser or any supervised model.
//!
//! # Features
//!
//! - **Main Content**: Heuristic content-density scoring over semantic selectors
//! - **Noise Filtering**: Navigation, ads, banners and scripts are stripped from a copy
//! - **Clean Text**: Paragraph-structured prose with mis-encodings repaired
//! - **Metadata**: Title, author, dates, Open Graph, Twitter Cards, JSON-LD, reading time
//! - **Structures**: De-duplicated, categorized links plus tables and code blocks
//!
//! # Architecture
//!
//! ```text
//! raw HTML ──▶ validate ──▶ ParsedDocument (read-only)
//!                               │
//!          ┌──────────────┬─────┴───────┬──────────────┐
//!          ▼              ▼             ▼              ▼
//!   without_noise()   Metadata       Links       Tables / Code
//!          │          (fallback    (resolve,
//!          ▼           chains)      dedupe)
//!   score + select
//!          │
//!          ▼
//!   format + normalize ──▶ ExtractedContent
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use reasonkit_extract::extraction::{ContentExtractor, MetadataExtractor};
//!
//! let html = format!(
//!     "<html><head><title>Hello</title></head><body><article><h1>Hi</h1><p>{}</p></article></body></html>",
//!     "a".repeat(250)
//! );
//!
//! let content = ContentExtractor::new().extract_main_content(&html)?;
//! assert!(content.from_main);
//!
//! let metadata = MetadataExtractor::new().extract(&html)?;
//! assert_eq!(metadata.title, "Hello");
//! # Ok::<(), reasonkit_extract::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod error;
pub mod extraction;

// Re-exports for convenience
pub use config::ExtractionConfig;
pub use error::{Error, Result};
pub use extraction::{
    CodeExtractor, ContentExtractor, LinkExtractor, MetadataExtractor, PageExtractor,
    TableExtractor,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
