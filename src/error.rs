//! Error types for ReasonKit Extract
//!
//! This module provides the error type hierarchy using `thiserror`.
//! Only invalid input is a hard failure for the extraction engine; every
//! other irregularity degrades to an empty or partial result.

use crate::config::ConfigError;
use thiserror::Error;

/// The main error type for ReasonKit Extract operations
#[derive(Error, Debug)]
pub enum Error {
    /// Content extraction errors
    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Content extraction errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// Input is empty or contains no markup
    #[error("page content could not be parsed: {0}")]
    InvalidHtml(String),

    /// Element not found
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// Invalid CSS selector
    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    /// Invalid regular expression
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),
}

/// Result type alias for ReasonKit Extract operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Whether this error reports unusable input HTML
    pub fn is_invalid_html(&self) -> bool {
        matches!(self, Error::Extraction(ExtractionError::InvalidHtml(_)))
    }
}
