//! Extraction configuration
//!
//! All heuristic thresholds used by the engine live here. They are
//! empirically chosen defaults, so every one of them can be overridden,
//! either in code or through environment variables:
//!
//! - `REASONKIT_EXTRACT_MIN_CONTENT_LENGTH`: minimum visible text for a
//!   content candidate (default: 200)
//! - `REASONKIT_EXTRACT_WORDS_PER_MINUTE`: reading speed (default: 200)
//! - `REASONKIT_EXTRACT_MIN_INLINE_CODE`: minimum length of a standalone
//!   `<code>` element (default: 10)
//! - `REASONKIT_EXTRACT_LINK_DENSITY`: link-text ratio above which a
//!   candidate is penalized (default: 0.5)

use std::env;
use std::str::FromStr;

use thiserror::Error;
use tracing::debug;

/// Configuration error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable held an unusable value
    #[error("Invalid value {value:?} for {var}: {reason}")]
    InvalidValue {
        /// Variable name
        var: String,
        /// Raw value
        value: String,
        /// Why it was rejected
        reason: String,
    },
}

const ENV_MIN_CONTENT_LENGTH: &str = "REASONKIT_EXTRACT_MIN_CONTENT_LENGTH";
const ENV_WORDS_PER_MINUTE: &str = "REASONKIT_EXTRACT_WORDS_PER_MINUTE";
const ENV_MIN_INLINE_CODE: &str = "REASONKIT_EXTRACT_MIN_INLINE_CODE";
const ENV_LINK_DENSITY: &str = "REASONKIT_EXTRACT_LINK_DENSITY";

/// Weights applied by the candidate scorer
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringWeights {
    /// Cap on the length-derived base score (default: 100)
    pub max_base_score: f64,
    /// Characters of text per base point (default: 10)
    pub chars_per_point: f64,
    /// Bonus per `<p>` descendant (default: 5)
    pub paragraph_bonus: f64,
    /// Link-text ratio above which the link penalty applies (default: 0.5)
    pub link_density_threshold: f64,
    /// Penalty for link-heavy blocks (default: 50)
    pub link_density_penalty: f64,
    /// Bonus when an `h1`-`h3` is present (default: 10)
    pub heading_bonus: f64,
    /// Paragraph count above which `many_paragraphs_bonus` applies (default: 3)
    pub many_paragraphs_threshold: usize,
    /// Bonus for more than `many_paragraphs_threshold` paragraphs (default: 10)
    pub many_paragraphs_bonus: f64,
    /// Bonus when a `<blockquote>` is present (default: 5)
    pub blockquote_bonus: f64,
    /// Bonus when a list is present (default: 5)
    pub list_bonus: f64,
    /// Penalty when a comment section is present (default: 20)
    pub comment_penalty: f64,
    /// Form count above which `form_penalty` applies (default: 2)
    pub form_threshold: usize,
    /// Penalty for form-heavy blocks (default: 15)
    pub form_penalty: f64,
    /// Best selector score under which every `<div>` is also scored (default: 100)
    pub fallback_threshold: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            max_base_score: 100.0,
            chars_per_point: 10.0,
            paragraph_bonus: 5.0,
            link_density_threshold: 0.5,
            link_density_penalty: 50.0,
            heading_bonus: 10.0,
            many_paragraphs_threshold: 3,
            many_paragraphs_bonus: 10.0,
            blockquote_bonus: 5.0,
            list_bonus: 5.0,
            comment_penalty: 20.0,
            form_threshold: 2,
            form_penalty: 15.0,
            fallback_threshold: 100.0,
        }
    }
}

/// Engine-wide extraction configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionConfig {
    /// Minimum visible text length (chars) for content candidates and
    /// for formatted output before falling back to `<body>`
    pub min_content_length: usize,
    /// Reading speed used for `reading_time`
    pub words_per_minute: usize,
    /// Standalone `<code>` elements must be longer than this to count
    pub min_inline_code_length: usize,
    /// Candidate scoring weights
    pub scoring: ScoringWeights,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            min_content_length: 200,
            words_per_minute: 200,
            min_inline_code_length: 10,
            scoring: ScoringWeights::default(),
        }
    }
}

impl ExtractionConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if a variable is set but cannot
    /// be parsed, or if `REASONKIT_EXTRACT_WORDS_PER_MINUTE` is zero.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(v) = parse_var::<usize, _>(&lookup, ENV_MIN_CONTENT_LENGTH)? {
            config.min_content_length = v;
        }

        if let Some(v) = parse_var::<usize, _>(&lookup, ENV_WORDS_PER_MINUTE)? {
            if v == 0 {
                return Err(ConfigError::InvalidValue {
                    var: ENV_WORDS_PER_MINUTE.to_string(),
                    value: v.to_string(),
                    reason: "must be greater than zero".to_string(),
                });
            }
            config.words_per_minute = v;
        }

        if let Some(v) = parse_var::<usize, _>(&lookup, ENV_MIN_INLINE_CODE)? {
            config.min_inline_code_length = v;
        }

        if let Some(v) = parse_var::<f64, _>(&lookup, ENV_LINK_DENSITY)? {
            if !(0.0..=1.0).contains(&v) {
                return Err(ConfigError::InvalidValue {
                    var: ENV_LINK_DENSITY.to_string(),
                    value: v.to_string(),
                    reason: "must be between 0 and 1".to_string(),
                });
            }
            config.scoring.link_density_threshold = v;
        }

        debug!(?config, "Loaded extraction config");
        Ok(config)
    }

    /// Override the minimum content length
    pub fn with_min_content_length(mut self, len: usize) -> Self {
        self.min_content_length = len;
        self
    }
}

fn parse_var<T, F>(lookup: &F, var: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(var) else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<T>()
        .map(Some)
        .map_err(|e| ConfigError::InvalidValue {
            var: var.to_string(),
            value: raw.clone(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ExtractionConfig::default();
        assert_eq!(config.min_content_length, 200);
        assert_eq!(config.words_per_minute, 200);
        assert_eq!(config.min_inline_code_length, 10);
        assert_eq!(config.scoring.link_density_threshold, 0.5);
        assert_eq!(config.scoring.fallback_threshold, 100.0);
    }

    #[test]
    fn test_from_lookup_empty_uses_defaults() {
        let config = ExtractionConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ExtractionConfig::default());
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = ExtractionConfig::from_lookup(lookup(&[
            (ENV_MIN_CONTENT_LENGTH, "120"),
            (ENV_WORDS_PER_MINUTE, " 250 "),
            (ENV_LINK_DENSITY, "0.4"),
        ]))
        .unwrap();
        assert_eq!(config.min_content_length, 120);
        assert_eq!(config.words_per_minute, 250);
        assert_eq!(config.scoring.link_density_threshold, 0.4);
    }

    #[test]
    fn test_invalid_number_rejected() {
        let err = ExtractionConfig::from_lookup(lookup(&[(ENV_MIN_INLINE_CODE, "ten")]))
            .unwrap_err();
        assert!(err.to_string().contains(ENV_MIN_INLINE_CODE));
    }

    #[test]
    fn test_zero_words_per_minute_rejected() {
        let err =
            ExtractionConfig::from_lookup(lookup(&[(ENV_WORDS_PER_MINUTE, "0")])).unwrap_err();
        assert!(err.to_string().contains("greater than zero"));
    }

    #[test]
    fn test_link_density_out_of_range() {
        assert!(ExtractionConfig::from_lookup(lookup(&[(ENV_LINK_DENSITY, "1.5")])).is_err());
    }
}
