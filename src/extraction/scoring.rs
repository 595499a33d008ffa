//! Content-density scoring
//!
//! Assigns a heuristic quality score to a DOM element from its text
//! length, paragraph structure and link density. Elements below the
//! minimum content length always score 0.

use std::sync::LazyLock;

use scraper::{ElementRef, Selector};

use crate::config::{ExtractionConfig, ScoringWeights};
use crate::extraction::document::visible_text;

static PARAGRAPHS: LazyLock<Selector> = LazyLock::new(|| parse("p"));
static HEADINGS: LazyLock<Selector> = LazyLock::new(|| parse("h1, h2, h3"));
static BLOCKQUOTES: LazyLock<Selector> = LazyLock::new(|| parse("blockquote"));
static LISTS: LazyLock<Selector> = LazyLock::new(|| parse("ul, ol"));
static FORMS: LazyLock<Selector> = LazyLock::new(|| parse("form"));
static LINKS: LazyLock<Selector> = LazyLock::new(|| parse("a"));
static COMMENT_SECTIONS: LazyLock<Selector> =
    LazyLock::new(|| parse(r#"[class*="comment"], [id*="comment"]"#));

fn parse(selector: &str) -> Selector {
    Selector::parse(selector).expect("scoring selectors are valid")
}

/// Scores candidate elements
#[derive(Debug, Clone)]
pub struct ContentScorer {
    weights: ScoringWeights,
    min_content_length: usize,
}

impl Default for ContentScorer {
    fn default() -> Self {
        Self::new(&ExtractionConfig::default())
    }
}

impl ContentScorer {
    /// Create a scorer from the engine configuration
    pub fn new(config: &ExtractionConfig) -> Self {
        Self {
            weights: config.scoring.clone(),
            min_content_length: config.min_content_length,
        }
    }

    /// Scoring weights in use
    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Whether the element has enough text to be scored at all
    pub fn meets_floor(&self, element: &ElementRef<'_>) -> bool {
        text_len(element) >= self.min_content_length
    }

    /// Score an element. Returns 0 below the minimum content length.
    pub fn score(&self, element: &ElementRef<'_>) -> f64 {
        let len = text_len(element);
        if len < self.min_content_length {
            return 0.0;
        }
        self.score_with_len(element, len)
    }

    fn score_with_len(&self, element: &ElementRef<'_>, len: usize) -> f64 {
        let w = &self.weights;

        let mut score = (len as f64 / w.chars_per_point).min(w.max_base_score);

        let paragraphs = element.select(&PARAGRAPHS).count();
        score += paragraphs as f64 * w.paragraph_bonus;

        if link_density_with_len(element, len) > w.link_density_threshold {
            score -= w.link_density_penalty;
        }

        if element.select(&HEADINGS).next().is_some() {
            score += w.heading_bonus;
        }
        if paragraphs > w.many_paragraphs_threshold {
            score += w.many_paragraphs_bonus;
        }
        if element.select(&BLOCKQUOTES).next().is_some() {
            score += w.blockquote_bonus;
        }
        if element.select(&LISTS).next().is_some() {
            score += w.list_bonus;
        }

        if has_comment_section(element) {
            score -= w.comment_penalty;
        }
        if element.select(&FORMS).count() > w.form_threshold {
            score -= w.form_penalty;
        }

        score
    }
}

fn text_len(element: &ElementRef<'_>) -> usize {
    visible_text(element).chars().count()
}

/// Ratio of text inside `<a>` descendants to all visible text (0.0-1.0)
pub fn link_density(element: &ElementRef<'_>) -> f64 {
    link_density_with_len(element, text_len(element))
}

fn link_density_with_len(element: &ElementRef<'_>, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let linked: usize = element
        .select(&LINKS)
        .map(|a| visible_text(&a).chars().count())
        .sum();
    (linked as f64 / total as f64).min(1.0)
}

fn has_comment_section(element: &ElementRef<'_>) -> bool {
    COMMENT_SECTIONS.matches(element) || element.select(&COMMENT_SECTIONS).next().is_some()
}
