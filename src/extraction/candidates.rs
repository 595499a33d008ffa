//! Best-content selection
//!
//! Walks the document in order, scoring every element that matches one
//! of the semantic content selectors, and falls back to scoring every
//! `<div>` when no semantic candidate is convincing enough.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::extraction::scoring::ContentScorer;

/// Semantic content selectors and the offset added to their score.
pub const CONTENT_SELECTORS: &[(&str, f64)] = &[
    ("article", 100.0),
    (r#"[role="main"]"#, 95.0),
    (r#"[itemprop="articleBody"]"#, 95.0),
    ("main", 90.0),
    (".markdown-body", 90.0),
    (".post-content", 85.0),
    (".entry-content", 85.0),
    (".article-content", 85.0),
    (".article-body", 85.0),
    ("#main-content", 80.0),
    (".main-content", 80.0),
    (".story-body", 80.0),
    (".post-body", 80.0),
    ("#content", 80.0),
    (".content", 75.0),
    (r#"[role="article"]"#, 75.0),
    (".article", 70.0),
    (".blog-post", 70.0),
    (".post", 65.0),
];

static PRIORITY_TABLE: LazyLock<Vec<(Selector, f64)>> = LazyLock::new(|| {
    CONTENT_SELECTORS
        .iter()
        .map(|(css, offset)| {
            (
                Selector::parse(css).expect("content selectors are valid"),
                *offset,
            )
        })
        .collect()
});

static DIVS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div").expect("div selector is valid"));

/// A scored element
#[derive(Debug, Clone, Copy)]
pub struct ContentCandidate<'a> {
    /// The element
    pub element: ElementRef<'a>,
    /// Scorer output plus selector offset
    pub score: f64,
}

/// Pick the highest-scoring content element, or `None` if nothing
/// scores above zero. Ties keep the element seen first in document order.
pub fn select_best_content<'a>(
    html: &'a Html,
    scorer: &ContentScorer,
) -> Option<ContentCandidate<'a>> {
    let mut best: Option<ContentCandidate<'a>> = None;

    for element in html.root_element().descendants().filter_map(ElementRef::wrap) {
        let Some(offset) = selector_offset(&element) else {
            continue;
        };
        consider(&mut best, element, offset, scorer);
    }

    let threshold = scorer.weights().fallback_threshold;
    if best.map_or(true, |c| c.score < threshold) {
        debug!(
            "No semantic candidate reached {}, scoring all divs",
            threshold
        );
        for element in html.select(&DIVS) {
            consider(&mut best, element, 0.0, scorer);
        }
    }

    match best {
        Some(candidate) if candidate.score > 0.0 => {
            debug!(
                "Selected <{}> with score {:.1}",
                candidate.element.value().name(),
                candidate.score
            );
            Some(candidate)
        }
        _ => None,
    }
}

/// Highest offset among the content selectors matching `element`
fn selector_offset(element: &ElementRef<'_>) -> Option<f64> {
    PRIORITY_TABLE
        .iter()
        .filter(|(selector, _)| selector.matches(element))
        .map(|(_, offset)| *offset)
        .reduce(f64::max)
}

fn consider<'a>(
    best: &mut Option<ContentCandidate<'a>>,
    element: ElementRef<'a>,
    offset: f64,
    scorer: &ContentScorer,
) {
    if !scorer.meets_floor(&element) {
        return;
    }
    let score = scorer.score(&element) + offset;
    if best.map_or(true, |current| score > current.score) {
        *best = Some(ContentCandidate { element, score });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn best_id(input: &str) -> Option<String> {
        let html = Html::parse_document(input);
        select_best_content(&html, &ContentScorer::default())
            .and_then(|c| c.element.value().id().map(String::from))
    }

    #[test]
    fn test_article_beats_larger_div() {
        let article = "a".repeat(250);
        let div = "d".repeat(900);
        let input = format!(
            "<body><div id='side'>{div}</div><article id='post'><h1>Hi</h1><p>{article}</p></article></body>"
        );
        assert_eq!(best_id(&input).as_deref(), Some("post"));
    }

    #[test]
    fn test_short_semantic_element_never_selected() {
        let input = "<body><article id='post'><p>Too short to count.</p></article></body>";
        assert_eq!(best_id(input), None);
    }

    #[test]
    fn test_div_fallback_when_no_semantic_match() {
        let text = "x".repeat(400);
        let input = format!("<body><div id='only'><p>{text}</p></div></body>");
        assert_eq!(best_id(&input).as_deref(), Some("only"));
    }

    fn rich_div(id: &str, paragraph_len: usize) -> String {
        let para = format!("<p>{}</p>", "r".repeat(paragraph_len)).repeat(5);
        format!("<div id='{id}'><h2>T</h2>{para}</div>")
    }

    #[test]
    fn test_weak_semantic_candidate_triggers_div_pass() {
        // .post: 210 / 10 + 65 = 86, below the fallback threshold
        let post = "p".repeat(210);
        let input = format!(
            "<body><section id='post' class='post'>{post}</section>{}</body>",
            rich_div("big", 150)
        );
        let html = Html::parse_document(&input);
        let candidate = select_best_content(&html, &ContentScorer::default()).unwrap();

        assert_eq!(candidate.element.value().id(), Some("big"));
        assert!(candidate.score > 86.0);
    }

    #[test]
    fn test_strong_semantic_candidate_skips_div_pass() {
        // article: 300 / 10 + 100 = 130; the div alone would score 145
        let article = "a".repeat(300);
        let input = format!(
            "<body><article id='post'>{article}</article>{}</body>",
            rich_div("big", 200)
        );
        let html = Html::parse_document(&input);
        let scorer = ContentScorer::default();

        let div = html
            .select(&Selector::parse("#big").unwrap())
            .next()
            .unwrap();
        assert_eq!(scorer.score(&div), 145.0);

        let candidate = select_best_content(&html, &scorer).unwrap();
        assert_eq!(candidate.element.value().id(), Some("post"));
        assert_eq!(candidate.score, 130.0);
    }

    #[test]
    fn test_link_heavy_div_loses_to_plain_div() {
        let links = "n".repeat(200);
        let nav_plain = "m".repeat(100);
        let content = "c".repeat(250);
        let input = format!(
            "<body><div id='links'><a href='/x'>{links}</a> {nav_plain}</div>\
             <div id='story'>{content}</div></body>"
        );
        assert_eq!(best_id(&input).as_deref(), Some("story"));
    }

    #[test]
    fn test_ties_keep_document_order() {
        let text = "t".repeat(300);
        let input = format!(
            "<body><article id='first'>{text}</article><article id='second'>{text}</article></body>"
        );
        assert_eq!(best_id(&input).as_deref(), Some("first"));
    }

    #[test]
    fn test_highest_offset_used_for_multiple_matches() {
        let text = "z".repeat(300);
        let html = Html::parse_document(&format!(
            "<body><main class='post'>{text}</main></body>"
        ));
        let candidate = select_best_content(&html, &ContentScorer::default()).unwrap();
        assert_eq!(candidate.element.value().name(), "main");
        assert_eq!(candidate.score, 30.0 + 90.0);
    }
}
