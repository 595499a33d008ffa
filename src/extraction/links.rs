//! Link extraction
//!
//! This module extracts all links from web pages with context and metadata.
//! Hrefs are resolved to absolute `http`/`https` URLs, de-duplicated and
//! categorized relative to the page's base URL.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Selector};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::error::{ExtractionError, Result};
use crate::extraction::document::{attr, visible_text, ParsedDocument};

/// Type of link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkType {
    /// Internal link (same host as the base URL)
    Internal,
    /// External link (different host)
    External,
    /// Link to a fragment on another page
    Anchor,
}

/// An extracted link with context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedLink {
    /// Absolute URL
    pub href: String,
    /// Display text
    pub text: String,
    /// Title attribute
    pub title: Option<String>,
    /// Rel attribute
    pub rel: Option<String>,
    /// Type of link
    pub link_type: LinkType,
    /// Whether it opens in a new tab
    pub new_tab: bool,
}

static ANCHORS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("anchor selector is valid"));
static IMAGES: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("img[alt]").expect("image selector is valid"));
static CSS_ARTIFACT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\.css-|\{|var\(--").expect("css artifact pattern is valid")
});

const SKIPPED_SCHEMES: &[&str] = &["javascript:", "mailto:", "tel:"];

/// Link extraction functionality
pub struct LinkExtractor;

impl LinkExtractor {
    /// Extract all links from the page
    #[instrument(skip(html))]
    pub fn extract_all(html: &str, base_url: Option<&str>) -> Result<Vec<ExtractedLink>> {
        info!("Extracting all links");
        let doc = ParsedDocument::parse(html)?;
        Ok(Self::from_document(&doc, base_url))
    }

    /// Extract links from an already parsed document
    pub fn from_document(doc: &ParsedDocument, base_url: Option<&str>) -> Vec<ExtractedLink> {
        let base = parse_base(base_url);
        let links = collect(doc.html().select(&ANCHORS), base.as_ref());
        debug!("Extracted {} links", links.len());
        links
    }

    /// Extract only external links
    #[instrument(skip(html))]
    pub fn extract_external(html: &str, base_url: Option<&str>) -> Result<Vec<ExtractedLink>> {
        Self::extract_of_type(html, base_url, LinkType::External)
    }

    /// Extract only internal links
    #[instrument(skip(html))]
    pub fn extract_internal(html: &str, base_url: Option<&str>) -> Result<Vec<ExtractedLink>> {
        Self::extract_of_type(html, base_url, LinkType::Internal)
    }

    fn extract_of_type(
        html: &str,
        base_url: Option<&str>,
        link_type: LinkType,
    ) -> Result<Vec<ExtractedLink>> {
        let all = Self::extract_all(html, base_url)?;
        Ok(all
            .into_iter()
            .filter(|l| l.link_type == link_type)
            .collect())
    }

    /// Extract links whose resolved href matches a regular expression
    #[instrument(skip(html))]
    pub fn extract_matching(
        html: &str,
        base_url: Option<&str>,
        pattern: &str,
    ) -> Result<Vec<ExtractedLink>> {
        let all = Self::extract_all(html, base_url)?;
        let regex = Regex::new(pattern)
            .map_err(|e| ExtractionError::InvalidPattern(format!("{}: {}", pattern, e)))?;

        Ok(all.into_iter().filter(|l| regex.is_match(&l.href)).collect())
    }

    /// Extract links inside the first element matching `selector`.
    ///
    /// Returns an empty list when nothing matches.
    #[instrument(skip(html))]
    pub fn extract_from_selector(
        html: &str,
        base_url: Option<&str>,
        selector: &str,
    ) -> Result<Vec<ExtractedLink>> {
        let doc = ParsedDocument::parse(html)?;
        let container_selector = Selector::parse(selector)
            .map_err(|e| ExtractionError::InvalidSelector(format!("{}: {}", selector, e)))?;
        let base = parse_base(base_url);

        let Some(container) = doc.html().select(&container_selector).next() else {
            debug!("No element matches {}", selector);
            return Ok(Vec::new());
        };

        let links = collect(container.select(&ANCHORS), base.as_ref());
        debug!("Extracted {} links from {}", links.len(), selector);
        Ok(links)
    }
}

fn parse_base(base_url: Option<&str>) -> Option<Url> {
    let raw = base_url?;
    match Url::parse(raw) {
        Ok(url) => Some(url),
        Err(e) => {
            warn!("Ignoring unparsable base URL {:?}: {}", raw, e);
            None
        }
    }
}

fn collect<'a>(
    anchors: impl Iterator<Item = ElementRef<'a>>,
    base: Option<&Url>,
) -> Vec<ExtractedLink> {
    let mut seen = HashSet::new();
    anchors
        .filter_map(|anchor| to_link(&anchor, base))
        .filter(|link| seen.insert(link.href.clone()))
        .collect()
}

fn to_link(anchor: &ElementRef<'_>, base: Option<&Url>) -> Option<ExtractedLink> {
    let href = attr(anchor, "href")?;
    if href.starts_with('#') {
        return None;
    }
    let lower = href.to_ascii_lowercase();
    if SKIPPED_SCHEMES.iter().any(|scheme| lower.starts_with(scheme)) {
        return None;
    }

    let resolved = match base {
        Some(base) => base.join(&href).ok()?,
        None => Url::parse(&href).ok()?,
    };
    if !matches!(resolved.scheme(), "http" | "https") {
        return None;
    }

    let link_type = classify(&resolved, base);
    let text = link_text(anchor, &resolved);

    Some(ExtractedLink {
        href: resolved.to_string(),
        text,
        title: attr(anchor, "title"),
        rel: attr(anchor, "rel"),
        link_type,
        new_tab: anchor
            .value()
            .attr("target")
            .is_some_and(|t| t.trim().eq_ignore_ascii_case("_blank")),
    })
}

fn classify(url: &Url, base: Option<&Url>) -> LinkType {
    let base_host = base.and_then(Url::host_str);
    if base_host.is_some() && base_host == url.host_str() {
        LinkType::Internal
    } else if url.fragment().is_some() {
        LinkType::Anchor
    } else {
        LinkType::External
    }
}

fn link_text(anchor: &ElementRef<'_>, url: &Url) -> String {
    let visible = visible_text(anchor);
    if !visible.is_empty() && !CSS_ARTIFACT.is_match(&visible) {
        return visible;
    }

    attr(anchor, "aria-label")
        .or_else(|| attr(anchor, "title"))
        .or_else(|| anchor.select(&IMAGES).find_map(|img| attr(&img, "alt")))
        .or_else(|| humanize_last_segment(url))
        .or_else(|| url.host_str().map(String::from))
        .unwrap_or_default()
}

/// `/blog/my-first_post.html` becomes `my first post`
fn humanize_last_segment(url: &Url) -> Option<String> {
    let segment = url.path_segments()?.filter(|s| !s.is_empty()).last()?;
    let stem = segment
        .rsplit_once('.')
        .map_or(segment, |(stem, _)| if stem.is_empty() { segment } else { stem });
    let words: Vec<&str> = stem
        .split(|c: char| c == '-' || c == '_' || c == '+' || c.is_whitespace())
        .filter(|w| !w.is_empty())
        .collect();
    (!words.is_empty()).then(|| words.join(" "))
}
