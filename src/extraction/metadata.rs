//! Page metadata extraction
//!
//! This module extracts page metadata including title, description,
//! dates, Open Graph data, Twitter cards and JSON-LD structured data.
//! Every field is resolved through its own fallback chain, so a missing
//! source for one field never affects another.

use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

use chrono::{DateTime, NaiveDateTime};
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::config::ExtractionConfig;
use crate::error::Result;
use crate::extraction::content::ContentExtractor;
use crate::extraction::document::{attr, visible_text, ParsedDocument};
use crate::extraction::json_ld;
use crate::extraction::text::word_count;

/// Extracted page metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageMetadata {
    /// Page title (empty if none found)
    pub title: String,
    /// Page description (empty if none found)
    pub description: String,
    /// Keywords
    pub keywords: Vec<String>,
    /// Document language
    pub language: Option<String>,
    /// Author
    pub author: Option<String>,
    /// Publication date
    pub publish_date: Option<String>,
    /// Last modification date
    pub modified_date: Option<String>,
    /// Publisher
    pub publisher: Option<String>,
    /// Open Graph tags, keyed without the `og:` prefix
    pub og: BTreeMap<String, String>,
    /// Twitter Card tags, keyed without the `twitter:` prefix
    pub twitter: BTreeMap<String, String>,
    /// Parsed JSON-LD nodes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub structured_data: Vec<Value>,
    /// Site name
    pub site_name: Option<String>,
    /// Content type (`article`, `website`, ...)
    #[serde(rename = "type")]
    pub page_type: Option<String>,
    /// Page URL
    pub url: Option<String>,
    /// Lead image
    pub image: Option<String>,
    /// Canonical URL
    pub canonical: Option<String>,
    /// Robots directives
    pub robots: Option<String>,
    /// Viewport settings
    pub viewport: Option<String>,
    /// Favicon URL
    pub favicon: Option<String>,
    /// Words in the clean main-content text
    pub word_count: usize,
    /// Estimated minutes to read, at least 1
    pub reading_time: usize,
}

static META: LazyLock<Selector> = LazyLock::new(|| parse("meta"));
static TITLE: LazyLock<Selector> = LazyLock::new(|| parse("title"));
static H1: LazyLock<Selector> = LazyLock::new(|| parse("h1"));
static HTML_LANG: LazyLock<Selector> = LazyLock::new(|| parse("html[lang]"));
static REL_AUTHOR: LazyLock<Selector> = LazyLock::new(|| parse(r#"[rel~="author"]"#));
static TIME_DATETIME: LazyLock<Selector> = LazyLock::new(|| parse("time[datetime]"));
static CANONICAL: LazyLock<Selector> = LazyLock::new(|| parse(r#"link[rel~="canonical"][href]"#));
static FAVICON: LazyLock<Selector> = LazyLock::new(|| parse(r#"link[rel~="icon"][href]"#));

fn parse(selector: &str) -> Selector {
    Selector::parse(selector).expect("metadata selectors are valid")
}

/// `<meta>` tags indexed by `name`/`property` (lowercased)
struct MetaTags {
    tags: Vec<(String, String)>,
    first: HashMap<String, String>,
}

impl MetaTags {
    fn collect(html: &Html) -> Self {
        let mut tags = Vec::new();
        for meta in html.select(&META) {
            let Some(content) = attr(&meta, "content") else {
                continue;
            };
            for key_attr in ["property", "name", "itemprop"] {
                if let Some(key) = attr(&meta, key_attr) {
                    tags.push((key.to_lowercase(), content.clone()));
                }
            }
            if let Some(key) = attr(&meta, "http-equiv") {
                tags.push((format!("http-equiv:{}", key.to_lowercase()), content.clone()));
            }
        }

        let mut first = HashMap::new();
        for (key, value) in &tags {
            first.entry(key.clone()).or_insert_with(|| value.clone());
        }
        Self { tags, first }
    }

    fn get(&self, key: &str) -> Option<String> {
        self.first.get(key).cloned()
    }

    fn all(&self, key: &str) -> Vec<String> {
        self.tags
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
            .collect()
    }

    /// Tags under `prefix`, keyed without it; first occurrence wins
    fn namespace(&self, prefix: &str) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();
        for (key, value) in &self.tags {
            if let Some(name) = key.strip_prefix(prefix) {
                if !name.is_empty() {
                    map.entry(name.to_string()).or_insert_with(|| value.clone());
                }
            }
        }
        map
    }
}

/// The document `<title>`; `<svg><title>` icon labels do not count
fn document_title(html: &Html) -> Option<String> {
    html.select(&TITLE)
        .filter(|el| {
            !el.ancestors()
                .filter_map(ElementRef::wrap)
                .any(|ancestor| ancestor.value().name() == "svg")
        })
        .map(|el| visible_text(&el))
        .find(|text| !text.is_empty())
}

fn first_text(html: &Html, selector: &Selector) -> Option<String> {
    html.select(selector)
        .map(|el| visible_text(&el))
        .find(|text| !text.is_empty())
}

fn first_attr(html: &Html, selector: &Selector, name: &str) -> Option<String> {
    html.select(selector).find_map(|el| attr(&el, name))
}

/// Normalize common date formats to RFC 3339; unknown formats are kept as-is
pub fn normalize_date(raw: &str) -> String {
    let raw = raw.trim();
    if DateTime::parse_from_rfc3339(raw).is_ok() {
        return raw.to_string();
    }
    if let Ok(date) = DateTime::parse_from_rfc2822(raw) {
        return date.to_rfc3339();
    }
    if let Ok(date) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return date.and_utc().to_rfc3339();
    }
    raw.to_string()
}

/// Minutes needed to read `words` at `words_per_minute`, never less than 1
pub fn reading_time(words: usize, words_per_minute: usize) -> usize {
    words.div_ceil(words_per_minute.max(1)).max(1)
}

/// Metadata extraction functionality
#[derive(Debug, Clone, Default)]
pub struct MetadataExtractor {
    config: ExtractionConfig,
}

impl MetadataExtractor {
    /// Create an extractor with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an extractor with a custom configuration
    pub fn with_config(config: ExtractionConfig) -> Self {
        Self { config }
    }

    /// Extract all metadata from raw HTML
    #[instrument(skip_all)]
    pub fn extract(&self, html: &str) -> Result<PageMetadata> {
        info!("Extracting page metadata");
        let doc = ParsedDocument::parse(html)?;
        let content = ContentExtractor::with_config(self.config.clone()).extract_from_document(&doc);
        Ok(self.extract_with_text(&doc, &content.text))
    }

    /// Extract metadata from a parsed document, counting words in the
    /// already-extracted clean text
    pub fn extract_with_text(&self, doc: &ParsedDocument, clean_text: &str) -> PageMetadata {
        let html = doc.html();
        let meta = MetaTags::collect(html);
        let structured_data = json_ld::parse_blocks(html);

        let title = document_title(html)
            .or_else(|| meta.get("og:title"))
            .or_else(|| meta.get("twitter:title"))
            .or_else(|| first_text(html, &H1))
            .unwrap_or_default();

        let description = meta
            .get("description")
            .or_else(|| meta.get("og:description"))
            .or_else(|| meta.get("twitter:description"))
            .unwrap_or_default();

        let keywords = Self::keywords(&meta, &structured_data);

        let language = first_attr(html, &HTML_LANG, "lang")
            .or_else(|| meta.get("http-equiv:content-language"))
            .or_else(|| meta.get("og:locale"));

        let author = meta
            .get("author")
            .or_else(|| meta.get("article:author"))
            .or_else(|| first_text(html, &REL_AUTHOR))
            .or_else(|| json_ld::find_name(&structured_data, "author"));

        let publish_date = meta
            .get("article:published_time")
            .or_else(|| first_attr(html, &TIME_DATETIME, "datetime"))
            .or_else(|| json_ld::find_str(&structured_data, "datePublished"))
            .map(|d| normalize_date(&d));

        let modified_date = meta
            .get("article:modified_time")
            .or_else(|| meta.get("og:updated_time"))
            .or_else(|| json_ld::find_str(&structured_data, "dateModified"))
            .map(|d| normalize_date(&d));

        let publisher = meta
            .get("article:publisher")
            .or_else(|| json_ld::find_name(&structured_data, "publisher"));

        let site_name = meta
            .get("og:site_name")
            .or_else(|| meta.get("application-name"))
            .or_else(|| json_ld::find_name(&structured_data, "publisher"));

        let page_type = meta
            .get("og:type")
            .or_else(|| json_ld::find_type(&structured_data));

        let canonical = first_attr(html, &CANONICAL, "href");
        let url = meta.get("og:url").or_else(|| canonical.clone());

        let image = meta
            .get("og:image")
            .or_else(|| meta.get("twitter:image"))
            .or_else(|| meta.get("twitter:image:src"))
            .or_else(|| json_ld::find_image(&structured_data));

        let words = word_count(clean_text);

        let metadata = PageMetadata {
            title,
            description,
            keywords,
            language,
            author,
            publish_date,
            modified_date,
            publisher,
            og: meta.namespace("og:"),
            twitter: meta.namespace("twitter:"),
            structured_data,
            site_name,
            page_type,
            url,
            image,
            canonical,
            robots: meta.get("robots"),
            viewport: meta.get("viewport"),
            favicon: first_attr(html, &FAVICON, "href"),
            word_count: words,
            reading_time: reading_time(words, self.config.words_per_minute),
        };

        debug!(
            "Extracted metadata: title={:?}, author={:?}, words={}",
            metadata.title, metadata.author, metadata.word_count
        );

        metadata
    }

    fn keywords(meta: &MetaTags, structured_data: &[Value]) -> Vec<String> {
        if let Some(raw) = meta.get("keywords") {
            let keywords: Vec<String> = raw
                .split(',')
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(String::from)
                .collect();
            if !keywords.is_empty() {
                return keywords;
            }
        }

        let tags = meta.all("article:tag");
        if !tags.is_empty() {
            return tags;
        }

        json_ld::find_keywords(structured_data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn extract(html: &str) -> PageMetadata {
        MetadataExtractor::new().extract(html).unwrap()
    }

    #[test]
    fn test_page_metadata_default() {
        let meta = PageMetadata::default();
        assert!(meta.title.is_empty());
        assert!(meta.keywords.is_empty());
        assert!(meta.structured_data.is_empty());
    }

    #[test]
    fn test_title_chain_prefers_title_tag() {
        let meta = extract(
            r#"<html><head><title>Tag Title</title>
               <meta property="og:title" content="OG Title"></head><body></body></html>"#,
        );
        assert_eq!(meta.title, "Tag Title");
        assert_eq!(meta.og.get("title").map(String::as_str), Some("OG Title"));
    }

    #[test]
    fn test_title_chain_falls_through() {
        let og = extract(r#"<head><meta property="og:title" content="OG"></head>"#);
        assert_eq!(og.title, "OG");

        let tw = extract(r#"<head><meta name="twitter:title" content="TW"></head>"#);
        assert_eq!(tw.title, "TW");

        let h1 = extract("<body><h1>Heading  One</h1></body>");
        assert_eq!(h1.title, "Heading One");

        let none = extract("<body><p>nothing</p></body>");
        assert_eq!(none.title, "");
    }

    #[test]
    fn test_svg_title_is_not_document_title() {
        let meta = extract(
            r#"<html><head><meta property="og:title" content="Real Title"></head>
               <body><svg><title>Search icon</title></svg><h1>Heading</h1></body></html>"#,
        );
        assert_eq!(meta.title, "Real Title");

        let meta = extract(
            "<html><head><title>Doc</title></head><body><svg><title>Icon</title></svg></body></html>",
        );
        assert_eq!(meta.title, "Doc");
    }

    #[test]
    fn test_description_chain() {
        let meta = extract(
            r#"<head><meta property="og:description" content="From OG">
               <meta name="twitter:description" content="From Twitter"></head>"#,
        );
        assert_eq!(meta.description, "From OG");
    }

    #[test]
    fn test_author_chain() {
        let meta = extract(r#"<body><a rel="author" href="/ann">Ann Writer</a></body>"#);
        assert_eq!(meta.author.as_deref(), Some("Ann Writer"));

        let meta = extract(
            r#"<head><meta property="article:author" content="Bob"></head>
               <body><a rel="author" href="/ann">Ann</a></body>"#,
        );
        assert_eq!(meta.author.as_deref(), Some("Bob"));
    }

    #[test]
    fn test_dates() {
        let meta = extract(
            r#"<head><meta property="article:published_time" content="2024-03-01T10:00:00Z">
               <meta property="article:modified_time" content="Fri, 01 Mar 2024 12:00:00 +0000"></head>
               <body><time datetime="2020-01-01">old</time></body>"#,
        );
        assert_eq!(meta.publish_date.as_deref(), Some("2024-03-01T10:00:00Z"));
        assert_eq!(
            meta.modified_date.as_deref(),
            Some("2024-03-01T12:00:00+00:00")
        );

        let meta = extract(r#"<body><time datetime="2020-01-01">Jan 1</time></body>"#);
        assert_eq!(meta.publish_date.as_deref(), Some("2020-01-01"));
    }

    #[test]
    fn test_normalize_date() {
        assert_eq!(normalize_date(" 2024-01-02 03:04:05 "), "2024-01-02T03:04:05+00:00");
        assert_eq!(normalize_date("yesterday"), "yesterday");
    }

    #[test]
    fn test_open_graph_and_twitter_maps() {
        let meta = extract(
            r#"<head>
                <meta property="og:image" content="https://example.com/1.png">
                <meta property="og:image" content="https://example.com/2.png">
                <meta property="og:type" content="article">
                <meta name="twitter:card" content="summary_large_image">
                <meta name="twitter:site" content="@example">
            </head>"#,
        );
        assert_eq!(meta.og.len(), 2);
        assert_eq!(meta.image.as_deref(), Some("https://example.com/1.png"));
        assert_eq!(meta.page_type.as_deref(), Some("article"));
        assert_eq!(
            meta.twitter.get("card").map(String::as_str),
            Some("summary_large_image")
        );
        assert_eq!(meta.twitter.get("site").map(String::as_str), Some("@example"));
    }

    #[test]
    fn test_json_ld_fallbacks() {
        let meta = extract(
            r#"<head><script type="application/ld+json">
                {"@type": "BlogPosting", "author": {"name": "Cleo"},
                 "datePublished": "2023-05-06", "publisher": {"name": "Blogz"},
                 "image": "https://example.com/lead.jpg"}
               </script></head>"#,
        );
        assert_eq!(meta.structured_data.len(), 1);
        assert_eq!(meta.author.as_deref(), Some("Cleo"));
        assert_eq!(meta.publish_date.as_deref(), Some("2023-05-06"));
        assert_eq!(meta.publisher.as_deref(), Some("Blogz"));
        assert_eq!(meta.site_name.as_deref(), Some("Blogz"));
        assert_eq!(meta.page_type.as_deref(), Some("BlogPosting"));
        assert_eq!(meta.image.as_deref(), Some("https://example.com/lead.jpg"));
    }

    #[test]
    fn test_head_fields() {
        let meta = extract(
            r#"<html lang="en-GB"><head>
                <meta name="keywords" content="rust, parsing, ,html">
                <meta name="robots" content="index, follow">
                <meta name="viewport" content="width=device-width">
                <link rel="canonical" href="https://example.com/post">
                <link rel="shortcut icon" href="/favicon.ico">
            </head><body></body></html>"#,
        );
        assert_eq!(meta.language.as_deref(), Some("en-GB"));
        assert_eq!(meta.keywords, vec!["rust", "parsing", "html"]);
        assert_eq!(meta.robots.as_deref(), Some("index, follow"));
        assert_eq!(meta.viewport.as_deref(), Some("width=device-width"));
        assert_eq!(meta.canonical.as_deref(), Some("https://example.com/post"));
        assert_eq!(meta.url.as_deref(), Some("https://example.com/post"));
        assert_eq!(meta.favicon.as_deref(), Some("/favicon.ico"));
    }

    #[test]
    fn test_article_tags_as_keywords() {
        let meta = extract(
            r#"<head><meta property="article:tag" content="one">
               <meta property="article:tag" content="two"></head>"#,
        );
        assert_eq!(meta.keywords, vec!["one", "two"]);
    }

    #[test]
    fn test_reading_time() {
        assert_eq!(reading_time(400, 200), 2);
        assert_eq!(reading_time(401, 200), 3);
        assert_eq!(reading_time(1, 200), 1);
        assert_eq!(reading_time(0, 200), 1);
    }

    #[test]
    fn test_word_count_from_clean_text() {
        let words = "word ".repeat(450);
        let meta = extract(&format!(
            "<html><head><script>var a = 'not counted';</script></head>\
             <body><nav>Menu items here</nav><article><p>{words}</p></article></body></html>"
        ));
        assert_eq!(meta.word_count, 450);
        assert_eq!(meta.reading_time, 3);
    }

    #[test]
    fn test_serialization_uses_type_key() {
        let meta = PageMetadata {
            title: "Test".to_string(),
            page_type: Some("website".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["type"], "website");
        assert!(json.get("structured_data").is_none());

        let parsed: PageMetadata = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, meta);
    }
}
