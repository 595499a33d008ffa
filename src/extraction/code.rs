//! Code block extraction

use std::sync::LazyLock;

use scraper::{ElementRef, Selector};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::config::ExtractionConfig;
use crate::error::Result;
use crate::extraction::document::{attr, ParsedDocument};

/// A block of source code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeBlock {
    /// Language hint from `language-*`/`lang-*` classes or data attributes
    pub language: Option<String>,
    /// The code, with surrounding blank lines removed
    pub code: String,
}

static PRE: LazyLock<Selector> = LazyLock::new(|| parse("pre"));
static CODE: LazyLock<Selector> = LazyLock::new(|| parse("code"));

fn parse(selector: &str) -> Selector {
    Selector::parse(selector).expect("code selectors are valid")
}

/// Code extraction functionality
#[derive(Debug, Clone, Default)]
pub struct CodeExtractor {
    config: ExtractionConfig,
}

impl CodeExtractor {
    /// Create an extractor with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an extractor with a custom configuration
    pub fn with_config(config: ExtractionConfig) -> Self {
        Self { config }
    }

    /// Extract code blocks.
    ///
    /// Every `<pre>` yields a block. Only when a page has no `<pre>` at
    /// all are standalone `<code>` elements considered, and then only
    /// those longer than the inline-code threshold.
    #[instrument(skip_all)]
    pub fn extract(&self, html: &str) -> Result<Vec<CodeBlock>> {
        info!("Extracting code blocks");
        let doc = ParsedDocument::parse(html)?;
        Ok(self.from_document(&doc))
    }

    /// Extract code blocks from an already parsed document
    pub fn from_document(&self, doc: &ParsedDocument) -> Vec<CodeBlock> {
        let html = doc.html();

        let mut blocks: Vec<CodeBlock> = html
            .select(&PRE)
            .filter_map(|pre| {
                let code = pre.select(&CODE).next();
                let text = raw_text(&code.unwrap_or(pre));
                let language = code
                    .as_ref()
                    .and_then(language_of)
                    .or_else(|| language_of(&pre));
                block(language, &text)
            })
            .collect();

        let had_pre = html.select(&PRE).next().is_some();
        if !had_pre {
            let min = self.config.min_inline_code_length;
            blocks = html
                .select(&CODE)
                .filter(|code| raw_text(code).trim().chars().count() > min)
                .filter_map(|code| block(language_of(&code), &raw_text(&code)))
                .collect();
        }

        debug!("Extracted {} code blocks", blocks.len());
        blocks
    }
}

fn raw_text(element: &ElementRef<'_>) -> String {
    element.text().collect()
}

fn block(language: Option<String>, text: &str) -> Option<CodeBlock> {
    let code = text.trim_matches(|c: char| c == '\n' || c == '\r').trim_end();
    if code.trim().is_empty() {
        return None;
    }
    Some(CodeBlock {
        language,
        code: code.to_string(),
    })
}

fn language_of(element: &ElementRef<'_>) -> Option<String> {
    element
        .value()
        .classes()
        .find_map(|class| {
            class
                .strip_prefix("language-")
                .or_else(|| class.strip_prefix("lang-"))
                .filter(|lang| !lang.is_empty())
                .map(str::to_lowercase)
        })
        .or_else(|| attr(element, "data-language"))
        .or_else(|| attr(element, "data-lang"))
        .map(|lang| lang.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn extract(html: &str) -> Vec<CodeBlock> {
        CodeExtractor::new().extract(html).unwrap()
    }

    #[test]
    fn test_pre_with_language_class() {
        let blocks = extract(
            "<pre><code class=\"hljs language-Rust\">\nfn main() {\n    println!(\"hi\");\n}\n</code></pre>",
        );
        assert_eq!(
            blocks,
            vec![CodeBlock {
                language: Some("rust".to_string()),
                code: "fn main() {\n    println!(\"hi\");\n}".to_string(),
            }]
        );
    }

    #[test]
    fn test_language_from_pre_and_data_attribute() {
        let blocks = extract(
            "<pre class='lang-python'>print(1)</pre>\
             <pre data-lang='go'><code>fmt.Println()</code></pre>\
             <pre>plain</pre>",
        );
        let langs: Vec<Option<&str>> = blocks.iter().map(|b| b.language.as_deref()).collect();
        assert_eq!(langs, vec![Some("python"), Some("go"), None]);
    }

    #[test]
    fn test_data_attribute_language_lowercased() {
        let blocks = extract(
            "<pre data-language='Python'>x = 1</pre>\
             <pre data-lang='TypeScript'>let y = 2;</pre>",
        );
        let langs: Vec<Option<&str>> = blocks.iter().map(|b| b.language.as_deref()).collect();
        assert_eq!(langs, vec![Some("python"), Some("typescript")]);
    }

    #[test]
    fn test_empty_pre_skipped() {
        assert!(extract("<pre>\n   \n</pre>").is_empty());
    }

    #[test]
    fn test_inline_code_only_without_pre() {
        let blocks = extract("<p>Run <code>ls</code> or <code>cargo build --release</code>.</p>");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].code, "cargo build --release");

        let blocks = extract(
            "<pre>block()</pre><p><code>cargo build --release</code></p>",
        );
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].code, "block()");
    }

    #[test]
    fn test_inline_threshold_is_strict() {
        // exactly ten characters
        assert!(extract("<p><code>0123456789</code></p>").is_empty());
        assert_eq!(extract("<p><code>0123456789a</code></p>").len(), 1);
    }
}
