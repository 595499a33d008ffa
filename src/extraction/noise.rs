//! Noise filtering
//!
//! Removes structural, advertising and tracking elements from a working
//! copy of the document before any scoring happens.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

/// Elements that never carry main content
pub const NOISE_SELECTORS: &[&str] = &[
    "script",
    "style",
    "noscript",
    "iframe",
    "nav",
    "aside",
    "[hidden]",
    r#"[aria-hidden="true"]"#,
    // Advertising
    r#"[class*="advert"]"#,
    r#"[id*="advert"]"#,
    r#"[class^="ad-"]"#,
    r#"[class*=" ad-"]"#,
    r#"[id^="ad-"]"#,
    r#"[class~="ad"]"#,
    r#"[class~="ads"]"#,
    r#"[id="ad"]"#,
    r#"[id="ads"]"#,
    // Consent banners and overlays
    r#"[class*="cookie"]"#,
    r#"[id*="cookie"]"#,
    r#"[class*="popup"]"#,
    r#"[id*="popup"]"#,
    r#"[class*="modal"]"#,
    r#"[id*="modal"]"#,
    r#"[class*="newsletter"]"#,
    r#"[id*="newsletter"]"#,
];

/// Removed only when they are not part of an `<article>`
pub const PAGE_CHROME_SELECTORS: &[&str] = &["header", "footer"];

static NOISE: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(&NOISE_SELECTORS.join(", ")).expect("noise selectors are valid")
});

static PAGE_CHROME: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(&PAGE_CHROME_SELECTORS.join(", ")).expect("chrome selectors are valid")
});

/// Detach every noise element from `html`, returning how many were removed.
///
/// Mutates `html` in place; callers pass a clone (see
/// [`ParsedDocument::without_noise`](crate::extraction::ParsedDocument::without_noise)).
pub fn remove_noise(html: &mut Html) -> usize {
    let ids: Vec<_> = html
        .select(&NOISE)
        .filter(|el| !is_document_skeleton(el))
        .chain(html.select(&PAGE_CHROME).filter(|el| !inside_article(el)))
        .map(|el| el.id())
        .collect();

    let mut removed = 0;
    for id in ids {
        if let Some(mut node) = html.tree.get_mut(id) {
            node.detach();
            removed += 1;
        }
    }

    debug!("Removed {} noise elements", removed);
    removed
}

fn is_document_skeleton(element: &ElementRef<'_>) -> bool {
    matches!(element.value().name(), "html" | "head" | "body")
}

fn inside_article(element: &ElementRef<'_>) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| ancestor.value().name() == "article")
}
