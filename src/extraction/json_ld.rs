//! JSON-LD structured data
//!
//! Each `<script type="application/ld+json">` block is parsed on its own;
//! a malformed block is dropped without affecting the others.

use std::sync::LazyLock;

use scraper::{Html, Selector};
use serde_json::{Map, Value};
use tracing::debug;

static LD_JSON: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"script[type*="ld+json"]"#).expect("json-ld selector is valid")
});

/// Parse every JSON-LD block in the document.
///
/// Top-level arrays are flattened so each entry is one JSON-LD node.
pub fn parse_blocks(html: &Html) -> Vec<Value> {
    html.select(&LD_JSON)
        .filter_map(|script| parse_block(&script.text().collect::<String>()))
        .flat_map(|value| match value {
            Value::Array(items) => items,
            other => vec![other],
        })
        .collect()
}

/// Parse a single block, `None` if it is empty or not valid JSON
pub fn parse_block(raw: &str) -> Option<Value> {
    let body = strip_wrappers(raw);
    if body.is_empty() {
        return None;
    }
    match serde_json::from_str(body) {
        Ok(value) => Some(value),
        Err(e) => {
            debug!("Skipping malformed JSON-LD block: {}", e);
            None
        }
    }
}

fn strip_wrappers(raw: &str) -> &str {
    let mut body = raw.trim();
    for (open, close) in [("<!--", "-->"), ("//<![CDATA[", "//]]>"), ("<![CDATA[", "]]>")] {
        if let Some(inner) = body.strip_prefix(open) {
            body = inner.strip_suffix(close).unwrap_or(inner).trim();
        }
    }
    body
}

/// Every JSON object in `data`, including members of `@graph` arrays
fn objects(data: &[Value]) -> impl Iterator<Item = &Map<String, Value>> {
    data.iter().flat_map(|value| {
        let mut found = Vec::new();
        if let Value::Object(obj) = value {
            found.push(obj);
            if let Some(Value::Array(graph)) = obj.get("@graph") {
                found.extend(graph.iter().filter_map(Value::as_object));
            }
        }
        found
    })
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// A plain string, a `{ "<field>": ... }` object, or the first usable
/// entry of an array
fn text_of(value: &Value, field: &str) -> Option<String> {
    match value {
        Value::String(s) => non_empty(s),
        Value::Object(obj) => obj.get(field).and_then(|v| text_of(v, field)),
        Value::Array(items) => items.iter().find_map(|v| text_of(v, field)),
        _ => None,
    }
}

/// First string value stored under `key`
pub fn find_str(data: &[Value], key: &str) -> Option<String> {
    objects(data).find_map(|obj| obj.get(key).and_then(Value::as_str).and_then(non_empty))
}

/// First name stored under `key` (`"author": "Ann"` or `"author": {"name": "Ann"}`)
pub fn find_name(data: &[Value], key: &str) -> Option<String> {
    objects(data).find_map(|obj| obj.get(key).and_then(|v| text_of(v, "name")))
}

/// First image URL (`"image": "..."` or `"image": {"url": "..."}`)
pub fn find_image(data: &[Value]) -> Option<String> {
    objects(data).find_map(|obj| obj.get("image").and_then(|v| text_of(v, "url")))
}

/// First `@type`
pub fn find_type(data: &[Value]) -> Option<String> {
    objects(data).find_map(|obj| obj.get("@type").and_then(|v| text_of(v, "@type")))
}

/// Keywords as a list (comma-separated string or array)
pub fn find_keywords(data: &[Value]) -> Vec<String> {
    objects(data)
        .find_map(|obj| match obj.get("keywords") {
            Some(Value::String(s)) => Some(
                s.split(',')
                    .filter_map(non_empty)
                    .collect::<Vec<_>>(),
            ),
            Some(Value::Array(items)) => Some(
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .filter_map(non_empty)
                    .collect(),
            ),
            _ => None,
        })
        .unwrap_or_default()
}
