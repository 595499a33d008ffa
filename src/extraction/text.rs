//! Text formatting and normalization
//!
//! Linearizes a DOM subtree into paragraph-structured plain text, then
//! cleans it: mis-encoded sequences are repaired, control and invisible
//! characters are dropped and whitespace is collapsed.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Node};

/// UTF-8 text that was decoded as Windows-1252/Latin-1, mapped back to
/// what the author wrote. Longer sequences come first.
pub const MOJIBAKE_REPAIRS: &[(&str, &str)] = &[
    ("\u{e2}\u{20ac}\u{2122}", "'"),
    ("\u{e2}\u{20ac}\u{2dc}", "'"),
    ("\u{e2}\u{20ac}\u{153}", "\""),
    ("\u{e2}\u{20ac}\u{9d}", "\""),
    ("\u{e2}\u{20ac}\u{201d}", "\u{2014}"),
    ("\u{e2}\u{20ac}\u{201c}", "\u{2013}"),
    ("\u{e2}\u{20ac}\u{a6}", "\u{2026}"),
    ("\u{e2}\u{20ac}\u{a2}", "\u{2022}"),
    ("\u{c3}\u{2030}", "\u{c9}"),
    ("\u{c3}\u{a9}", "\u{e9}"),
    ("\u{c3}\u{a8}", "\u{e8}"),
    ("\u{c3}\u{aa}", "\u{ea}"),
    ("\u{c3}\u{ab}", "\u{eb}"),
    ("\u{c3}\u{a1}", "\u{e1}"),
    ("\u{c3}\u{a2}", "\u{e2}"),
    ("\u{c3}\u{a4}", "\u{e4}"),
    ("\u{c3}\u{a7}", "\u{e7}"),
    ("\u{c3}\u{ad}", "\u{ed}"),
    ("\u{c3}\u{ae}", "\u{ee}"),
    ("\u{c3}\u{af}", "\u{ef}"),
    ("\u{c3}\u{b1}", "\u{f1}"),
    ("\u{c3}\u{b3}", "\u{f3}"),
    ("\u{c3}\u{b4}", "\u{f4}"),
    ("\u{c3}\u{b6}", "\u{f6}"),
    ("\u{c3}\u{ba}", "\u{fa}"),
    ("\u{c3}\u{bc}", "\u{fc}"),
    ("\u{c3}\u{a0}", "\u{e0}"),
    ("\u{c2}\u{a9}", "\u{a9}"),
    ("\u{c2}\u{ae}", "\u{ae}"),
    ("\u{c2}\u{b0}", "\u{b0}"),
    ("\u{c2}\u{a3}", "\u{a3}"),
    ("\u{c2}\u{a0}", " "),
];

static INLINE_WS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\S\n]+").expect("inline whitespace pattern is valid"));
static SPACE_AROUND_NEWLINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" *\n *").expect("newline padding pattern is valid"));
static EXCESS_NEWLINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("newline run pattern is valid"));
static ANY_WS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Linearize `element` into normalized text.
///
/// Reads the subtree without modifying it.
pub fn format_text(element: &ElementRef<'_>) -> String {
    let mut out = String::new();
    write_element(*element, &mut out, false);
    normalize_text(&out)
}

fn block_break(tag: &str) -> usize {
    match tag {
        "p" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => 2,
        "div" | "blockquote" | "pre" | "ul" | "ol" | "dl" | "section" | "article" | "main"
        | "table" | "tr" | "figure" | "figcaption" | "dt" | "dd" | "li" => 1,
        _ => 0,
    }
}

/// Make `out` end with at least `newlines` line breaks
fn push_break(out: &mut String, newlines: usize) {
    if newlines == 0 {
        return;
    }
    while out.ends_with(' ') {
        out.pop();
    }
    if out.is_empty() {
        return;
    }
    let present = out.chars().rev().take_while(|c| *c == '\n').count();
    for _ in present..newlines {
        out.push('\n');
    }
}

fn write_element(element: ElementRef<'_>, out: &mut String, in_pre: bool) {
    let tag = element.value().name();
    match tag {
        "script" | "style" | "noscript" | "template" => return,
        "br" => {
            out.push('\n');
            return;
        }
        "hr" => {
            push_break(out, 2);
            return;
        }
        _ => {}
    }

    let brk = block_break(tag);
    let in_pre = in_pre || tag == "pre";
    push_break(out, brk);

    match tag {
        "li" => {
            let mut item = String::new();
            write_children(element, &mut item, in_pre);
            out.push_str("\u{2022} ");
            out.push_str(item.trim_start());
        }
        "td" | "th" => {
            out.push(' ');
            write_children(element, out, in_pre);
            out.push(' ');
        }
        _ => write_children(element, out, in_pre),
    }

    push_break(out, brk);
}

fn write_children(element: ElementRef<'_>, out: &mut String, in_pre: bool) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                if in_pre {
                    out.push_str(text);
                } else {
                    out.push_str(&ANY_WS.replace_all(text, " "));
                }
            }
            Node::Element(_) => {
                if let Some(child) = ElementRef::wrap(child) {
                    write_element(child, out, in_pre);
                }
            }
            _ => {}
        }
    }
}

/// Repair known mis-encodings in `text`
pub fn repair_mojibake(text: &str) -> String {
    let mut repaired = text.to_string();
    for (broken, fixed) in MOJIBAKE_REPAIRS {
        if repaired.contains(broken) {
            repaired = repaired.replace(broken, fixed);
        }
    }
    repaired
}

fn is_stripped(c: char) -> bool {
    match c {
        '\n' => false,
        '\u{0}'..='\u{1f}' | '\u{7f}'..='\u{9f}' => true,
        '\u{fffd}' | '\u{feff}' | '\u{200b}'..='\u{200d}' | '\u{2060}' => true,
        _ => false,
    }
}

/// Clean raw text: repair mis-encodings, drop control/invisible
/// characters, collapse whitespace and blank-line runs, trim.
///
/// The result never contains control characters (other than `\n`) or
/// U+FFFD.
pub fn normalize_text(text: &str) -> String {
    let repaired = repair_mojibake(text);

    let cleaned: String = repaired
        .replace("\r\n", "\n")
        .chars()
        .map(|c| match c {
            '\r' => '\n',
            '\t' | '\u{a0}' => ' ',
            other => other,
        })
        .filter(|c| !is_stripped(*c))
        .collect();

    let collapsed = INLINE_WS.replace_all(&cleaned, " ");
    let trimmed_lines = SPACE_AROUND_NEWLINE.replace_all(&collapsed, "\n");
    let paragraphs = EXCESS_NEWLINES.replace_all(&trimmed_lines, "\n\n");

    paragraphs.trim().to_string()
}

/// Number of words in `text`
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Number of non-empty paragraphs (blocks separated by a blank line)
pub fn paragraph_count(text: &str) -> usize {
    text.split("\n\n").filter(|p| !p.trim().is_empty()).count()
}
