//! Table extraction
//!
//! Converts `<table>` elements into header and row text. Only rows that
//! belong to the table itself are read; nested tables are reported on
//! their own.

use std::sync::LazyLock;

use scraper::{ElementRef, Selector};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::error::Result;
use crate::extraction::document::{visible_text, ParsedDocument};

/// A table as header and row text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableData {
    /// Column headers
    pub headers: Vec<String>,
    /// Data rows; a row may be shorter or longer than `headers`
    pub rows: Vec<Vec<String>>,
}

static TABLES: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table").expect("table selector is valid"));

/// Table extraction functionality
pub struct TableExtractor;

impl TableExtractor {
    /// Extract every non-empty table in document order
    #[instrument(skip(html))]
    pub fn extract(html: &str) -> Result<Vec<TableData>> {
        info!("Extracting tables");
        let doc = ParsedDocument::parse(html)?;
        Ok(Self::from_document(&doc))
    }

    /// Extract tables from an already parsed document
    pub fn from_document(doc: &ParsedDocument) -> Vec<TableData> {
        let tables: Vec<TableData> = doc
            .html()
            .select(&TABLES)
            .filter_map(|table| read_table(&table))
            .collect();
        debug!("Extracted {} tables", tables.len());
        tables
    }
}

fn child_elements<'a>(element: &ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    element.children().filter_map(ElementRef::wrap)
}

/// A table row with the section it sits in
struct Row<'a> {
    in_thead: bool,
    element: ElementRef<'a>,
}

fn own_rows<'a>(table: &ElementRef<'a>) -> Vec<Row<'a>> {
    let mut rows = Vec::new();
    for child in child_elements(table) {
        match child.value().name() {
            "tr" => rows.push(Row {
                in_thead: false,
                element: child,
            }),
            section @ ("thead" | "tbody" | "tfoot") => {
                for tr in child_elements(&child).filter(|el| el.value().name() == "tr") {
                    rows.push(Row {
                        in_thead: section == "thead",
                        element: tr,
                    });
                }
            }
            _ => {}
        }
    }
    rows
}

fn cells(row: &ElementRef<'_>, tags: &[&str]) -> Vec<String> {
    child_elements(row)
        .filter(|cell| tags.contains(&cell.value().name()))
        .map(|cell| visible_text(&cell))
        .collect()
}

fn read_table(table: &ElementRef<'_>) -> Option<TableData> {
    let rows = own_rows(table);

    let (headers, body): (Vec<String>, Vec<&Row<'_>>) =
        match rows.iter().find(|row| row.in_thead) {
            Some(head) => (
                cells(&head.element, &["th", "td"]),
                rows.iter().filter(|row| !row.in_thead).collect(),
            ),
            None => match rows.first() {
                Some(first) => {
                    let th = cells(&first.element, &["th"]);
                    let headers = if th.is_empty() {
                        cells(&first.element, &["td"])
                    } else {
                        th
                    };
                    (headers, rows.iter().skip(1).collect())
                }
                None => (Vec::new(), Vec::new()),
            },
        };

    let data: Vec<Vec<String>> = body
        .iter()
        .map(|row| cells(&row.element, &["td"]))
        .filter(|cells| !cells.is_empty())
        .collect();

    if headers.is_empty() && data.is_empty() {
        return None;
    }
    Some(TableData {
        headers,
        rows: data,
    })
}
