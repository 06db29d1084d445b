//! Detail page extraction
//!
//! Turns a bulletin detail page into its ordered approval records. The
//! channel's [`ChannelLayout`] decides which table to read, how many cells a
//! row must have and which field each cell feeds; this module contains no
//! per-channel branches.

use crate::channel::{CatalogSource, ChannelLayout, Field};
use crate::record::{Content, ContentStub, Item};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use thiserror::Error;

/// Inline script assignment carrying the catalog of a row.
///
/// Grammar: `var _sblb = '<value>';`, the value never contains `'`.
static CATALOG_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"var _sblb = '([^']*)';").expect("hardcoded regex pattern is valid")
});

/// Structural extraction failures; none of them are retried
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Layout error: {0}")]
    Layout(String),

    #[error("Row {row} has {found} cells, expected {expected}")]
    FieldCount {
        row: usize,
        found: usize,
        expected: String,
    },

    #[error("Catalog not found in row {row}")]
    CatalogNotFound { row: usize },
}

/// Hydrates a stub with the records of its detail page
pub fn extract(body: &[u8], stub: ContentStub) -> Result<Content, ExtractError> {
    let html = String::from_utf8_lossy(body);
    let items = extract_items(&html, stub.channel.layout())?;
    Ok(Content::from_stub(stub, items))
}

/// Extracts the approval records of a detail page
///
/// The first table row is the header. Any data row whose cell count is
/// outside the layout's accepted counts fails the whole page.
pub fn extract_items(html: &str, layout: &ChannelLayout) -> Result<Vec<Item>, ExtractError> {
    let document = Html::parse_document(html);
    let table_selector = parse_selector(layout.table_selector)?;
    let row_selector = parse_selector("tr")?;
    let script_selector = parse_selector("script")?;

    let table = document.select(&table_selector).next().ok_or_else(|| {
        ExtractError::Layout(format!(
            "table '{}' not found for channel {}",
            layout.table_selector, layout.channel
        ))
    })?;

    let mut items = Vec::new();
    for (index, row) in table.select(&row_selector).skip(1).enumerate() {
        let row_number = index + 1;
        let cells: Vec<ElementRef<'_>> = row
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|cell| cell.value().name() == "td")
            .collect();

        let fields = layout
            .fields_for(cells.len())
            .ok_or_else(|| ExtractError::FieldCount {
                row: row_number,
                found: cells.len(),
                expected: layout.expected_columns(),
            })?;

        let mut item = Item::default();
        for (field, cell) in fields.into_iter().zip(cells) {
            debug_assert!(layout.defines(field));
            let text = visible_text(cell).trim().to_string();
            if field == Field::Catalog && layout.catalog == CatalogSource::Script {
                let catalog = match row.select(&script_selector).next() {
                    Some(script) => extract_catalog(&script.text().collect::<String>()),
                    None => Some(text).filter(|t| !t.is_empty()),
                };
                let catalog = catalog.ok_or(ExtractError::CatalogNotFound { row: row_number })?;
                item.set(field, catalog);
            } else {
                item.set(field, text);
            }
        }
        items.push(item);
    }

    Ok(items)
}

/// Reads the catalog out of a row's inline script
///
/// Line breaks are removed before matching, so an assignment wrapped across
/// lines still matches.
pub fn extract_catalog(script: &str) -> Option<String> {
    let flattened = script.replace(['\n', '\r'], "");
    CATALOG_PATTERN
        .captures(&flattened)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}

/// Text content of an element without script or style bodies
fn visible_text(element: ElementRef<'_>) -> String {
    element
        .descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let hidden = node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|e| matches!(e.name(), "script" | "style"))
            });
            (!hidden).then(|| text.to_string())
        })
        .collect()
}

fn parse_selector(selector: &str) -> Result<Selector, ExtractError> {
    Selector::parse(selector)
        .map_err(|e| ExtractError::Layout(format!("invalid selector '{}': {:?}", selector, e)))
}
