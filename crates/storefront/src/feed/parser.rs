//! Pure feed-text-to-product transform.
//!
//! The feed arrives as gviz-framed JSON: a fixed-length prefix (a comment
//! plus the `setResponse(` call) and a `);` suffix around the document. The
//! first row of the table is a header and is discarded; every remaining row
//! maps to exactly one product via the configured [`ColumnMap`].

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use sheetstall_core::Product;
use sheetstall_core::types::product::FALLBACK_NAME;

use super::columns::{ColumnMap, Field};
use super::FeedError;
use crate::config::FeedConfig;

// The gviz document, reduced to the parts the storefront reads. Unknown
// fields (version, status, column metadata) are ignored.
#[derive(Debug, Deserialize)]
struct GvizDocument {
    table: GvizTable,
}

#[derive(Debug, Deserialize)]
struct GvizTable {
    #[serde(default)]
    rows: Vec<GvizRow>,
}

#[derive(Debug, Deserialize)]
struct GvizRow {
    #[serde(default)]
    c: Vec<Option<GvizCell>>,
}

#[derive(Debug, Deserialize)]
struct GvizCell {
    #[serde(default)]
    v: Value,
}

/// Parse raw feed text into products.
///
/// Pure transform: the caller decides how to install the result into the
/// catalog store.
///
/// # Errors
///
/// Returns [`FeedError::Wrapper`] if the response is shorter than its
/// fixed-length framing, or [`FeedError::Json`] if the framed payload is
/// not a valid gviz document.
pub fn parse_feed(raw: &str, config: &FeedConfig) -> Result<Vec<Product>, FeedError> {
    let body = strip_wrapper(raw, config.prefix_len, config.suffix_len)?;
    let doc: GvizDocument = serde_json::from_str(body)?;

    // First row is the sheet header.
    Ok(doc
        .table
        .rows
        .iter()
        .skip(1)
        .map(|row| product_from_row(row, &config.columns))
        .collect())
}

/// Strip the fixed-length wrapper off the response text.
fn strip_wrapper(raw: &str, prefix_len: usize, suffix_len: usize) -> Result<&str, FeedError> {
    let wrapper = prefix_len + suffix_len;
    if raw.len() < wrapper {
        return Err(FeedError::Wrapper {
            len: raw.len(),
            wrapper,
        });
    }
    raw.get(prefix_len..raw.len() - suffix_len)
        .ok_or(FeedError::Wrapper {
            len: raw.len(),
            wrapper,
        })
}

/// Map one gviz row onto a product, applying the fallback rules.
fn product_from_row(row: &GvizRow, columns: &ColumnMap) -> Product {
    let id_text = cell_text(row, columns.position(Field::Id));
    let name_text = cell_text(row, columns.position(Field::Name));

    // A sheet without a name column still labels products by their id;
    // only rows carrying neither get the fallback label.
    let name = name_text
        .or_else(|| id_text.clone())
        .unwrap_or_else(|| FALLBACK_NAME.to_string());
    let id = id_text.unwrap_or_else(Product::fallback_id);

    Product {
        id,
        name,
        category: cell_text(row, columns.position(Field::Category)).unwrap_or_default(),
        price: cell_price(row, columns.position(Field::Price)),
        description: cell_text(row, columns.position(Field::Description)).unwrap_or_default(),
        image: cell_text(row, columns.position(Field::Image)).unwrap_or_default(),
    }
}

/// Text content of the cell at `position`, if the row carries one.
///
/// Numbers stringify (sheets often hold ids as numbers); empty and
/// whitespace-only strings count as missing.
fn cell_text(row: &GvizRow, position: Option<usize>) -> Option<String> {
    let cell = row.c.get(position?)?.as_ref()?;
    let text = match &cell.v {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    if text.is_empty() { None } else { Some(text) }
}

/// Price of the row; missing or non-numeric cells resolve to zero, and
/// negative values clamp to zero.
fn cell_price(row: &GvizRow, position: Option<usize>) -> Decimal {
    cell_text(row, position)
        .and_then(|text| text.parse::<Decimal>().ok())
        .unwrap_or(Decimal::ZERO)
        .max(Decimal::ZERO)
}
