//! Catalog product record.
//!
//! Products are produced by the feed parser and held by the catalog store.
//! The catalog is replaced wholesale on every feed load, so products are
//! immutable once constructed.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Display name used when the feed omits a product name.
pub const FALLBACK_NAME: &str = "Unnamed";

/// A single catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier. Feeds that omit one get a generated id.
    pub id: String,
    /// Display name, never empty (see [`FALLBACK_NAME`]).
    pub name: String,
    /// Category label, possibly empty.
    pub category: String,
    /// Non-negative price; parse failures resolve to zero.
    pub price: Decimal,
    /// Description text, possibly empty.
    pub description: String,
    /// Image URL, possibly empty.
    pub image: String,
}

impl Product {
    /// Generate a fallback identifier for feed rows without one.
    ///
    /// Random (UUID v4) rather than positional so ids assigned during one
    /// load do not collide with ids assigned during a partial reload.
    #[must_use]
    pub fn fallback_id() -> String {
        Uuid::new_v4().to_string()
    }

    /// Case-insensitive substring match against name, description and
    /// category. An empty term matches every product.
    #[must_use]
    pub fn matches_term(&self, term: &str) -> bool {
        if term.is_empty() {
            return true;
        }
        let term = term.to_lowercase();
        self.name.to_lowercase().contains(&term)
            || self.description.to_lowercase().contains(&term)
            || self.category.to_lowercase().contains(&term)
    }
}
