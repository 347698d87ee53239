//! Cart state and mutation rules.
//!
//! The cart is an ordered sequence of lines, at most one per product id.
//! Lines carry a redundant name/price/image snapshot taken at add time so a
//! cart restored from storage stays renderable even if the catalog has been
//! reloaded and the product has changed or disappeared.
//!
//! Quantities are clamped to `[MIN_QUANTITY, MAX_QUANTITY]`; invalid input is
//! corrected rather than rejected.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::product::Product;

/// Smallest quantity a line can hold.
pub const MIN_QUANTITY: u32 = 1;

/// Largest quantity a line can hold.
pub const MAX_QUANTITY: u32 = 999;

/// Normalize caller-supplied quantity input.
///
/// Non-positive values correct to [`MIN_QUANTITY`]; oversized values clamp
/// to [`MAX_QUANTITY`].
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
const fn clamp_quantity(quantity: i64) -> u32 {
    if quantity <= 0 {
        MIN_QUANTITY
    } else if quantity >= MAX_QUANTITY as i64 {
        MAX_QUANTITY
    } else {
        quantity as u32
    }
}

/// One product-quantity pairing within the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Product identifier from the catalog the line was added from.
    pub id: String,
    /// Name snapshot at add time.
    pub name: String,
    /// Price snapshot at add time; not re-synced to later catalog changes.
    pub price: Decimal,
    /// Image URL snapshot, possibly empty.
    #[serde(default)]
    pub image: String,
    /// Clamped quantity.
    #[serde(rename = "qty")]
    pub quantity: u32,
}

impl CartLine {
    /// Price times quantity for this line.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Ordered cart line sequence with the mutation rules of the storefront.
///
/// Pure state: persistence belongs to the cart store in the storefront
/// crate. [`Cart::to_json`] / [`Cart::from_json`] define the slot encoding
/// (the bare line sequence, not a wrapper object).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Current lines, in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Read-only copy of the current lines, for rendering or submission.
    #[must_use]
    pub fn snapshot(&self) -> Vec<CartLine> {
        self.lines.clone()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Sum of quantities across all lines (the cart badge count).
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Sum of price times quantity over all lines.
    ///
    /// No rounding; display formatting is the presentation layer's concern.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Add a product to the cart, or increase the quantity of its existing
    /// line.
    ///
    /// Invalid quantity input defaults to 1. An existing line's quantity
    /// grows by the given amount, clamped at [`MAX_QUANTITY`]; a new line
    /// takes a price snapshot from `product.price` at call time.
    pub fn add_or_increment(&mut self, product: &Product, quantity: i64) {
        let quantity = clamp_quantity(quantity);

        if let Some(line) = self.lines.iter_mut().find(|l| l.id == product.id) {
            line.quantity = line.quantity.saturating_add(quantity).min(MAX_QUANTITY);
            return;
        }

        self.lines.push(CartLine {
            id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            image: product.image.clone(),
            quantity,
        });
    }

    /// Set the quantity of an existing line, clamped to
    /// `[MIN_QUANTITY, MAX_QUANTITY]`. Unknown ids are a no-op.
    pub fn set_quantity(&mut self, id: &str, quantity: i64) {
        if let Some(line) = self.lines.iter_mut().find(|l| l.id == id) {
            line.quantity = clamp_quantity(quantity);
        }
    }

    /// Remove the line for `id`. Removing a non-existent id is a no-op.
    pub fn remove(&mut self, id: &str) {
        self.lines.retain(|l| l.id != id);
    }

    /// Empty the cart (after a successful checkout).
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Encode the line sequence for the persistence slot.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.lines)
    }

    /// Decode a cart from the persistence slot encoding.
    ///
    /// # Errors
    ///
    /// Returns an error if `raw` is not a valid line sequence. Callers treat
    /// this as a missing slot and start empty.
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        let lines: Vec<CartLine> = serde_json::from_str(raw)?;
        Ok(Self { lines })
    }
}
