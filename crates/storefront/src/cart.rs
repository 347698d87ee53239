//! Cart store with a durable slot on disk.
//!
//! The store owns the in-memory [`Cart`] and mirrors it into a single named
//! JSON file after every mutation. The lock is held across the in-memory
//! update and the write, so exposed operations never interleave.
//!
//! Persistence is advisory: a failed write is logged as a warning and the
//! in-memory cart stays authoritative for the session. A missing or corrupt
//! slot at startup self-heals to an empty cart.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use rust_decimal::Decimal;
use tracing::{debug, warn};

use sheetstall_core::{Cart, CartLine, Product};

/// Store owning the cart and its persistence slot.
#[derive(Debug)]
pub struct CartStore {
    path: PathBuf,
    cart: Mutex<Cart>,
}

impl CartStore {
    /// Open the store, restoring the persisted cart.
    ///
    /// An absent, unreadable or unparsable slot yields an empty cart;
    /// corruption is never fatal.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let cart = restore(&path);
        Self {
            path,
            cart: Mutex::new(cart),
        }
    }

    /// Add a product or increase its line quantity, then persist.
    pub fn add_or_increment(&self, product: &Product, quantity: i64) {
        self.mutate(|cart| cart.add_or_increment(product, quantity));
    }

    /// Set a line's quantity (clamped), then persist.
    pub fn set_quantity(&self, id: &str, quantity: i64) {
        self.mutate(|cart| cart.set_quantity(id, quantity));
    }

    /// Remove a line, then persist. Unknown ids are a no-op.
    pub fn remove(&self, id: &str) {
        self.mutate(|cart| cart.remove(id));
    }

    /// Empty the cart, then persist. Used after successful checkout.
    pub fn clear(&self) {
        self.mutate(Cart::clear);
    }

    /// Read-only copy of the current lines.
    #[must_use]
    pub fn snapshot(&self) -> Vec<CartLine> {
        self.lock().snapshot()
    }

    /// Sum of price times quantity over all lines.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.lock().subtotal()
    }

    /// Sum of quantities, for the cart badge.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.lock().total_quantity()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Apply one mutation and mirror the result to the slot before the
    /// lock is released.
    fn mutate(&self, op: impl FnOnce(&mut Cart)) {
        let mut cart = self.lock();
        op(&mut cart);
        persist(&self.path, &cart);
    }

    // The cart is a plain value; a poisoned lock still holds a coherent
    // cart, so recover it rather than propagate the panic.
    fn lock(&self) -> MutexGuard<'_, Cart> {
        self.cart.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Restore the cart from the slot at startup.
fn restore(path: &Path) -> Cart {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no persisted cart, starting empty");
            return Cart::new();
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to read persisted cart, starting empty");
            return Cart::new();
        }
    };

    Cart::from_json(&raw).unwrap_or_else(|e| {
        warn!(path = %path.display(), error = %e, "persisted cart is corrupt, starting empty");
        Cart::new()
    })
}

/// Write the full cart state to the slot. Failures are non-fatal.
fn persist(path: &Path, cart: &Cart) {
    let json = match cart.to_json() {
        Ok(json) => json,
        Err(e) => {
            warn!(error = %e, "failed to encode cart, skipping persistence");
            return;
        }
    };

    if let Err(e) = fs::write(path, json) {
        warn!(path = %path.display(), error = %e, "failed to persist cart, in-memory state kept");
    }
}
