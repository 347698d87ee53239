//! In-memory catalog store.
//!
//! Holds the most recently loaded product sequence plus the distinct
//! category labels, replaced wholesale on every feed load. Readers never
//! observe a half-updated catalog: products and categories swap under one
//! write-lock acquisition. Concurrent reloads are last-response-wins.

use std::sync::{Arc, RwLock};

use sheetstall_core::Product;

use crate::config::FeedConfig;
use crate::feed::{self, FeedError};

#[derive(Debug, Default)]
struct CatalogInner {
    products: Arc<Vec<Product>>,
    categories: Arc<Vec<String>>,
}

/// Store for the currently loaded catalog.
#[derive(Debug, Default)]
pub struct CatalogStore {
    inner: RwLock<CatalogInner>,
}

impl CatalogStore {
    /// Create an empty store; the first successful load fills it.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse raw feed text and replace the catalog atomically.
    ///
    /// Returns the distinct non-empty category labels in first-seen order
    /// (also readable later via [`Self::categories`]).
    ///
    /// # Errors
    ///
    /// Returns the parse failure for display; the store keeps its previous
    /// catalog (or stays empty if none was ever loaded).
    pub fn load(&self, raw: &str, config: &FeedConfig) -> Result<Vec<String>, FeedError> {
        let products = feed::parse_feed(raw, config)?;
        Ok(self.install(products))
    }

    /// Replace the catalog wholesale with an already-parsed product list.
    pub fn install(&self, products: Vec<Product>) -> Vec<String> {
        let mut categories: Vec<String> = Vec::new();
        for product in &products {
            if !product.category.is_empty() && !categories.contains(&product.category) {
                categories.push(product.category.clone());
            }
        }

        let mut inner = self.write_lock();
        inner.products = Arc::new(products);
        inner.categories = Arc::new(categories.clone());
        categories
    }

    /// The current product sequence.
    #[must_use]
    pub fn products(&self) -> Arc<Vec<Product>> {
        Arc::clone(&self.read_lock().products)
    }

    /// Distinct non-empty category labels, first-seen order.
    #[must_use]
    pub fn categories(&self) -> Arc<Vec<String>> {
        Arc::clone(&self.read_lock().categories)
    }

    /// Case-insensitive substring search over name, description and
    /// category. An empty term matches everything.
    #[must_use]
    pub fn search(&self, term: &str) -> Vec<Product> {
        self.query(term, "")
    }

    /// Exact-match category filter; an empty category means "all".
    #[must_use]
    pub fn filter_by_category(&self, category: &str) -> Vec<Product> {
        self.query("", category)
    }

    /// Combined search and category filter, as the grid applies them.
    ///
    /// Returns a fresh filtered copy; the stored catalog is never mutated.
    /// Filtering never fails - it only narrows, possibly to zero results.
    #[must_use]
    pub fn query(&self, term: &str, category: &str) -> Vec<Product> {
        self.products()
            .iter()
            .filter(|p| category.is_empty() || p.category == category)
            .filter(|p| p.matches_term(term))
            .cloned()
            .collect()
    }

    /// Product lookup by id, for add-to-cart intents.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<Product> {
        self.products().iter().find(|p| p.id == id).cloned()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read_lock().products.is_empty()
    }

    // Lock poisoning only happens if a writer panicked; the catalog is
    // replaced wholesale, so the value is still coherent. Recover it.
    fn read_lock(&self) -> std::sync::RwLockReadGuard<'_, CatalogInner> {
        self.inner
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn write_lock(&self) -> std::sync::RwLockWriteGuard<'_, CatalogInner> {
        self.inner
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
