//! Application state shared across handlers.

use std::sync::Arc;

use crate::cart::CartStore;
use crate::catalog::CatalogStore;
use crate::config::StorefrontConfig;
use crate::feed::{FeedClient, FeedError};
use crate::orders::OrderClient;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. The stores are constructed
/// here with explicit initial state (the cart restored from its slot, the
/// catalog empty until the first load) and handed to the presentation layer
/// by reference; they know nothing about the routes rendering them.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: CatalogStore,
    cart: CartStore,
    feed: FeedClient,
    orders: OrderClient,
}

impl AppState {
    /// Create the application state from configuration.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let catalog = CatalogStore::new();
        let cart = CartStore::open(&config.cart_path);
        let feed = FeedClient::new(&config.feed);
        let orders = OrderClient::new(&config.order);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                cart,
                feed,
                orders,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog store.
    #[must_use]
    pub fn catalog(&self) -> &CatalogStore {
        &self.inner.catalog
    }

    /// Get a reference to the cart store.
    #[must_use]
    pub fn cart(&self) -> &CartStore {
        &self.inner.cart
    }

    /// Get a reference to the feed client.
    #[must_use]
    pub fn feed(&self) -> &FeedClient {
        &self.inner.feed
    }

    /// Get a reference to the order client.
    #[must_use]
    pub fn orders(&self) -> &OrderClient {
        &self.inner.orders
    }

    /// Fetch the feed and replace the catalog.
    ///
    /// Returns the discovered category labels. On failure the previous
    /// catalog (or the empty initial one) is retained.
    ///
    /// # Errors
    ///
    /// Returns the fetch or parse failure for display.
    pub async fn reload_catalog(&self) -> Result<Vec<String>, FeedError> {
        let raw = self.feed().fetch().await?;
        self.catalog().load(&raw, &self.config().feed)
    }
}
