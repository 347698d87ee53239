//! Storefront page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use crate::filters;
use crate::routes::cart::CartView;
use crate::routes::products::{GridView, ProductCardView};
use crate::state::AppState;

/// Storefront page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    /// Unfiltered product grid.
    pub grid: GridView,
    /// Cart panel state.
    pub cart: CartView,
    /// Discovered category labels for the filter selector.
    pub categories: Vec<String>,
    /// Cart badge count.
    pub count: u32,
    /// Whether an order endpoint is configured.
    pub checkout_enabled: bool,
}

/// Display the storefront page.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> impl IntoResponse {
    let products = state
        .catalog()
        .products()
        .iter()
        .map(ProductCardView::from)
        .collect();

    HomeTemplate {
        grid: GridView {
            products,
            error: None,
        },
        cart: CartView::from_store(state.cart()),
        categories: state.catalog().categories().as_ref().clone(),
        count: state.cart().total_quantity(),
        checkout_enabled: state.config().order.url.is_some(),
    }
}
