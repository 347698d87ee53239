//! Product grid route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use sheetstall_core::Product;

use crate::state::AppState;

/// Product display data for templates.
#[derive(Clone)]
pub struct ProductCardView {
    pub id: String,
    pub name: String,
    pub category: String,
    pub description: String,
    /// Formatted price; zero-priced products show none, like the sheet rows
    /// that carry no price at all.
    pub price: Option<String>,
    pub image: String,
}

/// Grid display data: the filtered products plus an optional load failure.
#[derive(Clone)]
pub struct GridView {
    pub products: Vec<ProductCardView>,
    pub error: Option<String>,
}

/// Format a price for display.
fn format_price(price: &Decimal) -> String {
    format!("${price:.2}")
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            category: product.category.clone(),
            description: product.description.clone(),
            price: if product.price.is_zero() {
                None
            } else {
                Some(format_price(&product.price))
            },
            image: product.image.clone(),
        }
    }
}

impl GridView {
    /// Current catalog state filtered by term and category.
    fn query(state: &AppState, term: &str, category: &str) -> Self {
        Self {
            products: state
                .catalog()
                .query(term, category)
                .iter()
                .map(ProductCardView::from)
                .collect(),
            error: None,
        }
    }
}

/// Search and filter query parameters.
#[derive(Debug, Deserialize)]
pub struct GridQuery {
    pub q: Option<String>,
    pub category: Option<String>,
}

/// Product grid fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/product_grid.html")]
pub struct ProductGridTemplate {
    pub grid: GridView,
}

/// Display the filtered product grid fragment.
///
/// Filtering never errors; an unmatched term simply narrows to zero
/// results.
#[instrument(skip(state))]
pub async fn grid(
    State(state): State<AppState>,
    Query(query): Query<GridQuery>,
) -> impl IntoResponse {
    let term = query.q.unwrap_or_default();
    let category = query.category.unwrap_or_default();

    ProductGridTemplate {
        grid: GridView::query(&state, term.trim(), &category),
    }
}

/// Re-fetch the feed and replace the catalog (HTMX).
///
/// On failure the previous catalog is retained and the grid renders with a
/// visible failure message.
#[instrument(skip(state))]
pub async fn refresh(State(state): State<AppState>) -> impl IntoResponse {
    match state.reload_catalog().await {
        Ok(categories) => {
            tracing::info!(
                products = state.catalog().products().len(),
                categories = categories.len(),
                "catalog reloaded"
            );
            ProductGridTemplate {
                grid: GridView::query(&state, "", ""),
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "catalog refresh failed, keeping previous catalog");
            let mut grid = GridView::query(&state, "", "");
            grid.error = Some("Failed to load products.".to_string());
            ProductGridTemplate { grid }
        }
    }
}
