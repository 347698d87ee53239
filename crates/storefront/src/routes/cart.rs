//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! Every mutation response carries an `HX-Trigger: cart-updated` header so
//! the other cart fragments on the page refresh themselves.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use sheetstall_core::CartLine;

use crate::cart::CartStore;
use crate::error::AppError;
use crate::state::AppState;

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartLineView {
    pub id: String,
    pub name: String,
    pub quantity: u32,
    pub price: String,
    pub line_total: String,
    pub image: String,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub subtotal: String,
    pub count: u32,
}

impl CartView {
    /// Render the store's current snapshot.
    #[must_use]
    pub fn from_store(store: &CartStore) -> Self {
        let lines: Vec<CartLineView> = store.snapshot().iter().map(CartLineView::from).collect();
        Self {
            lines,
            subtotal: format_price(&store.subtotal()),
            count: store.total_quantity(),
        }
    }
}

/// Format a price for display.
fn format_price(price: &Decimal) -> String {
    format!("${price:.2}")
}

impl From<&CartLine> for CartLineView {
    fn from(line: &CartLine) -> Self {
        Self {
            id: line.id.clone(),
            name: line.name.clone(),
            quantity: line.quantity,
            price: format_price(&line.price),
            line_total: format_price(&line.line_total()),
            image: line.image.clone(),
        }
    }
}

// =============================================================================
// Forms
// =============================================================================

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub id: String,
    pub quantity: Option<String>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub id: String,
    pub quantity: Option<String>,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub id: String,
}

/// Parse a quantity field leniently; the store clamps further.
fn parse_quantity(raw: Option<&str>) -> i64 {
    raw.and_then(|s| s.trim().parse::<i64>().ok()).unwrap_or(1)
}

// =============================================================================
// Templates
// =============================================================================

/// Cart panel fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_panel.html")]
pub struct CartPanelTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the cart panel fragment.
#[instrument(skip(state))]
pub async fn panel(State(state): State<AppState>) -> impl IntoResponse {
    CartPanelTemplate {
        cart: CartView::from_store(state.cart()),
    }
}

/// Get the cart count badge fragment.
#[instrument(skip(state))]
pub async fn count(State(state): State<AppState>) -> impl IntoResponse {
    CartCountTemplate {
        count: state.cart().total_quantity(),
    }
}

/// Add an item to the cart (HTMX).
///
/// Looks the product up in the current catalog so the line gets its price
/// snapshot; returns the count badge plus a trigger for the panel.
///
/// # Errors
///
/// Returns `AppError::NotFound` when the id no longer exists in the
/// catalog (a stale grid after a reload).
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    Form(form): Form<AddToCartForm>,
) -> Result<Response, AppError> {
    let product = state.catalog().find(&form.id).ok_or_else(|| {
        tracing::warn!(id = %form.id, "add-to-cart for unknown product");
        AppError::NotFound(format!("product {}", form.id))
    })?;

    state
        .cart()
        .add_or_increment(&product, parse_quantity(form.quantity.as_deref()));

    Ok((
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartCountTemplate {
            count: state.cart().total_quantity(),
        },
    )
        .into_response())
}

/// Update a cart line's quantity (HTMX).
#[instrument(skip(state))]
pub async fn update(State(state): State<AppState>, Form(form): Form<UpdateCartForm>) -> Response {
    state
        .cart()
        .set_quantity(&form.id, parse_quantity(form.quantity.as_deref()));

    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartPanelTemplate {
            cart: CartView::from_store(state.cart()),
        },
    )
        .into_response()
}

/// Remove a cart line (HTMX).
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Form(form): Form<RemoveFromCartForm>,
) -> Response {
    state.cart().remove(&form.id);

    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartPanelTemplate {
            cart: CartView::from_store(state.cart()),
        },
    )
        .into_response()
}
