//! Checkout route handler.
//!
//! Validation and submission failures both render as an inline result
//! fragment with the cart preserved; only a confirmed success clears it.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;

use sheetstall_core::CustomerInfo;

use crate::orders::{CheckoutError, SubmissionError, ValidationError};
use crate::state::AppState;

/// Checkout form data.
#[derive(Debug, Deserialize)]
pub struct CheckoutForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub contact: String,
}

/// Checkout result fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/checkout_result.html")]
pub struct CheckoutResultTemplate {
    pub success: bool,
    pub message: String,
}

/// Validate and submit the order; clear the cart on confirmed success.
#[instrument(skip(state, form))]
pub async fn submit(State(state): State<AppState>, Form(form): Form<CheckoutForm>) -> Response {
    let customer = CustomerInfo {
        name: form.name,
        contact: form.contact,
    };
    let snapshot = state.cart().snapshot();

    match state.orders().submit(&customer, &snapshot).await {
        Ok(order) => {
            state.cart().clear();
            tracing::info!(items = order.items.len(), "order submitted");

            (
                AppendHeaders([("HX-Trigger", "cart-updated")]),
                CheckoutResultTemplate {
                    success: true,
                    message: "Order sent! We'll contact you.".to_string(),
                },
            )
                .into_response()
        }
        Err(e) => {
            // The cart stays untouched so the user can retry.
            CheckoutResultTemplate {
                success: false,
                message: failure_message(&e),
            }
            .into_response()
        }
    }
}

/// User-facing message for a failed checkout.
fn failure_message(error: &CheckoutError) -> String {
    match error {
        CheckoutError::Validation(ValidationError::EmptyCart) => "Cart is empty.".to_string(),
        CheckoutError::Validation(ValidationError::MissingField(_)) => {
            "Please enter your name.".to_string()
        }
        CheckoutError::Submission(SubmissionError::NotConfigured) => {
            tracing::warn!("checkout attempted without a configured order endpoint");
            "Checkout is not configured.".to_string()
        }
        CheckoutError::Submission(e) => {
            tracing::error!(error = %e, "order submission failed");
            "Failed to send order. Please try again.".to_string()
        }
    }
}
