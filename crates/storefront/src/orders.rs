//! Order submission to the external endpoint.
//!
//! The submitter validates locally (no network call for an empty cart or a
//! blank customer name), then makes exactly one POST of the order JSON.
//! There is no automatic retry: on failure the cart is left untouched so
//! the user can retry without re-entering items.

use serde_json::Value;
use tracing::instrument;

use sheetstall_core::{CartLine, CustomerInfo, Order};

use crate::config::{OrderConfig, SuccessConvention};

/// Checkout rejected locally before any network call.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("cart is empty")]
    EmptyCart,

    #[error("missing required field: {0}")]
    MissingField(&'static str),
}

/// Order submission failed; the cart is preserved for retry.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    /// No order endpoint configured for this deployment.
    #[error("order endpoint is not configured")]
    NotConfigured,

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Endpoint returned a non-success status.
    #[error("order endpoint returned {0}")]
    Status(reqwest::StatusCode),

    /// Endpoint response body is not valid JSON.
    #[error("order endpoint response is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// Endpoint answered, but not with its success convention.
    #[error("order endpoint rejected the order: {0}")]
    Rejected(String),
}

/// Either side of a failed checkout.
#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Submission(#[from] SubmissionError),
}

/// Client for the external order endpoint.
#[derive(Debug, Clone)]
pub struct OrderClient {
    client: reqwest::Client,
    config: OrderConfig,
}

impl OrderClient {
    /// Create a new order client.
    #[must_use]
    pub fn new(config: &OrderConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config: config.clone(),
        }
    }

    /// Validate and submit one order built from the cart snapshot.
    ///
    /// Returns the submitted order on success; the caller is expected to
    /// clear the cart then.
    ///
    /// # Errors
    ///
    /// [`CheckoutError::Validation`] for local rejection (no request is
    /// made), [`CheckoutError::Submission`] for transport, status, body or
    /// convention failures.
    #[instrument(skip(self, customer, lines), fields(lines = lines.len()))]
    pub async fn submit(
        &self,
        customer: &CustomerInfo,
        lines: &[CartLine],
    ) -> Result<Order, CheckoutError> {
        if lines.is_empty() {
            return Err(ValidationError::EmptyCart.into());
        }

        let name = customer.name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingField("name").into());
        }

        let url = self
            .config
            .url
            .as_ref()
            .ok_or(SubmissionError::NotConfigured)?;

        let order = Order::new(
            &CustomerInfo {
                name: name.to_string(),
                contact: customer.contact.trim().to_string(),
            },
            lines,
        );

        let response = self
            .client
            .post(url.clone())
            .json(&order)
            .send()
            .await
            .map_err(SubmissionError::Http)?;

        let status = response.status();
        if !status.is_success() {
            return Err(SubmissionError::Status(status).into());
        }

        let body = response.text().await.map_err(SubmissionError::Http)?;
        let value: Value = serde_json::from_str(&body).map_err(SubmissionError::Parse)?;

        interpret_response(self.config.success, &value)
            .map_err(|reason| SubmissionError::Rejected(reason).into())
            .map(|()| order)
    }
}

/// Apply the endpoint's success convention to a parsed response body.
///
/// An `error` field rejects under either convention. The `Flag` convention
/// demands an explicit `success: true`; the `Status` convention accepts
/// `"ok"`/`"success"` (case-insensitive) and treats a missing status as
/// implied success, matching the deployed order handler.
fn interpret_response(convention: SuccessConvention, value: &Value) -> Result<(), String> {
    if let Some(error) = value.get("error").and_then(Value::as_str) {
        return Err(error.to_string());
    }

    match convention {
        SuccessConvention::Flag => match value.get("success").and_then(Value::as_bool) {
            Some(true) => Ok(()),
            Some(false) => Err("success flag is false".to_string()),
            None => Err("response carries no success flag".to_string()),
        },
        SuccessConvention::Status => match value.get("status") {
            None | Some(Value::Null) => Ok(()),
            Some(Value::String(s))
                if s.eq_ignore_ascii_case("ok") || s.eq_ignore_ascii_case("success") =>
            {
                Ok(())
            }
            Some(other) => Err(format!("unexpected status {other}")),
        },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use serde_json::json;
    use url::Url;

    use super::*;

    fn client(url: Option<&str>) -> OrderClient {
        OrderClient::new(&OrderConfig {
            url: url.map(|u| Url::parse(u).unwrap()),
            success: SuccessConvention::Status,
        })
    }

    fn lines() -> Vec<CartLine> {
        vec![CartLine {
            id: "1".to_string(),
            name: "Widget".to_string(),
            price: Decimal::new(999, 2),
            image: String::new(),
            quantity: 2,
        }]
    }

    fn customer(name: &str) -> CustomerInfo {
        CustomerInfo {
            name: name.to_string(),
            contact: String::new(),
        }
    }

    // Validation failures must reject before any request: the URL below is
    // unroutable, so reaching the network would fail the test differently.
    #[tokio::test]
    async fn test_empty_cart_is_rejected_locally() {
        let client = client(Some("http://192.0.2.1/orders"));
        let err = client.submit(&customer("Ada"), &[]).await.unwrap_err();

        assert!(matches!(
            err,
            CheckoutError::Validation(ValidationError::EmptyCart)
        ));
    }

    #[tokio::test]
    async fn test_blank_name_is_rejected_locally() {
        let client = client(Some("http://192.0.2.1/orders"));
        let err = client.submit(&customer("   "), &lines()).await.unwrap_err();

        assert!(matches!(
            err,
            CheckoutError::Validation(ValidationError::MissingField("name"))
        ));
    }

    #[tokio::test]
    async fn test_unconfigured_endpoint_is_a_submission_error() {
        let client = client(None);
        let err = client.submit(&customer("Ada"), &lines()).await.unwrap_err();

        assert!(matches!(
            err,
            CheckoutError::Submission(SubmissionError::NotConfigured)
        ));
    }

    #[test]
    fn test_status_convention() {
        let c = SuccessConvention::Status;

        assert!(interpret_response(c, &json!({"status": "ok"})).is_ok());
        assert!(interpret_response(c, &json!({"status": "SUCCESS"})).is_ok());
        assert!(interpret_response(c, &json!({"row": 12})).is_ok());
        assert!(interpret_response(c, &json!({"status": "queued"})).is_err());
    }

    #[test]
    fn test_flag_convention() {
        let c = SuccessConvention::Flag;

        assert!(interpret_response(c, &json!({"success": true})).is_ok());
        assert!(interpret_response(c, &json!({"success": false})).is_err());
        assert!(interpret_response(c, &json!({"status": "ok"})).is_err());
    }

    #[test]
    fn test_error_field_rejects_either_convention() {
        let body = json!({"status": "ok", "error": "sheet is full"});

        let err = interpret_response(SuccessConvention::Status, &body).unwrap_err();
        assert_eq!(err, "sheet is full");
        assert!(interpret_response(SuccessConvention::Flag, &body).is_err());
    }
}
