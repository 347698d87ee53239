//! Order wire format.
//!
//! An order is a transient, write-only projection of the cart plus the
//! customer's checkout fields. It exists only for the duration of one
//! submission request and is never persisted locally.
//!
//! Wire shape (camelCase, matching the external order handler):
//! `{timestamp, customerName, customerContact, items: [{id, name, price, qty}], subtotal}`

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::cart::CartLine;

/// Customer-entered checkout fields.
///
/// Name is required at submission time; contact is optional and may be a
/// phone number or an email address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerInfo {
    pub name: String,
    pub contact: String,
}

/// One line item on the order wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    #[serde(rename = "qty")]
    pub quantity: u32,
}

impl From<&CartLine> for OrderItem {
    fn from(line: &CartLine) -> Self {
        Self {
            id: line.id.clone(),
            name: line.name.clone(),
            price: line.price,
            quantity: line.quantity,
        }
    }
}

/// The JSON body posted to the external order endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Submission time, RFC 3339 UTC.
    pub timestamp: DateTime<Utc>,
    pub customer_name: String,
    pub customer_contact: String,
    pub items: Vec<OrderItem>,
    /// Sum of price times quantity over `items`, unrounded.
    pub subtotal: Decimal,
}

impl Order {
    /// Build an order from a cart snapshot, stamped with the current time.
    #[must_use]
    pub fn new(customer: &CustomerInfo, lines: &[CartLine]) -> Self {
        Self {
            timestamp: Utc::now(),
            customer_name: customer.name.clone(),
            customer_contact: customer.contact.clone(),
            items: lines.iter().map(OrderItem::from).collect(),
            subtotal: lines.iter().map(CartLine::line_total).sum(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn lines() -> Vec<CartLine> {
        vec![
            CartLine {
                id: "1".to_string(),
                name: "Widget".to_string(),
                price: Decimal::new(999, 2),
                image: String::new(),
                quantity: 2,
            },
            CartLine {
                id: "2".to_string(),
                name: "Gadget".to_string(),
                price: Decimal::new(2500, 2),
                image: String::new(),
                quantity: 1,
            },
        ]
    }

    #[test]
    fn test_order_subtotal_matches_lines() {
        let customer = CustomerInfo {
            name: "Ada".to_string(),
            contact: String::new(),
        };
        let order = Order::new(&customer, &lines());

        assert_eq!(order.subtotal, Decimal::new(4498, 2));
        assert_eq!(order.items.len(), 2);
    }

    #[test]
    fn test_wire_shape_uses_camel_case_and_qty() {
        let customer = CustomerInfo {
            name: "Ada".to_string(),
            contact: "555-0100".to_string(),
        };
        let order = Order::new(&customer, &lines());

        let value = serde_json::to_value(&order).unwrap();
        assert_eq!(value["customerName"], "Ada");
        assert_eq!(value["customerContact"], "555-0100");
        assert_eq!(value["items"][0]["qty"], 2);
        assert_eq!(value["items"][0]["id"], "1");
        assert!(value["timestamp"].is_string());
        // Decimal serializes as a string on the wire.
        assert_eq!(value["subtotal"], "44.98");
    }
}
