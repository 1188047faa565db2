//! Order Models

use std::fmt;

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{
    carts::models::{Cart, CartLine},
    products::ProductId,
};

/// Wire tag for the payment method chosen at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[serde(rename = "COD")]
    CashOnDelivery,

    #[serde(rename = "UPI")]
    Upi,

    #[serde(rename = "Card")]
    Card,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CashOnDelivery => f.write_str("COD"),
            Self::Upi => f.write_str("UPI"),
            Self::Card => f.write_str("Card"),
        }
    }
}

/// Payment selection together with the details its method requires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payment {
    CashOnDelivery,
    Upi { upi_id: String },
    Card { card_number: String, cardholder: String },
}

impl Payment {
    /// Wire tag for this selection.
    #[must_use]
    pub fn method(&self) -> PaymentMethod {
        match self {
            Self::CashOnDelivery => PaymentMethod::CashOnDelivery,
            Self::Upi { .. } => PaymentMethod::Upi,
            Self::Card { .. } => PaymentMethod::Card,
        }
    }
}

/// Checkout input gathered from the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutForm {
    pub delivery_address: String,
    pub payment: Payment,
}

/// Card fields posted alongside card payments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardDetails {
    pub card_number: String,
    pub name: String,
}

/// One order line frozen at submission time, so later cart mutations
/// cannot alter an in-flight request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineSnapshot {
    pub product_id: ProductId,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub quantity: u32,
    pub image: String,
}

impl OrderLineSnapshot {
    fn from_line(line: &CartLine) -> Self {
        Self {
            product_id: line.id.clone(),
            name: line.title.clone(),
            price: line.price.to_decimal(),
            quantity: line.quantity,
            image: line.image.clone(),
        }
    }
}

/// Order placement payload sent to the remote order service.
///
/// Monetary amounts cross the wire in decimal major units. The total is
/// advisory; the service recomputes it from its own catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub items: Vec<OrderLineSnapshot>,

    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,

    pub delivery_address: String,

    pub payment_method: PaymentMethod,

    /// UPI handle; empty unless the payment method is UPI.
    pub upi_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_details: Option<CardDetails>,
}

impl OrderRequest {
    /// Freeze `cart` and the checkout form into a submission payload.
    #[must_use]
    pub fn build(cart: &Cart, form: &CheckoutForm) -> Self {
        let (upi_id, card_details) = match &form.payment {
            Payment::CashOnDelivery => (String::new(), None),
            Payment::Upi { upi_id } => (upi_id.clone(), None),
            Payment::Card {
                card_number,
                cardholder,
            } => (
                String::new(),
                Some(CardDetails {
                    card_number: card_number.clone(),
                    name: cardholder.clone(),
                }),
            ),
        };

        Self {
            items: cart.lines.iter().map(OrderLineSnapshot::from_line).collect(),
            total_amount: cart.total_price.to_decimal(),
            delivery_address: form.delivery_address.clone(),
            payment_method: form.payment.method(),
            upi_id,
            card_details,
        }
    }
}

/// Server-assigned order identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderRef(String);

impl OrderRef {
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An order acknowledged by the remote service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedOrder {
    #[serde(rename = "_id", alias = "id")]
    pub id: OrderRef,

    #[serde(default)]
    pub items: Vec<OrderLineSnapshot>,

    #[serde(default, with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,

    #[serde(default)]
    pub delivery_address: Option<String>,

    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,

    /// Fulfilment status as the service reports it; the value space is
    /// server-defined.
    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub created_at: Option<Timestamp>,
}

/// Lifecycle of one order submission attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmissionState {
    /// No attempt underway.
    #[default]
    Idle,

    /// A request is in flight; further submissions are rejected.
    Submitting,

    /// The last attempt was acknowledged by the service.
    Succeeded(OrderRef),

    /// The last attempt failed with a human-readable reason.
    Failed(String),
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{domain::products::Product, prices::Price, session::OwnerKey};

    use super::*;

    fn cart_with_two_chai() -> Cart {
        let mut cart = Cart::empty_for(OwnerKey::Guest);
        let chai = Product {
            id: ProductId::new("p1"),
            title: "Chai".to_string(),
            price: Price::from_minor(4999),
            image: "/chai.jpg".to_string(),
        };
        cart.add(&chai);
        cart.add(&chai);

        cart
    }

    #[test]
    fn builds_a_cod_request_in_the_wire_shape() -> TestResult {
        let form = CheckoutForm {
            delivery_address: "12 Hill Road, Bandra".to_string(),
            payment: Payment::CashOnDelivery,
        };

        let request = OrderRequest::build(&cart_with_two_chai(), &form);
        let value = serde_json::to_value(&request)?;

        assert_eq!(value["paymentMethod"], "COD");
        assert_eq!(value["deliveryAddress"], "12 Hill Road, Bandra");
        assert_eq!(value["totalAmount"], 99.98);
        assert_eq!(value["upiId"], "");
        assert!(value.get("cardDetails").is_none());
        assert_eq!(value["items"][0]["productId"], "p1");
        assert_eq!(value["items"][0]["name"], "Chai");
        assert_eq!(value["items"][0]["price"], 49.99);
        assert_eq!(value["items"][0]["quantity"], 2);

        Ok(())
    }

    #[test]
    fn a_upi_request_carries_the_handle() -> TestResult {
        let form = CheckoutForm {
            delivery_address: "12 Hill Road".to_string(),
            payment: Payment::Upi {
                upi_id: "asha@upi".to_string(),
            },
        };

        let value = serde_json::to_value(OrderRequest::build(&cart_with_two_chai(), &form))?;

        assert_eq!(value["paymentMethod"], "UPI");
        assert_eq!(value["upiId"], "asha@upi");

        Ok(())
    }

    #[test]
    fn a_card_request_carries_the_card_details() -> TestResult {
        let form = CheckoutForm {
            delivery_address: "12 Hill Road".to_string(),
            payment: Payment::Card {
                card_number: "4111111111111111".to_string(),
                cardholder: "Asha Rao".to_string(),
            },
        };

        let value = serde_json::to_value(OrderRequest::build(&cart_with_two_chai(), &form))?;

        assert_eq!(value["paymentMethod"], "Card");
        assert_eq!(value["upiId"], "");
        assert_eq!(value["cardDetails"]["cardNumber"], "4111111111111111");
        assert_eq!(value["cardDetails"]["name"], "Asha Rao");

        Ok(())
    }

    #[test]
    fn parses_a_placed_order_as_the_service_returns_it() -> TestResult {
        let order: PlacedOrder = serde_json::from_str(
            r#"{
                "_id": "6643f9d2c1a4",
                "items": [{"productId": "p1", "name": "Chai", "price": 49.99, "quantity": 2, "image": "/chai.jpg"}],
                "totalAmount": 99.98,
                "deliveryAddress": "12 Hill Road, Bandra",
                "paymentMethod": "COD",
                "status": "pending",
                "createdAt": "2025-03-14T09:26:53.589Z"
            }"#,
        )?;

        assert_eq!(order.id, OrderRef::new("6643f9d2c1a4"));
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.status.as_deref(), Some("pending"));
        assert_eq!(order.payment_method, Some(PaymentMethod::CashOnDelivery));
        assert!(order.created_at.is_some());

        Ok(())
    }

    #[test]
    fn tolerates_a_sparse_placed_order() -> TestResult {
        let order: PlacedOrder = serde_json::from_str(r#"{"id": "ord-1"}"#)?;

        assert_eq!(order.id, OrderRef::new("ord-1"));
        assert!(order.items.is_empty());
        assert_eq!(order.total_amount, Decimal::ZERO);
        assert!(order.status.is_none());

        Ok(())
    }
}
