//! # Domain Types
//!
//! Core domain types shared by the state holders, the transport client and
//! the presentation layer.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │  BuyerProfile   │   │     Order       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  payment?       │   │  payment        │       │
//! │  │  title          │   │  address?       │   │  address/email  │       │
//! │  │  category       │   │  email?         │   │  phone          │       │
//! │  │  price?         │   │  phone?         │   │  items, total   │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ PaymentMethod   │   │   BuyerField    │   │    FormStep     │       │
//! │  │  Card           │   │  Payment        │   │  Order          │       │
//! │  │  Cash           │   │  Address        │   │  (payment+addr) │       │
//! │  └─────────────────┘   │  Email, Phone   │   │  Contacts       │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// Opaque product identifier assigned by the catalog service.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export)]
pub struct ProductId(String);

impl ProductId {
    pub fn new(id: impl Into<String>) -> Self {
        ProductId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        ProductId::new(id)
    }
}

/// A product as served by the catalog.
///
/// Immutable once fetched. A product without a price is shown in the
/// catalog but can never be put in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    pub id: ProductId,

    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub category: String,

    /// Image reference. Relative on the wire, resolved against the CDN by
    /// the transport client.
    #[serde(default)]
    pub image: String,

    /// `None` means "not purchasable".
    pub price: Option<Money>,
}

impl Product {
    /// Checks if the product can be added to the cart.
    #[inline]
    pub fn is_purchasable(&self) -> bool {
        self.price.is_some()
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How the buyer pays for the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Online card payment.
    Card,
    /// Cash on delivery.
    Cash,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 2] = [PaymentMethod::Card, PaymentMethod::Cash];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "card",
            PaymentMethod::Cash => "cash",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "card" | "online" => Ok(PaymentMethod::Card),
            "cash" => Ok(PaymentMethod::Cash),
            other => Err(ValidationError::NotAllowed {
                field: BuyerField::Payment,
                value: other.to_string(),
                allowed: PaymentMethod::ALL.iter().map(|m| m.to_string()).collect(),
            }),
        }
    }
}

// =============================================================================
// Buyer Fields
// =============================================================================

/// The checkout step a field is collected in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum FormStep {
    /// Payment method and delivery address.
    Order,
    /// Email and phone.
    Contacts,
}

/// Identifies one field of the buyer profile.
///
/// Replaces free-form field name strings: every variant maps to exactly one
/// setter in [`crate::buyer::BuyerProfile::apply`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum BuyerField {
    Payment,
    Address,
    Email,
    Phone,
}

impl BuyerField {
    pub const ALL: [BuyerField; 4] = [
        BuyerField::Payment,
        BuyerField::Address,
        BuyerField::Email,
        BuyerField::Phone,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BuyerField::Payment => "payment",
            BuyerField::Address => "address",
            BuyerField::Email => "email",
            BuyerField::Phone => "phone",
        }
    }

    /// The checkout step that collects this field.
    pub fn step(&self) -> FormStep {
        match self {
            BuyerField::Payment | BuyerField::Address => FormStep::Order,
            BuyerField::Email | BuyerField::Phone => FormStep::Contacts,
        }
    }

    /// Message shown when the field is left empty.
    pub fn missing_message(&self) -> &'static str {
        match self {
            BuyerField::Payment => "Select a payment method",
            BuyerField::Address => "Enter a delivery address",
            BuyerField::Email => "Enter an email",
            BuyerField::Phone => "Enter a phone number",
        }
    }
}

impl fmt::Display for BuyerField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuyerField {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BuyerField::ALL
            .into_iter()
            .find(|field| field.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::UnknownField(s.trim().to_string()))
    }
}

// =============================================================================
// Order
// =============================================================================

/// A submittable order. Only built by [`crate::order::build_order`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Order {
    pub payment: PaymentMethod,
    pub address: String,
    pub email: String,
    pub phone: String,
    /// Product identifiers in cart order.
    pub items: Vec<ProductId>,
    pub total: Money,
}

/// What the order service returns for an accepted order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderConfirmation {
    /// Server-assigned order id.
    pub id: String,
    /// Amount charged.
    pub total: Money,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_deserializes_null_price() {
        let json = r#"{
            "id": "b",
            "title": "Mythical Beast",
            "description": "",
            "category": "other",
            "image": "/beast.svg",
            "price": null
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id.as_str(), "b");
        assert!(!product.is_purchasable());
    }

    #[test]
    fn test_payment_method_parsing() {
        assert_eq!("card".parse::<PaymentMethod>().unwrap(), PaymentMethod::Card);
        assert_eq!(" CASH ".parse::<PaymentMethod>().unwrap(), PaymentMethod::Cash);
        assert!(matches!(
            "bitcoin".parse::<PaymentMethod>(),
            Err(ValidationError::NotAllowed { field: BuyerField::Payment, .. })
        ));
    }

    #[test]
    fn test_buyer_field_steps() {
        assert_eq!(BuyerField::Payment.step(), FormStep::Order);
        assert_eq!(BuyerField::Address.step(), FormStep::Order);
        assert_eq!(BuyerField::Email.step(), FormStep::Contacts);
        assert_eq!(BuyerField::Phone.step(), FormStep::Contacts);
    }

    #[test]
    fn test_buyer_field_parsing() {
        assert_eq!("Email".parse::<BuyerField>().unwrap(), BuyerField::Email);
        assert!("zip".parse::<BuyerField>().is_err());
    }

    #[test]
    fn test_order_wire_format() {
        let order = Order {
            payment: PaymentMethod::Card,
            address: "X".into(),
            email: "y@z".into(),
            phone: "1".into(),
            items: vec![ProductId::new("a")],
            total: Money::from_units(100),
        };
        let value = serde_json::to_value(&order).unwrap();
        assert_eq!(value["payment"], "card");
        assert_eq!(value["items"][0], "a");
        assert_eq!(value["total"], 100);
    }
}
