//! # Order Assembly
//!
//! Combines a buyer profile snapshot and a cart snapshot into a submittable
//! [`Order`].
//!
//! ## Assembly Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Cart empty?             ──► Err(EmptyCart)   (profile not checked)  │
//! │  2. Any buyer field unset?  ──► Err(IncompleteProfile { missing })      │
//! │  3. Otherwise               ──► Order { profile fields, ids, total }    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::buyer::BuyerProfile;
use crate::cart::CartSnapshot;
use crate::error::{CoreError, CoreResult};
use crate::types::Order;

/// Builds an order. Pure: reads its inputs, publishes nothing.
pub fn build_order(profile: &BuyerProfile, cart: &CartSnapshot) -> CoreResult<Order> {
    if cart.is_empty() {
        return Err(CoreError::EmptyCart);
    }

    match (&profile.payment, &profile.address, &profile.email, &profile.phone) {
        (Some(payment), Some(address), Some(email), Some(phone)) => Ok(Order {
            payment: *payment,
            address: address.clone(),
            email: email.clone(),
            phone: phone.clone(),
            items: cart.item_ids(),
            total: cart.total,
        }),
        _ => Err(CoreError::IncompleteProfile {
            missing: profile.missing_fields(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::Cart;
    use crate::catalog::tests::product;
    use crate::money::Money;
    use crate::types::{BuyerField, PaymentMethod, ProductId};

    fn full_profile() -> BuyerProfile {
        BuyerProfile {
            payment: Some(PaymentMethod::Card),
            address: Some("X".into()),
            email: Some("y@z".into()),
            phone: Some("1".into()),
        }
    }

    fn snapshot_of(products: &[(&str, i64)]) -> CartSnapshot {
        let mut cart = Cart::new();
        for (id, price) in products {
            cart.add_item(&product(id, Some(*price))).unwrap();
        }
        CartSnapshot::from(&cart)
    }

    #[test]
    fn test_builds_order_from_complete_inputs() {
        let order = build_order(&full_profile(), &snapshot_of(&[("a", 100)])).unwrap();

        assert_eq!(order.payment, PaymentMethod::Card);
        assert_eq!(order.address, "X");
        assert_eq!(order.email, "y@z");
        assert_eq!(order.phone, "1");
        assert_eq!(order.items, vec![ProductId::new("a")]);
        assert_eq!(order.total, Money::from_units(100));
    }

    #[test]
    fn test_items_keep_cart_order() {
        let order = build_order(&full_profile(), &snapshot_of(&[("b", 2), ("a", 1)])).unwrap();
        assert_eq!(order.items, vec![ProductId::new("b"), ProductId::new("a")]);
        assert_eq!(order.total, Money::from_units(3));
    }

    #[test]
    fn test_empty_cart_wins_regardless_of_profile() {
        let empty = CartSnapshot::default();
        assert!(matches!(
            build_order(&full_profile(), &empty),
            Err(CoreError::EmptyCart)
        ));
        assert!(matches!(
            build_order(&BuyerProfile::default(), &empty),
            Err(CoreError::EmptyCart)
        ));
    }

    #[test]
    fn test_missing_field_reported() {
        let mut profile = full_profile();
        profile.phone = None;

        match build_order(&profile, &snapshot_of(&[("a", 100)])) {
            Err(CoreError::IncompleteProfile { missing }) => {
                assert_eq!(missing, vec![BuyerField::Phone]);
            }
            other => panic!("expected IncompleteProfile, got {other:?}"),
        }
    }
}
