//! # Error Types
//!
//! Domain-specific error types for storefront-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  storefront-core errors (this file)                                    │
//! │  ├── CoreError        - Domain invariant and assembly failures         │
//! │  └── ValidationError  - Buyer input failures                           │
//! │                                                                         │
//! │  storefront-client errors (separate crate)                             │
//! │  └── ClientError      - Transport failures                             │
//! │                                                                         │
//! │  Terminal app errors                                                   │
//! │  └── AppError         - What the user sees                             │
//! │                                                                         │
//! │  Flow: ValidationError ─┬→ AppError → "! message"                      │
//! │        ClientError ─────┘                                              │
//! │        CoreError ──────────→ checkout notice / bus handler failure     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::types::{BuyerField, ProductId};

// =============================================================================
// Core Error
// =============================================================================

/// Core domain errors.
///
/// State holders return these instead of mutating; nothing is ever
/// half-applied.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product has no price.
    ///
    /// ## When This Occurs
    /// - "Buy" pressed on a product the catalog marks as priceless
    /// - A stale preview selection pointing at such a product
    #[error("Product {0} has no price and cannot be added to the cart")]
    NotPurchasable(ProductId),

    /// Adding the product would push the cart total past `Money`'s range.
    #[error("Adding product {0} would overflow the cart total")]
    TotalOverflow(ProductId),

    /// Order assembly was attempted with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// Order assembly was attempted with required buyer fields unset.
    #[error("Missing required field(s): {}", join_fields(.missing))]
    IncompleteProfile { missing: Vec<BuyerField> },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

fn join_fields(fields: &[BuyerField]) -> String {
    fields
        .iter()
        .map(BuyerField::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

impl CoreError {
    /// Returns true if the user can fix this by editing the checkout forms.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CoreError::IncompleteProfile { .. } | CoreError::Validation(_)
        )
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Buyer input validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Value is not in the allowed set.
    #[error("{field} must be one of: {allowed:?}, got '{value}'")]
    NotAllowed {
        field: BuyerField,
        value: String,
        allowed: Vec<String>,
    },

    /// Field name does not name a buyer field.
    #[error("Unknown field: {0}")]
    UnknownField(String),
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::NotPurchasable(ProductId::new("b"));
        assert_eq!(
            err.to_string(),
            "Product b has no price and cannot be added to the cart"
        );

        let err = CoreError::IncompleteProfile {
            missing: vec![BuyerField::Email, BuyerField::Phone],
        };
        assert_eq!(err.to_string(), "Missing required field(s): email, phone");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::UnknownField("shoe".into());
        assert_eq!(err.to_string(), "Unknown field: shoe");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::UnknownField("shoe".into());
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
        assert!(core_err.is_validation());
        assert!(!CoreError::EmptyCart.is_validation());
    }
}
