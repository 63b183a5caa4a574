//! # Validation Module
//!
//! Buyer profile validation.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Field setter (BuyerProfile::apply)                           │
//! │  ├── Trims input, empty → unset                                        │
//! │  └── Rejects unknown payment methods                                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  └── Snapshot → FieldErrors (one message per unset field)              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Order assembly (order::build_order)                          │
//! │  └── Refuses to build an Order from an incomplete profile              │
//! │                                                                         │
//! │  When to validate (every edit vs. submit only) is the caller's choice. │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use storefront_core::buyer::BuyerProfile;
//! use storefront_core::types::{BuyerField, FormStep};
//! use storefront_core::validation::validate_profile;
//!
//! let errors = validate_profile(&BuyerProfile::default());
//! assert_eq!(errors.len(), 4);
//! assert_eq!(errors.for_step(FormStep::Contacts).len(), 2);
//! assert!(errors.get(BuyerField::Email).is_some());
//! ```

use serde::Serialize;
use std::collections::BTreeMap;

use crate::buyer::BuyerProfile;
use crate::types::{BuyerField, FormStep};

/// Field-level validation messages, ordered by field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<BuyerField, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: BuyerField, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn get(&self, field: BuyerField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: BuyerField) -> bool {
        self.0.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = BuyerField> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (BuyerField, &str)> + '_ {
        self.0.iter().map(|(field, msg)| (*field, msg.as_str()))
    }

    /// Restricts the errors to the fields collected in one checkout step.
    pub fn for_step(&self, step: FormStep) -> FieldErrors {
        FieldErrors(
            self.0
                .iter()
                .filter(|(field, _)| field.step() == step)
                .map(|(field, msg)| (*field, msg.clone()))
                .collect(),
        )
    }
}

/// Maps a profile snapshot to one message for exactly each unset field.
///
/// Pure: no side effects, nothing published.
pub fn validate_profile(profile: &BuyerProfile) -> FieldErrors {
    let mut errors = FieldErrors::new();
    for field in profile.missing_fields() {
        errors.insert(field, field.missing_message());
    }
    errors
}

/// Normalizes raw text input: trims, and treats blank as unset.
pub fn normalize_text(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
