//! # Configuration State
//!
//! Display settings loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`STOREFRONT_STORE_NAME`, `STOREFRONT_CURRENCY`)
//! 2. Defaults (this file)
//!
//! Read-only after initialization. Endpoint settings live in
//! `storefront_client::ClientConfig`.

use serde::Serialize;
use storefront_core::Money;

/// Presentation configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigState {
    /// Store name (shown in the header)
    pub store_name: String,

    /// Currency label appended to amounts
    pub currency: String,

    /// Shown instead of a price for products that cannot be bought
    pub priceless_label: String,
}

impl Default for ConfigState {
    fn default() -> Self {
        ConfigState {
            store_name: "Web Larek".to_string(),
            currency: "synapses".to_string(),
            priceless_label: "Priceless".to_string(),
        }
    }
}

impl ConfigState {
    /// Creates a ConfigState from environment variables and defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = ConfigState::default();

        if let Some(store_name) = lookup("STOREFRONT_STORE_NAME").filter(|s| !s.trim().is_empty()) {
            config.store_name = store_name;
        }

        if let Some(currency) = lookup("STOREFRONT_CURRENCY").filter(|s| !s.trim().is_empty()) {
            config.currency = currency;
        }

        config
    }

    /// Formats an amount with the currency label.
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::Money;
    /// use storefront_terminal::state::ConfigState;
    ///
    /// let config = ConfigState::default();
    /// assert_eq!(config.format_money(Money::from_units(12500)), "12 500 synapses");
    /// ```
    pub fn format_money(&self, amount: Money) -> String {
        format!("{} {}", group_thousands(amount.units()), self.currency)
    }

    /// Formats an optional catalog price.
    pub fn format_price(&self, price: Option<Money>) -> String {
        match price {
            Some(amount) => self.format_money(amount),
            None => self.priceless_label.clone(),
        }
    }
}

fn group_thousands(units: i64) -> String {
    let digits = units.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(ch);
    }
    if units < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_price() {
        let config = ConfigState::default();
        assert_eq!(config.format_price(Some(Money::from_units(750))), "750 synapses");
        assert_eq!(config.format_price(Some(Money::from_units(1450))), "1 450 synapses");
        assert_eq!(config.format_price(None), "Priceless");
    }

    #[test]
    fn test_format_money_negative() {
        let config = ConfigState::default();
        assert_eq!(config.format_money(Money::from_units(-1000000)), "-1 000 000 synapses");
        assert_eq!(config.format_money(Money::zero()), "0 synapses");
    }

    #[test]
    fn test_env_overrides() {
        let config = ConfigState::from_lookup(|key| match key {
            "STOREFRONT_STORE_NAME" => Some("Corner Shop".to_string()),
            "STOREFRONT_CURRENCY" => Some("  ".to_string()),
            _ => None,
        });
        assert_eq!(config.store_name, "Corner Shop");
        assert_eq!(config.currency, "synapses");
    }
}
