//! Store settings shared by the storefront (read) and admin (read/write).
//!
//! Settings are persisted as one JSONB row per tab (`general`, `shipping`,
//! `orders`). Missing keys fall back to defaults so older rows keep working
//! when fields are added.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::pricing::ShippingRules;
use crate::types::money::CurrencyCode;

/// General store information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    pub store_name: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub address: String,
    pub currency: CurrencyCode,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            store_name: "Printshop".to_string(),
            contact_email: String::new(),
            contact_phone: String::new(),
            address: String::new(),
            currency: CurrencyCode::default(),
        }
    }
}

/// Shipping fee configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShippingSettings {
    pub flat_fee: Decimal,
    /// Subtotal at or above which shipping is free. `None` disables free shipping.
    pub free_shipping_threshold: Option<Decimal>,
}

impl Default for ShippingSettings {
    fn default() -> Self {
        Self {
            flat_fee: Decimal::new(15_000, 0),
            free_shipping_threshold: Some(Decimal::new(500_000, 0)),
        }
    }
}

impl ShippingSettings {
    /// Pricing rules derived from these settings.
    #[must_use]
    pub const fn rules(&self) -> ShippingRules {
        ShippingRules {
            flat_fee: self.flat_fee,
            free_shipping_threshold: self.free_shipping_threshold,
        }
    }
}

/// Order handling configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderSettings {
    /// Prefix for generated order numbers, e.g. `PS`.
    pub order_number_prefix: String,
    /// Whether new orders are accepted at all.
    pub accepting_orders: bool,
    /// Shown on the checkout page.
    pub checkout_note: String,
}

impl Default for OrderSettings {
    fn default() -> Self {
        Self {
            order_number_prefix: "PS".to_string(),
            accepting_orders: true,
            checkout_note: String::new(),
        }
    }
}

/// All settings tabs together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSettings {
    pub general: GeneralSettings,
    pub shipping: ShippingSettings,
    pub orders: OrderSettings,
}

impl StoreSettings {
    /// Settings row key for the general tab.
    pub const GENERAL_KEY: &'static str = "general";
    /// Settings row key for the shipping tab.
    pub const SHIPPING_KEY: &'static str = "shipping";
    /// Settings row key for the orders tab.
    pub const ORDERS_KEY: &'static str = "orders";
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let general: GeneralSettings =
            serde_json::from_value(serde_json::json!({ "store_name": "Cetak Kilat" })).unwrap();
        assert_eq!(general.store_name, "Cetak Kilat");
        assert_eq!(general.currency, CurrencyCode::IDR);
    }

    #[test]
    fn test_shipping_rules_mirror_settings() {
        let settings = ShippingSettings {
            flat_fee: Decimal::new(20_000, 0),
            free_shipping_threshold: None,
        };
        let rules = settings.rules();
        assert_eq!(rules.flat_fee, Decimal::new(20_000, 0));
        assert!(rules.free_shipping_threshold.is_none());
    }
}
