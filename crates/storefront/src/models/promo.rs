//! Promo codes as read at checkout.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use printshop_core::pricing::PromoTerms;
use printshop_core::{PromoId, PromoKind};

/// A promo code row.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Promo {
    pub id: PromoId,
    pub code: String,
    pub description: String,
    pub kind: PromoKind,
    pub value: Decimal,
    pub min_order_amount: Option<Decimal>,
    pub max_uses: Option<i32>,
    pub used_count: i32,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub is_active: bool,
}

impl Promo {
    /// Pricing terms for this promo.
    #[must_use]
    pub fn terms(&self) -> PromoTerms {
        PromoTerms {
            kind: self.kind,
            value: self.value,
            min_order_amount: self.min_order_amount,
            max_uses: self.max_uses,
            used_count: self.used_count,
            starts_at: self.starts_at,
            ends_at: self.ends_at,
            is_active: self.is_active,
        }
    }
}

/// Normalize user-entered promo codes: trimmed and upper-cased.
#[must_use]
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_code() {
        assert_eq!(normalize_code("  hemat10 "), "HEMAT10");
    }
}
