//! Cart and order pricing.
//!
//! Totals are computed in one place so the cart page, the checkout preview
//! and order placement always agree:
//!
//! ```text
//! subtotal = sum(unit_price * quantity)
//! discount = promo.discount_for(subtotal)      (0 without a promo)
//! shipping = rules.fee_for(subtotal - discount)
//! total    = subtotal - discount + shipping
//! ```

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::PromoKind;

/// One priced line of a cart or order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartLine {
    pub unit_price: Decimal,
    pub quantity: u32,
}

impl CartLine {
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Sum of all line totals.
#[must_use]
pub fn subtotal(lines: &[CartLine]) -> Decimal {
    lines.iter().map(CartLine::line_total).sum()
}

/// Reasons a promo code cannot be applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PromoError {
    #[error("this promo code is no longer active")]
    Inactive,
    #[error("this promo code is not valid yet")]
    NotStarted,
    #[error("this promo code has expired")]
    Expired,
    #[error("this promo code has reached its usage limit")]
    UsageLimitReached,
    #[error("a minimum order of {minimum} is required for this promo code")]
    BelowMinimum { minimum: Decimal },
}

/// The pricing-relevant part of a promo code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromoTerms {
    pub kind: PromoKind,
    pub value: Decimal,
    pub min_order_amount: Option<Decimal>,
    pub max_uses: Option<i32>,
    pub used_count: i32,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub is_active: bool,
}

impl PromoTerms {
    /// Check whether the promo can be used at `now` for the given subtotal.
    ///
    /// # Errors
    ///
    /// Returns the first failing [`PromoError`] condition.
    pub fn check(&self, subtotal: Decimal, now: DateTime<Utc>) -> Result<(), PromoError> {
        if !self.is_active {
            return Err(PromoError::Inactive);
        }
        if self.starts_at.is_some_and(|start| now < start) {
            return Err(PromoError::NotStarted);
        }
        if self.ends_at.is_some_and(|end| now > end) {
            return Err(PromoError::Expired);
        }
        if self.max_uses.is_some_and(|max| self.used_count >= max) {
            return Err(PromoError::UsageLimitReached);
        }
        if let Some(minimum) = self.min_order_amount
            && subtotal < minimum
        {
            return Err(PromoError::BelowMinimum { minimum });
        }
        Ok(())
    }

    /// Discount this promo gives on `subtotal`, never more than the subtotal.
    ///
    /// # Errors
    ///
    /// Returns a [`PromoError`] if the promo cannot be applied.
    pub fn discount_for(&self, subtotal: Decimal, now: DateTime<Utc>) -> Result<Decimal, PromoError> {
        self.check(subtotal, now)?;

        let raw = match self.kind {
            PromoKind::Percentage => {
                let pct = self.value.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);
                (subtotal * pct / Decimal::ONE_HUNDRED)
                    .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
            }
            PromoKind::Fixed => self.value.max(Decimal::ZERO),
        };

        Ok(raw.min(subtotal))
    }
}

/// Shipping fee rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShippingRules {
    pub flat_fee: Decimal,
    pub free_shipping_threshold: Option<Decimal>,
}

impl ShippingRules {
    /// Shipping fee for an (already discounted) merchandise amount.
    ///
    /// Empty orders ship for free.
    #[must_use]
    pub fn fee_for(&self, amount: Decimal) -> Decimal {
        if amount <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        match self.free_shipping_threshold {
            Some(threshold) if amount >= threshold => Decimal::ZERO,
            _ => self.flat_fee,
        }
    }
}

/// Computed order totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrderTotals {
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub shipping_fee: Decimal,
    pub total: Decimal,
}

impl OrderTotals {
    /// Compute totals for a set of lines, an optional promo and shipping rules.
    ///
    /// # Errors
    ///
    /// Returns a [`PromoError`] if a promo is given but cannot be applied.
    pub fn compute(
        lines: &[CartLine],
        promo: Option<&PromoTerms>,
        shipping: &ShippingRules,
        now: DateTime<Utc>,
    ) -> Result<Self, PromoError> {
        let subtotal = subtotal(lines);
        let discount = match promo {
            Some(terms) => terms.discount_for(subtotal, now)?,
            None => Decimal::ZERO,
        };
        let shipping_fee = shipping.fee_for(subtotal - discount);

        Ok(Self {
            subtotal,
            discount,
            shipping_fee,
            total: subtotal - discount + shipping_fee,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn idr(n: i64) -> Decimal {
        Decimal::new(n, 0)
    }

    fn promo(kind: PromoKind, value: Decimal) -> PromoTerms {
        PromoTerms {
            kind,
            value,
            min_order_amount: None,
            max_uses: None,
            used_count: 0,
            starts_at: None,
            ends_at: None,
            is_active: true,
        }
    }

    fn rules() -> ShippingRules {
        ShippingRules {
            flat_fee: idr(15_000),
            free_shipping_threshold: Some(idr(500_000)),
        }
    }

    #[test]
    fn test_subtotal_sums_lines() {
        let lines = [
            CartLine {
                unit_price: idr(350),
                quantity: 100,
            },
            CartLine {
                unit_price: idr(25_000),
                quantity: 2,
            },
        ];
        assert_eq!(subtotal(&lines), idr(85_000));
    }

    #[test]
    fn test_percentage_discount_rounds_to_cents() {
        let terms = promo(PromoKind::Percentage, Decimal::new(15, 0));
        let discount = terms.discount_for(Decimal::new(3333, 2), Utc::now()).unwrap();
        assert_eq!(discount, Decimal::new(500, 2));
    }

    #[test]
    fn test_fixed_discount_capped_at_subtotal() {
        let terms = promo(PromoKind::Fixed, idr(50_000));
        assert_eq!(terms.discount_for(idr(20_000), Utc::now()).unwrap(), idr(20_000));
    }

    #[test]
    fn test_promo_window_and_limits() {
        let now = Utc::now();

        let mut terms = promo(PromoKind::Fixed, idr(1_000));
        terms.starts_at = Some(now + Duration::days(1));
        assert_eq!(terms.check(idr(10_000), now), Err(PromoError::NotStarted));

        terms.starts_at = None;
        terms.ends_at = Some(now - Duration::days(1));
        assert_eq!(terms.check(idr(10_000), now), Err(PromoError::Expired));

        terms.ends_at = None;
        terms.max_uses = Some(10);
        terms.used_count = 10;
        assert_eq!(terms.check(idr(10_000), now), Err(PromoError::UsageLimitReached));

        terms.max_uses = None;
        terms.is_active = false;
        assert_eq!(terms.check(idr(10_000), now), Err(PromoError::Inactive));
    }

    #[test]
    fn test_promo_minimum_order() {
        let mut terms = promo(PromoKind::Percentage, Decimal::new(10, 0));
        terms.min_order_amount = Some(idr(100_000));
        assert_eq!(
            terms.check(idr(99_999), Utc::now()),
            Err(PromoError::BelowMinimum {
                minimum: idr(100_000)
            })
        );
        assert!(terms.check(idr(100_000), Utc::now()).is_ok());
    }

    #[test]
    fn test_shipping_free_above_threshold() {
        assert_eq!(rules().fee_for(idr(499_999)), idr(15_000));
        assert_eq!(rules().fee_for(idr(500_000)), Decimal::ZERO);
        assert_eq!(rules().fee_for(Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_totals_apply_shipping_after_discount() {
        let lines = [CartLine {
            unit_price: idr(520_000),
            quantity: 1,
        }];
        let terms = promo(PromoKind::Fixed, idr(50_000));
        let totals = OrderTotals::compute(&lines, Some(&terms), &rules(), Utc::now()).unwrap();

        assert_eq!(totals.subtotal, idr(520_000));
        assert_eq!(totals.discount, idr(50_000));
        // 470k after discount is below the free-shipping threshold
        assert_eq!(totals.shipping_fee, idr(15_000));
        assert_eq!(totals.total, idr(485_000));
    }

    #[test]
    fn test_totals_without_promo() {
        let lines = [CartLine {
            unit_price: idr(10_000),
            quantity: 3,
        }];
        let totals = OrderTotals::compute(&lines, None, &rules(), Utc::now()).unwrap();
        assert_eq!(totals.discount, Decimal::ZERO);
        assert_eq!(totals.total, idr(45_000));
    }
}
