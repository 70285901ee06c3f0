//! Promo codes as managed by the admin.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

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

/// Whether a promo can be redeemed right now, and if not, why.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromoState {
    Active,
    Scheduled,
    Expired,
    UsedUp,
    Disabled,
}

impl PromoState {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Scheduled => "Scheduled",
            Self::Expired => "Expired",
            Self::UsedUp => "Used up",
            Self::Disabled => "Disabled",
        }
    }

    /// Badge classes, matching the order status palette.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Active => "bg-green-100 text-green-800",
            Self::Scheduled => "bg-blue-100 text-blue-800",
            Self::Expired | Self::UsedUp => "bg-yellow-100 text-yellow-800",
            Self::Disabled => "bg-gray-100 text-gray-800",
        }
    }
}

impl Promo {
    /// State at `now`. A disabled promo reports `Disabled` regardless of dates.
    #[must_use]
    pub fn state_at(&self, now: DateTime<Utc>) -> PromoState {
        if !self.is_active {
            PromoState::Disabled
        } else if self.starts_at.is_some_and(|start| now < start) {
            PromoState::Scheduled
        } else if self.ends_at.is_some_and(|end| now > end) {
            PromoState::Expired
        } else if self.max_uses.is_some_and(|max| self.used_count >= max) {
            PromoState::UsedUp
        } else {
            PromoState::Active
        }
    }

    #[must_use]
    pub fn state(&self) -> PromoState {
        self.state_at(Utc::now())
    }

    /// Usage for the list page, e.g. `3 / 100` or `3`.
    #[must_use]
    pub fn usage(&self) -> String {
        self.max_uses.map_or_else(
            || self.used_count.to_string(),
            |max| format!("{} / {max}", self.used_count),
        )
    }

    /// Validity window for the list page.
    #[must_use]
    pub fn window(&self) -> String {
        let fmt = |at: DateTime<Utc>| at.format("%-d %b %Y").to_string();
        match (self.starts_at, self.ends_at) {
            (None, None) => "Always".to_string(),
            (Some(start), None) => format!("From {}", fmt(start)),
            (None, Some(end)) => format!("Until {}", fmt(end)),
            (Some(start), Some(end)) => format!("{} - {}", fmt(start), fmt(end)),
        }
    }

    /// `datetime-local` input value for the start date.
    #[must_use]
    pub fn starts_at_input(&self) -> String {
        self.starts_at.map(datetime_input).unwrap_or_default()
    }

    /// `datetime-local` input value for the end date.
    #[must_use]
    pub fn ends_at_input(&self) -> String {
        self.ends_at.map(datetime_input).unwrap_or_default()
    }
}

fn datetime_input(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn promo() -> Promo {
        Promo {
            id: PromoId::new(1),
            code: "HEMAT10".to_string(),
            description: String::new(),
            kind: PromoKind::Percentage,
            value: Decimal::new(10, 0),
            min_order_amount: None,
            max_uses: Some(100),
            used_count: 3,
            starts_at: None,
            ends_at: None,
            is_active: true,
        }
    }

    #[test]
    fn test_state_transitions() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
        let mut p = promo();
        assert_eq!(p.state_at(now), PromoState::Active);

        p.starts_at = Some(now + Duration::days(1));
        assert_eq!(p.state_at(now), PromoState::Scheduled);

        p.starts_at = None;
        p.ends_at = Some(now - Duration::days(1));
        assert_eq!(p.state_at(now), PromoState::Expired);

        p.ends_at = None;
        p.used_count = 100;
        assert_eq!(p.state_at(now), PromoState::UsedUp);

        p.is_active = false;
        assert_eq!(p.state_at(now), PromoState::Disabled);
    }

    #[test]
    fn test_usage_and_window() {
        let mut p = promo();
        assert_eq!(p.usage(), "3 / 100");
        p.max_uses = None;
        assert_eq!(p.usage(), "3");

        assert_eq!(p.window(), "Always");
        p.ends_at = Some(Utc.with_ymd_and_hms(2026, 12, 31, 23, 59, 0).unwrap());
        assert_eq!(p.window(), "Until 31 Dec 2026");
        assert_eq!(p.ends_at_input(), "2026-12-31T23:59");
    }
}
