//! Orders as seen by the customer who placed them.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use printshop_core::filter::OrderRecord;
use printshop_core::{OrderId, OrderItemId, OrderStatus, ProductId};

/// Full order header with shipping snapshot.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Order {
    pub id: OrderId,
    pub order_number: String,
    pub status: OrderStatus,
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub shipping_fee: Decimal,
    pub total_amount: Decimal,
    pub promo_code: Option<String>,
    pub recipient_name: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub province: String,
    pub postal_code: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Placement date for display, e.g. `19 Oct 2026`.
    #[must_use]
    pub fn placed_on(&self) -> String {
        format_date(self.created_at)
    }

    /// Shipping address on one line.
    #[must_use]
    pub fn shipping_line(&self) -> String {
        format!(
            "{}, {}, {} {}",
            self.address, self.city, self.province, self.postal_code
        )
    }
}

/// One line of an order. Product name and price are snapshots.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub product_id: Option<ProductId>,
    pub product_name: String,
    pub unit_price: Decimal,
    pub quantity: i32,
    pub line_total: Decimal,
    pub notes: Option<String>,
}

/// Order history row.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct OrderSummary {
    pub id: OrderId,
    pub order_number: String,
    pub status: OrderStatus,
    pub total_amount: Decimal,
    pub item_count: i64,
    pub item_names: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl OrderSummary {
    #[must_use]
    pub fn placed_on(&self) -> String {
        format_date(self.created_at)
    }

    /// Item names joined for the history list.
    #[must_use]
    pub fn items_preview(&self) -> String {
        const SHOWN: usize = 3;
        let mut preview = self
            .item_names
            .iter()
            .take(SHOWN)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        if self.item_names.len() > SHOWN {
            preview.push_str(&format!(" +{} more", self.item_names.len() - SHOWN));
        }
        preview
    }
}

fn format_date(at: DateTime<Utc>) -> String {
    at.format("%-d %b %Y").to_string()
}

impl OrderRecord for OrderSummary {
    fn order_number(&self) -> &str {
        &self.order_number
    }

    fn status(&self) -> OrderStatus {
        self.status
    }

    fn search_terms(&self) -> Vec<&str> {
        self.item_names.iter().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn summary(names: &[&str]) -> OrderSummary {
        OrderSummary {
            id: OrderId::new(1),
            order_number: "PS-20261019-000001".to_string(),
            status: OrderStatus::Pending,
            total_amount: Decimal::new(125_000, 0),
            item_count: i64::try_from(names.len()).unwrap(),
            item_names: names.iter().map(ToString::to_string).collect(),
            created_at: Utc.with_ymd_and_hms(2026, 10, 9, 3, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_items_preview_truncates() {
        let order = summary(&["Flyers", "Posters", "Stickers", "Banners", "Mugs"]);
        assert_eq!(order.items_preview(), "Flyers, Posters, Stickers +2 more");
        assert_eq!(summary(&["Flyers"]).items_preview(), "Flyers");
    }

    #[test]
    fn test_placed_on() {
        assert_eq!(summary(&[]).placed_on(), "9 Oct 2026");
    }
}
