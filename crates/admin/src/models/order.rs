//! Orders as seen by shop staff.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use printshop_core::filter::OrderRecord;
use printshop_core::{OrderId, OrderItemId, OrderStatus, ProductId, UserId};

/// Order list row.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OrderSummary {
    pub id: OrderId,
    pub order_number: String,
    pub status: OrderStatus,
    pub customer_name: String,
    pub customer_email: String,
    pub recipient_name: String,
    pub total_amount: Decimal,
    pub item_count: i64,
    pub created_at: DateTime<Utc>,
}

impl OrderSummary {
    #[must_use]
    pub fn placed_at(&self) -> String {
        format_timestamp(self.created_at)
    }
}

impl OrderRecord for OrderSummary {
    fn order_number(&self) -> &str {
        &self.order_number
    }

    fn status(&self) -> OrderStatus {
        self.status
    }

    fn search_terms(&self) -> Vec<&str> {
        vec![&self.customer_name, &self.customer_email, &self.recipient_name]
    }
}

/// Full order with customer and shipping snapshot.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Order {
    pub id: OrderId,
    pub order_number: String,
    pub user_id: UserId,
    pub customer_name: String,
    pub customer_email: String,
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
    pub updated_at: DateTime<Utc>,
}

impl Order {
    #[must_use]
    pub fn placed_at(&self) -> String {
        format_timestamp(self.created_at)
    }

    #[must_use]
    pub fn updated(&self) -> String {
        format_timestamp(self.updated_at)
    }

    #[must_use]
    pub fn shipping_line(&self) -> String {
        format!(
            "{}, {}, {} {}",
            self.address, self.city, self.province, self.postal_code
        )
    }

    /// Statuses this order may move to next, in lifecycle order.
    #[must_use]
    pub fn next_statuses(&self) -> Vec<OrderStatus> {
        OrderStatus::ALL
            .into_iter()
            .filter(|next| self.status.can_transition_to(*next))
            .collect()
    }
}

/// One order line. Name and price are snapshots taken at checkout.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub product_id: Option<ProductId>,
    pub product_name: String,
    pub unit_price: Decimal,
    pub quantity: i32,
    pub line_total: Decimal,
    pub notes: Option<String>,
}

/// Number of orders in one status (dashboard).
#[derive(Debug, Clone, Copy, sqlx::FromRow)]
pub struct StatusCount {
    pub status: OrderStatus,
    pub count: i64,
}

fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format("%-d %b %Y %H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use printshop_core::filter::OrderFilter;

    use super::*;

    fn summary(number: &str, status: OrderStatus, email: &str) -> OrderSummary {
        OrderSummary {
            id: OrderId::new(1),
            order_number: number.to_string(),
            status,
            customer_name: "Sari Wulandari".to_string(),
            customer_email: email.to_string(),
            recipient_name: "Budi".to_string(),
            total_amount: Decimal::new(250_000, 0),
            item_count: 2,
            created_at: Utc.with_ymd_and_hms(2026, 10, 2, 9, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_filter_matches_customer_email() {
        let orders = vec![
            summary("PS-000001", OrderStatus::Pending, "sari@cetak.id"),
            summary("PS-000002", OrderStatus::Shipped, "andi@cetak.id"),
        ];
        let filter = OrderFilter::from_query(Some("ANDI@"), None);
        let found = filter.apply(&orders);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].order_number, "PS-000002");
    }

    #[test]
    fn test_filter_by_status() {
        let orders = vec![
            summary("PS-000001", OrderStatus::Pending, "sari@cetak.id"),
            summary("PS-000002", OrderStatus::Shipped, "andi@cetak.id"),
        ];
        let filter = OrderFilter::from_query(None, Some("pending"));
        assert_eq!(filter.apply(&orders).len(), 1);
    }

    #[test]
    fn test_placed_at_format() {
        let order = summary("PS-000001", OrderStatus::Pending, "sari@cetak.id");
        assert_eq!(order.placed_at(), "2 Oct 2026 09:30");
    }
}
