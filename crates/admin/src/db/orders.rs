//! Order management and dashboard figures.

use rust_decimal::Decimal;
use sqlx::PgPool;

use printshop_core::{OrderId, OrderStatus};

use super::RepositoryError;
use crate::models::{Order, OrderItem, OrderSummary, StatusCount};

const SUMMARY_SELECT: &str = r"
    SELECT o.id, o.order_number, o.status, u.full_name AS customer_name,
           u.email AS customer_email, o.recipient_name, o.total_amount,
           (SELECT COUNT(*) FROM shop.order_item i WHERE i.order_id = o.id) AS item_count,
           o.created_at
    FROM shop.order o
    JOIN storefront.user u ON u.id = o.user_id
";

/// Largest order list loaded for in-memory filtering.
pub const ORDER_LIST_LIMIT: i64 = 500;

/// Figures shown on the dashboard.
#[derive(Debug, Clone, Default)]
pub struct DashboardStats {
    /// One entry per status, zero counts included, in lifecycle order.
    pub status_counts: Vec<StatusCount>,
    pub total_orders: i64,
    /// Sum of `total_amount` over completed orders.
    pub completed_revenue: Decimal,
}

impl DashboardStats {
    fn from_counts(counts: &[StatusCount], completed_revenue: Decimal) -> Self {
        let status_counts: Vec<StatusCount> = OrderStatus::ALL
            .into_iter()
            .map(|status| StatusCount {
                status,
                count: counts
                    .iter()
                    .find(|c| c.status == status)
                    .map_or(0, |c| c.count),
            })
            .collect();
        let total_orders = status_counts.iter().map(|c| c.count).sum();
        Self {
            status_counts,
            total_orders,
            completed_revenue,
        }
    }

    /// Orders still needing work (not completed or cancelled).
    #[must_use]
    pub fn open_orders(&self) -> i64 {
        self.status_counts
            .iter()
            .filter(|c| !c.status.is_terminal())
            .map(|c| c.count)
            .sum()
    }
}

/// Repository for orders across all customers.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Most recent orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_recent(&self, limit: i64) -> Result<Vec<OrderSummary>, RepositoryError> {
        let orders = sqlx::query_as::<_, OrderSummary>(&format!(
            "{SUMMARY_SELECT} ORDER BY o.created_at DESC, o.id DESC LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(self.pool)
        .await?;
        Ok(orders)
    }

    /// An order by its number, with customer details.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_number(&self, order_number: &str) -> Result<Option<Order>, RepositoryError> {
        let order = sqlx::query_as::<_, Order>(
            r"
            SELECT o.id, o.order_number, o.user_id, u.full_name AS customer_name,
                   u.email AS customer_email, o.status, o.subtotal, o.discount,
                   o.shipping_fee, o.total_amount, o.promo_code, o.recipient_name,
                   o.phone, o.address, o.city, o.province, o.postal_code, o.notes,
                   o.created_at, o.updated_at
            FROM shop.order o
            JOIN storefront.user u ON u.id = o.user_id
            WHERE o.order_number = $1
            ",
        )
        .bind(order_number)
        .fetch_optional(self.pool)
        .await?;
        Ok(order)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn items(&self, order_id: OrderId) -> Result<Vec<OrderItem>, RepositoryError> {
        let items = sqlx::query_as::<_, OrderItem>(
            r"
            SELECT id, product_id, product_name, unit_price, quantity, line_total, notes
            FROM shop.order_item
            WHERE order_id = $1
            ORDER BY id
            ",
        )
        .bind(order_id)
        .fetch_all(self.pool)
        .await?;
        Ok(items)
    }

    /// Move an order from `from` to `to`.
    ///
    /// The update only applies if the order is still in `from`, so two
    /// admins changing the same order cannot skip the transition check.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the status changed meanwhile.
    pub async fn update_status(
        &self,
        id: OrderId,
        from: OrderStatus,
        to: OrderStatus,
    ) -> Result<(), RepositoryError> {
        let result =
            sqlx::query("UPDATE shop.order SET status = $3 WHERE id = $1 AND status = $2")
                .bind(id)
                .bind(from)
                .bind(to)
                .execute(self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::Conflict(
                "The order was updated by someone else, please reload".to_string(),
            ));
        }
        Ok(())
    }

    /// Status counts and completed revenue for the dashboard.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn dashboard_stats(&self) -> Result<DashboardStats, RepositoryError> {
        let counts = sqlx::query_as::<_, StatusCount>(
            "SELECT status, COUNT(*) AS count FROM shop.order GROUP BY status",
        )
        .fetch_all(self.pool)
        .await?;

        let revenue: Decimal = sqlx::query_scalar(
            "SELECT COALESCE(SUM(total_amount), 0) FROM shop.order WHERE status = 'completed'",
        )
        .fetch_one(self.pool)
        .await?;

        Ok(DashboardStats::from_counts(&counts, revenue))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_fill_missing_statuses() {
        let counts = [
            StatusCount {
                status: OrderStatus::Pending,
                count: 4,
            },
            StatusCount {
                status: OrderStatus::Completed,
                count: 10,
            },
        ];
        let stats = DashboardStats::from_counts(&counts, Decimal::new(1_250_000, 0));

        assert_eq!(stats.status_counts.len(), OrderStatus::ALL.len());
        assert_eq!(stats.status_counts[0].status, OrderStatus::Pending);
        assert_eq!(stats.status_counts[0].count, 4);
        assert_eq!(stats.status_counts[1].count, 0);
        assert_eq!(stats.total_orders, 14);
        assert_eq!(stats.open_orders(), 4);
        assert_eq!(stats.completed_revenue, Decimal::new(1_250_000, 0));
    }
}
