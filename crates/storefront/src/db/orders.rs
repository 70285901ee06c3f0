//! Order repository (customer side).

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::PgPool;

use printshop_core::pricing::OrderTotals;
use printshop_core::{OrderId, ProductId, PromoId, UserId};

use super::RepositoryError;
use crate::models::{Address, Order, OrderItem, OrderSummary};

const ORDER_COLUMNS: &str = "id, order_number, status, subtotal, discount, shipping_fee, \
                             total_amount, promo_code, recipient_name, phone, address, city, \
                             province, postal_code, notes, created_at";

/// A priced order line ready to be stored.
#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub product_id: ProductId,
    pub product_name: String,
    pub unit_price: Decimal,
    pub quantity: i32,
    pub notes: Option<String>,
}

impl NewOrderItem {
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Everything needed to place an order.
#[derive(Debug, Clone)]
pub struct NewOrder<'a> {
    pub user_id: UserId,
    pub order_number_prefix: &'a str,
    pub items: Vec<NewOrderItem>,
    pub totals: OrderTotals,
    pub promo: Option<(PromoId, String)>,
    pub shipping: &'a Address,
    pub notes: Option<String>,
}

/// Repository for the logged-in customer's orders.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Order history for a user, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(
        &self,
        user_id: UserId,
        limit: Option<i64>,
    ) -> Result<Vec<OrderSummary>, RepositoryError> {
        let orders = sqlx::query_as::<_, OrderSummary>(
            r"
            SELECT o.id, o.order_number, o.status, o.total_amount, o.created_at,
                   COUNT(i.id) AS item_count,
                   COALESCE(ARRAY_AGG(i.product_name ORDER BY i.id)
                            FILTER (WHERE i.id IS NOT NULL), '{}') AS item_names
            FROM shop.order o
            LEFT JOIN shop.order_item i ON i.order_id = o.id
            WHERE o.user_id = $1
            GROUP BY o.id
            ORDER BY o.created_at DESC, o.id DESC
            LIMIT $2
            ",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;
        Ok(orders)
    }

    /// One order with its items, scoped to its owner.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get_by_number(
        &self,
        user_id: UserId,
        order_number: &str,
    ) -> Result<Option<(Order, Vec<OrderItem>)>, RepositoryError> {
        let Some(order) = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM shop.order WHERE order_number = $1 AND user_id = $2"
        ))
        .bind(order_number)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?
        else {
            return Ok(None);
        };

        let items = self.items(order.id).await?;
        Ok(Some((order, items)))
    }

    async fn items(&self, order_id: OrderId) -> Result<Vec<OrderItem>, RepositoryError> {
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

    /// Place an order: header, items and promo usage in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the promo ran out of uses
    /// while the order was being placed.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn place(&self, order: NewOrder<'_>) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let sequence: i64 = sqlx::query_scalar("SELECT nextval('shop.order_number_seq')")
            .fetch_one(&mut *tx)
            .await?;
        let order_number = format_order_number(order.order_number_prefix, Utc::now(), sequence);

        if let Some((promo_id, _)) = &order.promo {
            let claimed = sqlx::query(
                r"
                UPDATE shop.promo
                SET used_count = used_count + 1
                WHERE id = $1 AND is_active
                  AND (max_uses IS NULL OR used_count < max_uses)
                ",
            )
            .bind(promo_id)
            .execute(&mut *tx)
            .await?;

            if claimed.rows_affected() == 0 {
                return Err(RepositoryError::Conflict(
                    "promo code is no longer available".to_owned(),
                ));
            }
        }

        let address = order.shipping;
        let placed = sqlx::query_as::<_, Order>(&format!(
            r"
            INSERT INTO shop.order
                (order_number, user_id, subtotal, discount, shipping_fee, total_amount,
                 promo_code, recipient_name, phone, address, city, province, postal_code, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING {ORDER_COLUMNS}
            "
        ))
        .bind(&order_number)
        .bind(order.user_id)
        .bind(order.totals.subtotal)
        .bind(order.totals.discount)
        .bind(order.totals.shipping_fee)
        .bind(order.totals.total)
        .bind(order.promo.as_ref().map(|(_, code)| code.as_str()))
        .bind(&address.recipient_name)
        .bind(&address.phone)
        .bind(&address.address)
        .bind(&address.city)
        .bind(&address.province)
        .bind(&address.postal_code)
        .bind(order.notes.as_deref())
        .fetch_one(&mut *tx)
        .await?;

        for item in &order.items {
            sqlx::query(
                r"
                INSERT INTO shop.order_item
                    (order_id, product_id, product_name, unit_price, quantity, line_total, notes)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                ",
            )
            .bind(placed.id)
            .bind(item.product_id)
            .bind(&item.product_name)
            .bind(item.unit_price)
            .bind(item.quantity)
            .bind(item.line_total())
            .bind(item.notes.as_deref())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::info!(
            order_number = %placed.order_number,
            user_id = %order.user_id,
            total = %placed.total_amount,
            "order placed"
        );
        Ok(placed)
    }
}

/// `PS-20261019-000042`
fn format_order_number(prefix: &str, now: chrono::DateTime<Utc>, sequence: i64) -> String {
    let prefix = prefix.trim();
    let prefix = if prefix.is_empty() { "PS" } else { prefix };
    format!("{prefix}-{}-{sequence:06}", now.format("%Y%m%d"))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_format_order_number() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 8, 0, 0).unwrap();
        assert_eq!(format_order_number("PS", now, 42), "PS-20261019-000042");
        assert_eq!(format_order_number("  ", now, 1_234_567), "PS-20261019-1234567");
    }

    #[test]
    fn test_new_order_item_line_total() {
        let item = NewOrderItem {
            product_id: ProductId::new(1),
            product_name: "Business Cards".to_string(),
            unit_price: Decimal::new(350, 0),
            quantity: 200,
            notes: None,
        };
        assert_eq!(item.line_total(), Decimal::new(70_000, 0));
    }
}
