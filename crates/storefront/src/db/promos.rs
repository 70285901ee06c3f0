//! Promo code lookup.

use sqlx::PgPool;

use super::RepositoryError;
use crate::models::Promo;
use crate::models::promo::normalize_code;

/// Repository for reading promo codes at checkout.
pub struct PromoRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PromoRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Find a promo by code (case-insensitive input).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_code(&self, code: &str) -> Result<Option<Promo>, RepositoryError> {
        let promo = sqlx::query_as::<_, Promo>(
            r"
            SELECT id, code, description, kind, value, min_order_amount, max_uses,
                   used_count, starts_at, ends_at, is_active
            FROM shop.promo
            WHERE code = $1
            ",
        )
        .bind(normalize_code(code))
        .fetch_optional(self.pool)
        .await?;
        Ok(promo)
    }
}
