//! Promo code management.

use sqlx::PgPool;

use printshop_core::PromoId;

use super::{RepositoryError, conflict_on_unique};
use crate::forms::ValidPromo;
use crate::models::Promo;

const PROMO_SELECT: &str = r"
    SELECT id, code, description, kind, value, min_order_amount, max_uses,
           used_count, starts_at, ends_at, is_active
    FROM shop.promo
";

const CODE_TAKEN: &str = "A promo with this code already exists";

/// Repository for promo codes.
pub struct PromoRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PromoRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All promos, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Promo>, RepositoryError> {
        let promos = sqlx::query_as::<_, Promo>(&format!("{PROMO_SELECT} ORDER BY created_at DESC"))
            .fetch_all(self.pool)
            .await?;
        Ok(promos)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: PromoId) -> Result<Option<Promo>, RepositoryError> {
        let promo = sqlx::query_as::<_, Promo>(&format!("{PROMO_SELECT} WHERE id = $1"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(promo)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the code is taken.
    pub async fn create(&self, promo: &ValidPromo) -> Result<PromoId, RepositoryError> {
        let id: PromoId = sqlx::query_scalar(
            r"
            INSERT INTO shop.promo
                (code, description, kind, value, min_order_amount, max_uses,
                 starts_at, ends_at, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id
            ",
        )
        .bind(&promo.code)
        .bind(&promo.description)
        .bind(promo.kind)
        .bind(promo.value)
        .bind(promo.min_order_amount)
        .bind(promo.max_uses)
        .bind(promo.starts_at)
        .bind(promo.ends_at)
        .bind(promo.is_active)
        .fetch_one(self.pool)
        .await
        .map_err(conflict_on_unique(CODE_TAKEN))?;
        Ok(id)
    }

    /// Update a promo. `used_count` is left alone.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the promo doesn't exist.
    /// Returns `RepositoryError::Conflict` if the code is taken.
    pub async fn update(&self, id: PromoId, promo: &ValidPromo) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE shop.promo
            SET code = $2, description = $3, kind = $4, value = $5, min_order_amount = $6,
                max_uses = $7, starts_at = $8, ends_at = $9, is_active = $10
            WHERE id = $1
            ",
        )
        .bind(id)
        .bind(&promo.code)
        .bind(&promo.description)
        .bind(promo.kind)
        .bind(promo.value)
        .bind(promo.min_order_amount)
        .bind(promo.max_uses)
        .bind(promo.starts_at)
        .bind(promo.ends_at)
        .bind(promo.is_active)
        .execute(self.pool)
        .await
        .map_err(conflict_on_unique(CODE_TAKEN))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Flip `is_active` and return the new value.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the promo doesn't exist.
    pub async fn toggle_active(&self, id: PromoId) -> Result<bool, RepositoryError> {
        sqlx::query_scalar(
            "UPDATE shop.promo SET is_active = NOT is_active WHERE id = $1 RETURNING is_active",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    /// Delete a promo. Orders keep the code as a text snapshot.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the promo doesn't exist.
    pub async fn delete(&self, id: PromoId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM shop.promo WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
