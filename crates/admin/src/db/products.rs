//! Product management.

use sqlx::PgPool;

use printshop_core::ProductId;

use super::{RepositoryError, conflict_on_unique};
use crate::forms::ValidProduct;
use crate::models::Product;

const PRODUCT_SELECT: &str = r"
    SELECT p.id, p.category_id, c.name AS category_name, c.slug AS category_slug,
           p.name, p.slug, p.description, p.base_price, p.unit, p.min_quantity,
           p.turnaround_days, p.image_url, p.is_featured, p.is_active, p.updated_at
    FROM shop.product p
    JOIN shop.category c ON c.id = p.category_id
";

const SLUG_TAKEN: &str = "Another product already uses this slug";

/// What happened to a product the admin asked to delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// Orders reference the product, so it was deactivated instead.
    Deactivated { order_count: i64 },
}

/// Repository for products, including inactive ones.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Every product, by category order then name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "{PRODUCT_SELECT} ORDER BY c.sort_order, c.name, p.name"
        ))
        .fetch_all(self.pool)
        .await?;
        Ok(products)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!("{PRODUCT_SELECT} WHERE p.id = $1"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(product)
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the slug is taken.
    pub async fn create(&self, product: &ValidProduct) -> Result<ProductId, RepositoryError> {
        let id: ProductId = sqlx::query_scalar(
            r"
            INSERT INTO shop.product
                (category_id, name, slug, description, base_price, unit, min_quantity,
                 turnaround_days, image_url, is_featured, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id
            ",
        )
        .bind(product.category_id)
        .bind(&product.name)
        .bind(&product.slug)
        .bind(&product.description)
        .bind(product.base_price)
        .bind(&product.unit)
        .bind(product.min_quantity)
        .bind(product.turnaround_days)
        .bind(product.image_url.as_deref())
        .bind(product.is_featured)
        .bind(product.is_active)
        .fetch_one(self.pool)
        .await
        .map_err(conflict_on_unique(SLUG_TAKEN))?;
        Ok(id)
    }

    /// Update a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Conflict` if the slug is taken.
    pub async fn update(&self, id: ProductId, product: &ValidProduct) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE shop.product
            SET category_id = $2, name = $3, slug = $4, description = $5, base_price = $6,
                unit = $7, min_quantity = $8, turnaround_days = $9, image_url = $10,
                is_featured = $11, is_active = $12
            WHERE id = $1
            ",
        )
        .bind(id)
        .bind(product.category_id)
        .bind(&product.name)
        .bind(&product.slug)
        .bind(&product.description)
        .bind(product.base_price)
        .bind(&product.unit)
        .bind(product.min_quantity)
        .bind(product.turnaround_days)
        .bind(product.image_url.as_deref())
        .bind(product.is_featured)
        .bind(product.is_active)
        .execute(self.pool)
        .await
        .map_err(conflict_on_unique(SLUG_TAKEN))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Flip `is_active` and return the new value.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    pub async fn toggle_active(&self, id: ProductId) -> Result<bool, RepositoryError> {
        sqlx::query_scalar(
            "UPDATE shop.product SET is_active = NOT is_active WHERE id = $1 RETURNING is_active",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    /// Delete a product, or deactivate it when orders still reference it.
    ///
    /// Both the check and the write happen in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    pub async fn delete_or_deactivate(&self, id: ProductId) -> Result<DeleteOutcome, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let exists: Option<i32> =
            sqlx::query_scalar("SELECT id FROM shop.product WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        if exists.is_none() {
            return Err(RepositoryError::NotFound);
        }

        let order_count: i64 = sqlx::query_scalar(
            "SELECT COUNT(DISTINCT order_id) FROM shop.order_item WHERE product_id = $1",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        let outcome = if order_count > 0 {
            sqlx::query("UPDATE shop.product SET is_active = FALSE WHERE id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            DeleteOutcome::Deactivated { order_count }
        } else {
            sqlx::query("DELETE FROM shop.product WHERE id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            DeleteOutcome::Deleted
        };

        tx.commit().await?;
        Ok(outcome)
    }
}
