//! Category management.

use sqlx::PgPool;

use printshop_core::CategoryId;

use super::{RepositoryError, conflict_on_unique};
use crate::forms::ValidCategory;
use crate::models::Category;

const CATEGORY_SELECT: &str = r"
    SELECT c.id, c.name, c.slug, c.description, c.sort_order, c.is_active,
           COUNT(p.id) AS product_count
    FROM shop.category c
    LEFT JOIN shop.product p ON p.category_id = c.id
";

const SLUG_TAKEN: &str = "Another category already uses this slug";

/// Repository for categories, including inactive ones.
pub struct CategoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CategoryRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All categories in display order with their product counts.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Category>, RepositoryError> {
        let categories = sqlx::query_as::<_, Category>(&format!(
            "{CATEGORY_SELECT} GROUP BY c.id ORDER BY c.sort_order, c.name"
        ))
        .fetch_all(self.pool)
        .await?;
        Ok(categories)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: CategoryId) -> Result<Option<Category>, RepositoryError> {
        let category = sqlx::query_as::<_, Category>(&format!(
            "{CATEGORY_SELECT} WHERE c.id = $1 GROUP BY c.id"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;
        Ok(category)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the slug is taken.
    pub async fn create(&self, category: &ValidCategory) -> Result<CategoryId, RepositoryError> {
        let id: CategoryId = sqlx::query_scalar(
            r"
            INSERT INTO shop.category (name, slug, description, sort_order, is_active)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            ",
        )
        .bind(&category.name)
        .bind(&category.slug)
        .bind(&category.description)
        .bind(category.sort_order)
        .bind(category.is_active)
        .fetch_one(self.pool)
        .await
        .map_err(conflict_on_unique(SLUG_TAKEN))?;
        Ok(id)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the category doesn't exist.
    /// Returns `RepositoryError::Conflict` if the slug is taken.
    pub async fn update(&self, id: CategoryId, category: &ValidCategory) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE shop.category
            SET name = $2, slug = $3, description = $4, sort_order = $5, is_active = $6
            WHERE id = $1
            ",
        )
        .bind(id)
        .bind(&category.name)
        .bind(&category.slug)
        .bind(&category.description)
        .bind(category.sort_order)
        .bind(category.is_active)
        .execute(self.pool)
        .await
        .map_err(conflict_on_unique(SLUG_TAKEN))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Delete a category that no product references.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if products still belong to it.
    /// Returns `RepositoryError::NotFound` if the category doesn't exist.
    pub async fn delete(&self, id: CategoryId) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let product_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM shop.product WHERE category_id = $1")
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;
        if product_count > 0 {
            return Err(RepositoryError::Conflict(format!(
                "This category still has {product_count} product(s). Move or delete them first."
            )));
        }

        let result = sqlx::query("DELETE FROM shop.category WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        tx.commit().await?;
        Ok(())
    }
}
