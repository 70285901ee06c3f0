//! Demo data seeding.
//!
//! Reads a YAML file of categories (with their products) and promo codes and
//! inserts whatever is missing. Rows are matched by category/product slug and
//! promo code, so re-running the seed never duplicates or overwrites data.
//! Settings rows are written with defaults only when absent.

use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::{PgPool, Postgres, Transaction};
use thiserror::Error;

use printshop_core::{PromoKind, StoreSettings};

use super::{ConnectError, connect};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error(transparent)]
    Connect(#[from] ConnectError),

    #[error("Cannot read {0}: {1}")]
    Read(String, std::io::Error),

    #[error("Invalid seed file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid seed data: {0}")]
    Invalid(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Top-level seed file.
#[derive(Debug, Deserialize)]
pub struct DemoSeed {
    #[serde(default)]
    pub categories: Vec<SeedCategory>,
    #[serde(default)]
    pub promos: Vec<SeedPromo>,
}

#[derive(Debug, Deserialize)]
pub struct SeedCategory {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default)]
    pub products: Vec<SeedProduct>,
}

#[derive(Debug, Deserialize)]
pub struct SeedProduct {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
    pub base_price: Decimal,
    #[serde(default = "default_unit")]
    pub unit: String,
    #[serde(default = "default_min_quantity")]
    pub min_quantity: i32,
    #[serde(default = "default_turnaround_days")]
    pub turnaround_days: i32,
    pub image_url: Option<String>,
    #[serde(default)]
    pub is_featured: bool,
}

#[derive(Debug, Deserialize)]
pub struct SeedPromo {
    pub code: String,
    #[serde(default)]
    pub description: String,
    pub kind: PromoKind,
    pub value: Decimal,
    pub min_order_amount: Option<Decimal>,
    pub max_uses: Option<i32>,
}

fn default_unit() -> String {
    "pcs".to_string()
}

const fn default_min_quantity() -> i32 {
    1
}

const fn default_turnaround_days() -> i32 {
    3
}

impl DemoSeed {
    /// Reject data the database constraints would refuse, with a readable
    /// message instead of a constraint name.
    ///
    /// # Errors
    ///
    /// Returns `SeedError::Invalid` describing the first problem found.
    pub fn validate(&self) -> Result<(), SeedError> {
        for category in &self.categories {
            if category.slug.trim().is_empty() {
                return Err(SeedError::Invalid(format!(
                    "category {:?} has no slug",
                    category.name
                )));
            }
            for product in &category.products {
                if product.slug.trim().is_empty() {
                    return Err(SeedError::Invalid(format!(
                        "product {:?} has no slug",
                        product.name
                    )));
                }
                if product.base_price.is_sign_negative() || product.min_quantity < 1 {
                    return Err(SeedError::Invalid(format!(
                        "product {:?} needs a non-negative price and a minimum quantity of at least 1",
                        product.slug
                    )));
                }
            }
        }
        for promo in &self.promos {
            if promo.code.trim().is_empty() {
                return Err(SeedError::Invalid("promo without a code".to_string()));
            }
            if promo.kind == PromoKind::Percentage && promo.value > Decimal::ONE_HUNDRED {
                return Err(SeedError::Invalid(format!(
                    "promo {} exceeds 100%",
                    promo.code
                )));
            }
        }
        Ok(())
    }
}

/// Counts of rows actually inserted.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub categories: u64,
    pub products: u64,
    pub promos: u64,
    pub settings: u64,
}

/// Load the demo seed file and insert missing rows.
///
/// # Errors
///
/// Returns `SeedError` if the file cannot be read or parsed, or a database
/// write fails. All writes happen in one transaction.
pub async fn demo(file: &str) -> Result<(), SeedError> {
    let content = tokio::fs::read_to_string(Path::new(file))
        .await
        .map_err(|e| SeedError::Read(file.to_string(), e))?;
    let seed: DemoSeed = serde_yaml::from_str(&content)?;
    seed.validate()?;
    tracing::info!(
        path = %file,
        categories = seed.categories.len(),
        promos = seed.promos.len(),
        "Parsed seed file"
    );

    let pool = connect().await?;
    let summary = apply(&pool, &seed).await?;

    tracing::info!("Seeding complete!");
    tracing::info!("  Categories inserted: {}", summary.categories);
    tracing::info!("  Products inserted: {}", summary.products);
    tracing::info!("  Promo codes inserted: {}", summary.promos);
    tracing::info!("  Settings rows inserted: {}", summary.settings);
    Ok(())
}

async fn apply(pool: &PgPool, seed: &DemoSeed) -> Result<SeedSummary, SeedError> {
    let mut tx = pool.begin().await?;
    let mut summary = SeedSummary::default();

    for category in &seed.categories {
        summary.categories += sqlx::query(
            "INSERT INTO shop.category (name, slug, description, sort_order)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (slug) DO NOTHING",
        )
        .bind(&category.name)
        .bind(category.slug.trim())
        .bind(&category.description)
        .bind(category.sort_order)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let category_id: i32 = sqlx::query_scalar("SELECT id FROM shop.category WHERE slug = $1")
            .bind(category.slug.trim())
            .fetch_one(&mut *tx)
            .await?;

        for product in &category.products {
            summary.products += insert_product(&mut tx, category_id, product).await?;
        }
    }

    for promo in &seed.promos {
        summary.promos += sqlx::query(
            "INSERT INTO shop.promo (code, description, kind, value, min_order_amount, max_uses)
             VALUES ($1, $2, $3, $4, $5, $6)
             ON CONFLICT (code) DO NOTHING",
        )
        .bind(promo.code.trim().to_uppercase())
        .bind(&promo.description)
        .bind(promo.kind)
        .bind(promo.value)
        .bind(promo.min_order_amount)
        .bind(promo.max_uses)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    }

    let defaults = StoreSettings::default();
    for (key, value) in [
        (StoreSettings::GENERAL_KEY, serde_json::to_value(&defaults.general)?),
        (StoreSettings::SHIPPING_KEY, serde_json::to_value(&defaults.shipping)?),
        (StoreSettings::ORDERS_KEY, serde_json::to_value(&defaults.orders)?),
    ] {
        summary.settings += sqlx::query(
            "INSERT INTO shop.setting (key, value) VALUES ($1, $2) ON CONFLICT (key) DO NOTHING",
        )
        .bind(key)
        .bind(value)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    }

    tx.commit().await?;
    Ok(summary)
}

async fn insert_product(
    tx: &mut Transaction<'_, Postgres>,
    category_id: i32,
    product: &SeedProduct,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO shop.product
            (category_id, name, slug, description, base_price, unit, min_quantity,
             turnaround_days, image_url, is_featured)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
         ON CONFLICT (slug) DO NOTHING",
    )
    .bind(category_id)
    .bind(&product.name)
    .bind(product.slug.trim())
    .bind(&product.description)
    .bind(product.base_price)
    .bind(&product.unit)
    .bind(product.min_quantity)
    .bind(product.turnaround_days)
    .bind(&product.image_url)
    .bind(product.is_featured)
    .execute(&mut **tx)
    .await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    const DEMO: &str = include_str!("../../../../seeds/demo.yaml");

    #[test]
    fn test_bundled_demo_seed_parses_and_validates() {
        let seed: DemoSeed = serde_yaml::from_str(DEMO).unwrap();
        assert!(!seed.categories.is_empty());
        assert!(seed.categories.iter().all(|c| !c.products.is_empty()));
        assert!(!seed.promos.is_empty());
        seed.validate().unwrap();
    }

    #[test]
    fn test_defaults_fill_optional_product_fields() {
        let seed: DemoSeed = serde_yaml::from_str(
            r#"
categories:
  - name: Stickers
    slug: stickers
    products:
      - name: Vinyl Sticker
        slug: vinyl-sticker
        base_price: "2500"
"#,
        )
        .unwrap();
        let product = &seed.categories[0].products[0];
        assert_eq!(product.unit, "pcs");
        assert_eq!(product.min_quantity, 1);
        assert_eq!(product.turnaround_days, 3);
        assert_eq!(product.base_price, Decimal::new(2500, 0));
        assert!(seed.promos.is_empty());
    }

    #[test]
    fn test_validate_rejects_oversized_percentage() {
        let seed: DemoSeed = serde_yaml::from_str(
            r#"
promos:
  - code: TOOMUCH
    kind: percentage
    value: "150"
"#,
        )
        .unwrap();
        assert!(matches!(seed.validate(), Err(SeedError::Invalid(_))));
    }
}
