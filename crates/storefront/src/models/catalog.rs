//! Catalog records.

use rust_decimal::Decimal;
use serde::Serialize;

use printshop_core::filter::CatalogRecord;
use printshop_core::{CategoryId, ProductId};

/// A product category.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub sort_order: i32,
    /// Number of active products, filled by the listing query.
    pub product_count: i64,
}

/// A printable product, joined with its category.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Product {
    pub id: ProductId,
    pub category_id: CategoryId,
    pub category_name: String,
    pub category_slug: String,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub base_price: Decimal,
    /// Unit label, e.g. `pcs`, `sheet`, `m²`.
    pub unit: String,
    pub min_quantity: i32,
    pub turnaround_days: i32,
    pub image_url: Option<String>,
    pub is_featured: bool,
    pub is_active: bool,
}

impl Product {
    /// Minimum order quantity as a cart quantity.
    #[must_use]
    pub fn min_order_quantity(&self) -> u32 {
        u32::try_from(self.min_quantity).unwrap_or(1).max(1)
    }
}

impl CatalogRecord for Product {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn category_slug(&self) -> &str {
        &self.category_slug
    }

    fn is_active(&self) -> bool {
        self.is_active
    }
}
