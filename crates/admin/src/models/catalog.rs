//! Catalog records as managed by the admin.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use printshop_core::filter::CatalogRecord;
use printshop_core::{CategoryId, ProductId};

/// A category with the number of products filed under it.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub sort_order: i32,
    pub is_active: bool,
    /// All products, active or not.
    pub product_count: i64,
}

/// A product joined with its category.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Product {
    pub id: ProductId,
    pub category_id: CategoryId,
    pub category_name: String,
    pub category_slug: String,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub base_price: Decimal,
    pub unit: String,
    pub min_quantity: i32,
    pub turnaround_days: i32,
    pub image_url: Option<String>,
    pub is_featured: bool,
    pub is_active: bool,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Last edit, e.g. `19 Oct 2026 14:05`.
    #[must_use]
    pub fn updated(&self) -> String {
        self.updated_at.format("%-d %b %Y %H:%M").to_string()
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

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use printshop_core::filter::CatalogFilter;

    use super::*;

    fn product(name: &str, category: &str, active: bool) -> Product {
        Product {
            id: ProductId::new(1),
            category_id: CategoryId::new(1),
            category_name: category.to_string(),
            category_slug: category.to_lowercase(),
            name: name.to_string(),
            slug: name.to_lowercase().replace(' ', "-"),
            description: String::new(),
            base_price: Decimal::new(50_000, 0),
            unit: "pcs".to_string(),
            min_quantity: 1,
            turnaround_days: 2,
            image_url: None,
            is_featured: false,
            is_active: active,
            updated_at: Utc.with_ymd_and_hms(2026, 10, 19, 14, 5, 0).unwrap(),
        }
    }

    #[test]
    fn test_admin_filter_sees_inactive_products() {
        let products = vec![
            product("Business Cards", "Cards", true),
            product("Old Flyer", "Flyers", false),
        ];

        let all = CatalogFilter::from_query(None, None, Some("all"));
        assert_eq!(all.apply(&products).len(), 2);

        let inactive = CatalogFilter::from_query(None, None, Some("inactive"));
        let found = inactive.apply(&products);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Old Flyer");
    }

    #[test]
    fn test_updated_format() {
        assert_eq!(product("A", "B", true).updated(), "19 Oct 2026 14:05");
    }
}
