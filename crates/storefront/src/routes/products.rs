//! Product route handlers.

use std::sync::Arc;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::instrument;

use printshop_core::filter::CatalogFilter;

use crate::db::CatalogRepository;
use crate::error::AppError;
use crate::filters;
use crate::models::{Category, Product};
use crate::routes::PageContext;
use crate::state::AppState;

/// Catalog search query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    pub q: Option<String>,
    pub category: Option<String>,
}

impl CatalogQuery {
    /// Storefront listings only ever show active products.
    #[must_use]
    pub fn filter(&self) -> CatalogFilter {
        CatalogFilter::from_query(self.q.as_deref(), self.category.as_deref(), None).only_active()
    }
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub page: PageContext,
    pub products: Vec<Product>,
    pub total: usize,
    pub categories: Arc<Vec<Category>>,
    pub search: String,
    pub selected_category: String,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub page: PageContext,
    pub product: Product,
    pub related: Vec<Product>,
}

/// Display product listing page, filtered by search text and category.
#[instrument(skip(state, page))]
pub async fn index(
    State(state): State<AppState>,
    page: PageContext,
    Query(query): Query<CatalogQuery>,
) -> Result<impl IntoResponse, AppError> {
    let categories = state.categories().await?;
    let all = CatalogRepository::new(state.pool()).list_products().await?;

    let filter = query.filter();
    let products: Vec<Product> = filter.apply(&all).into_iter().cloned().collect();

    Ok(ProductsIndexTemplate {
        page,
        total: all.len(),
        products,
        categories,
        search: filter.search().unwrap_or_default().to_string(),
        selected_category: filter.category().unwrap_or_default().to_string(),
    })
}

/// Display product detail page.
#[instrument(skip(state, page))]
pub async fn show(
    State(state): State<AppState>,
    page: PageContext,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let catalog = CatalogRepository::new(state.pool());
    let product = catalog
        .get_product_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

    let related = catalog
        .list_products()
        .await?
        .into_iter()
        .filter(|p| p.category_id == product.category_id && p.id != product.id)
        .take(4)
        .collect();

    Ok(ProductShowTemplate {
        page,
        product,
        related,
    })
}
