//! Category route handlers.

use std::sync::Arc;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use tracing::instrument;

use printshop_core::filter::CatalogFilter;

use crate::db::CatalogRepository;
use crate::error::AppError;
use crate::filters;
use crate::models::{Category, Product};
use crate::routes::PageContext;
use crate::state::AppState;

/// Category listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "categories/index.html")]
pub struct CategoriesIndexTemplate {
    pub page: PageContext,
    pub categories: Arc<Vec<Category>>,
}

/// Category page template.
#[derive(Template, WebTemplate)]
#[template(path = "categories/show.html")]
pub struct CategoryShowTemplate {
    pub page: PageContext,
    pub category: Category,
    pub products: Vec<Product>,
}

/// Display all active categories.
#[instrument(skip(state, page))]
pub async fn index(
    State(state): State<AppState>,
    page: PageContext,
) -> Result<impl IntoResponse, AppError> {
    let categories = state.categories().await?;
    Ok(CategoriesIndexTemplate { page, categories })
}

/// Display one category with its products.
#[instrument(skip(state, page))]
pub async fn show(
    State(state): State<AppState>,
    page: PageContext,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let category = state
        .categories()
        .await?
        .iter()
        .find(|c| c.slug == slug)
        .cloned()
        .ok_or_else(|| AppError::NotFound("Category".to_string()))?;

    let all = CatalogRepository::new(state.pool()).list_products().await?;
    let products = CatalogFilter::from_query(None, Some(&category.slug), None)
        .only_active()
        .apply(&all)
        .into_iter()
        .cloned()
        .collect();

    Ok(CategoryShowTemplate {
        page,
        category,
        products,
    })
}
