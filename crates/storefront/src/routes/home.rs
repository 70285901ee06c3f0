//! Home page route handler.

use std::sync::Arc;

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use crate::db::CatalogRepository;
use crate::error::AppError;
use crate::filters;
use crate::models::{Category, Product};
use crate::routes::PageContext;
use crate::state::AppState;

/// Number of products shown on the home page.
const FEATURED_LIMIT: i64 = 8;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub page: PageContext,
    pub categories: Arc<Vec<Category>>,
    pub featured: Vec<Product>,
}

/// Display the home page: categories and featured products.
#[instrument(skip(state, page))]
pub async fn home(
    State(state): State<AppState>,
    page: PageContext,
) -> Result<impl IntoResponse, AppError> {
    let categories = state.categories().await?;
    let featured = CatalogRepository::new(state.pool())
        .featured_products(FEATURED_LIMIT)
        .await?;

    Ok(HomeTemplate {
        page,
        categories,
        featured,
    })
}
