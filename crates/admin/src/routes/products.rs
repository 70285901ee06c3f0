//! Product management routes.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use printshop_core::filter::{ALL, CatalogFilter};
use printshop_core::ProductId;

use crate::db::{CategoryRepository, DeleteOutcome, ProductRepository, RepositoryError};
use crate::error::AppError;
use crate::filters;
use crate::forms::ProductForm;
use crate::middleware::RequireWriteAccess;
use crate::models::{Category, Product};
use crate::routes::{AdminPage, redirect_error, redirect_success};
use crate::state::AppState;

/// Query parameters for the product list.
#[derive(Debug, Default, Deserialize)]
pub struct ProductsQuery {
    pub q: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
}

/// Product list template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub page: AdminPage,
    pub products: Vec<Product>,
    pub total: usize,
    pub categories: Vec<Category>,
    pub search: String,
    pub category: String,
    pub status: String,
}

/// Product create/edit template.
#[derive(Template, WebTemplate)]
#[template(path = "products/form.html")]
pub struct ProductFormTemplate {
    pub page: AdminPage,
    /// `None` when creating.
    pub product_id: Option<ProductId>,
    pub form: ProductForm,
    pub categories: Vec<Category>,
}

impl ProductFormTemplate {
    #[must_use]
    pub fn action(&self) -> String {
        self.product_id
            .map_or_else(|| "/products".to_string(), |id| format!("/products/{id}"))
    }

    /// Storefront page of the product being edited.
    #[must_use]
    pub fn storefront_link(&self) -> Option<String> {
        self.product_id?;
        self.page
            .storefront_link(&format!("/products/{}", self.form.slug))
    }

    #[must_use]
    pub fn is_selected(&self, category: &Category) -> bool {
        self.form.category_id == category.id.to_string()
    }
}

impl From<&Product> for ProductForm {
    fn from(product: &Product) -> Self {
        Self {
            category_id: product.category_id.to_string(),
            name: product.name.clone(),
            slug: product.slug.clone(),
            description: product.description.clone(),
            base_price: product.base_price.normalize().to_string(),
            unit: product.unit.clone(),
            min_quantity: product.min_quantity.to_string(),
            turnaround_days: product.turnaround_days.to_string(),
            image_url: product.image_url.clone().unwrap_or_default(),
            is_featured: product.is_featured,
            is_active: product.is_active,
        }
    }
}

fn edit_path(id: ProductId) -> String {
    format!("/products/{id}/edit")
}

/// Product list with search, category and status filters.
///
/// GET /products
#[instrument(skip(state, page))]
pub async fn index(
    State(state): State<AppState>,
    page: AdminPage,
    Query(query): Query<ProductsQuery>,
) -> Result<ProductsIndexTemplate, AppError> {
    let all = ProductRepository::new(state.pool()).list().await?;
    let categories = CategoryRepository::new(state.pool()).list().await?;

    let filter = CatalogFilter::from_query(
        query.q.as_deref(),
        query.category.as_deref(),
        query.status.as_deref(),
    );
    let products: Vec<Product> = filter.apply(&all).into_iter().cloned().collect();

    Ok(ProductsIndexTemplate {
        page,
        total: all.len(),
        products,
        categories,
        search: query.q.unwrap_or_default(),
        category: query.category.unwrap_or_else(|| ALL.to_string()),
        status: query.status.unwrap_or_else(|| ALL.to_string()),
    })
}

/// New product form.
///
/// GET /products/new
pub async fn new_page(
    State(state): State<AppState>,
    page: AdminPage,
) -> Result<ProductFormTemplate, AppError> {
    let categories = CategoryRepository::new(state.pool()).list().await?;
    let form = ProductForm {
        category_id: categories
            .first()
            .map(|c| c.id.to_string())
            .unwrap_or_default(),
        unit: "pcs".to_string(),
        min_quantity: "1".to_string(),
        turnaround_days: "3".to_string(),
        is_active: true,
        ..ProductForm::default()
    };
    Ok(ProductFormTemplate {
        page,
        product_id: None,
        form,
        categories,
    })
}

/// Edit product form.
///
/// GET /products/{id}/edit
pub async fn edit_page(
    State(state): State<AppState>,
    page: AdminPage,
    Path(id): Path<i32>,
) -> Result<ProductFormTemplate, AppError> {
    let id = ProductId::new(id);
    let product = ProductRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;
    let categories = CategoryRepository::new(state.pool()).list().await?;

    Ok(ProductFormTemplate {
        page,
        product_id: Some(id),
        form: ProductForm::from(&product),
        categories,
    })
}

async fn rerender(
    state: &AppState,
    page: AdminPage,
    product_id: Option<ProductId>,
    form: ProductForm,
    message: &str,
) -> Result<Response, AppError> {
    let categories = CategoryRepository::new(state.pool()).list().await?;
    Ok(ProductFormTemplate {
        page: page.with_error(message),
        product_id,
        form,
        categories,
    }
    .into_response())
}

/// Create a product.
///
/// POST /products
#[instrument(skip(state, page, form), fields(admin_id = %admin.id))]
pub async fn create(
    State(state): State<AppState>,
    RequireWriteAccess(admin): RequireWriteAccess,
    page: AdminPage,
    Form(form): Form<ProductForm>,
) -> Result<Response, AppError> {
    let product = match form.validate() {
        Ok(product) => product,
        Err(errors) => return rerender(&state, page, None, form, errors.first_message()).await,
    };

    match ProductRepository::new(state.pool()).create(&product).await {
        Ok(id) => {
            tracing::info!(product_id = %id, slug = %product.slug, "product created");
            Ok(redirect_success(&edit_path(id), "Product created").into_response())
        }
        Err(RepositoryError::Conflict(message)) => {
            rerender(&state, page, None, form, &message).await
        }
        Err(RepositoryError::Database(e)) if is_foreign_key_violation(&e) => {
            rerender(&state, page, None, form, "Please choose a category").await
        }
        Err(e) => Err(e.into()),
    }
}

/// Update a product.
///
/// POST /products/{id}
#[instrument(skip(state, page, form), fields(admin_id = %admin.id))]
pub async fn update(
    State(state): State<AppState>,
    RequireWriteAccess(admin): RequireWriteAccess,
    page: AdminPage,
    Path(id): Path<i32>,
    Form(form): Form<ProductForm>,
) -> Result<Response, AppError> {
    let id = ProductId::new(id);
    let product = match form.validate() {
        Ok(product) => product,
        Err(errors) => {
            return rerender(&state, page, Some(id), form, errors.first_message()).await;
        }
    };

    match ProductRepository::new(state.pool()).update(id, &product).await {
        Ok(()) => {
            tracing::info!(product_id = %id, "product updated");
            Ok(redirect_success(&edit_path(id), "Product saved").into_response())
        }
        Err(RepositoryError::NotFound) => Err(AppError::NotFound("Product".to_string())),
        Err(RepositoryError::Conflict(message)) => {
            rerender(&state, page, Some(id), form, &message).await
        }
        Err(RepositoryError::Database(e)) if is_foreign_key_violation(&e) => {
            rerender(&state, page, Some(id), form, "Please choose a category").await
        }
        Err(e) => Err(e.into()),
    }
}

fn is_foreign_key_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation())
}

/// Activate or deactivate a product.
///
/// POST /products/{id}/toggle
#[instrument(skip(state), fields(admin_id = %admin.id))]
pub async fn toggle(
    State(state): State<AppState>,
    RequireWriteAccess(admin): RequireWriteAccess,
    Path(id): Path<i32>,
) -> Result<Redirect, AppError> {
    let id = ProductId::new(id);
    let active = ProductRepository::new(state.pool())
        .toggle_active(id)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound("Product".to_string()),
            other => other.into(),
        })?;

    tracing::info!(product_id = %id, active, "product toggled");
    let message = if active {
        "Product activated"
    } else {
        "Product deactivated"
    };
    Ok(redirect_success("/products", message))
}

/// Delete a product. Products that appear on orders are deactivated instead.
///
/// POST /products/{id}/delete
#[instrument(skip(state), fields(admin_id = %admin.id))]
pub async fn delete(
    State(state): State<AppState>,
    RequireWriteAccess(admin): RequireWriteAccess,
    Path(id): Path<i32>,
) -> Result<Redirect, AppError> {
    let id = ProductId::new(id);
    match ProductRepository::new(state.pool())
        .delete_or_deactivate(id)
        .await
    {
        Ok(DeleteOutcome::Deleted) => {
            tracing::info!(product_id = %id, "product deleted");
            Ok(redirect_success("/products", "Product deleted"))
        }
        Ok(DeleteOutcome::Deactivated { order_count }) => {
            tracing::info!(product_id = %id, order_count, "product on orders, deactivated");
            Ok(redirect_error(
                "/products",
                &format!(
                    "This product appears on {order_count} order(s) and cannot be deleted. It has been deactivated instead."
                ),
            ))
        }
        Err(RepositoryError::NotFound) => Err(AppError::NotFound("Product".to_string())),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use printshop_core::CategoryId;
    use rust_decimal::Decimal;

    use super::*;

    fn product() -> Product {
        Product {
            id: ProductId::new(7),
            category_id: CategoryId::new(2),
            category_name: "Cards".to_string(),
            category_slug: "cards".to_string(),
            name: "Business Cards".to_string(),
            slug: "business-cards".to_string(),
            description: "Matte 350gsm".to_string(),
            base_price: Decimal::new(8_500_000, 2),
            unit: "box".to_string(),
            min_quantity: 1,
            turnaround_days: 2,
            image_url: None,
            is_featured: true,
            is_active: true,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_form_from_product_round_trips_through_validation() {
        let form = ProductForm::from(&product());
        assert_eq!(form.base_price, "85000");
        let valid = form.validate().unwrap();
        assert_eq!(valid.slug, "business-cards");
        assert_eq!(valid.base_price, Decimal::new(85_000, 0));
        assert!(valid.image_url.is_none());
        assert!(valid.is_featured);
    }

    #[test]
    fn test_edit_path() {
        assert_eq!(edit_path(ProductId::new(7)), "/products/7/edit");
    }
}
