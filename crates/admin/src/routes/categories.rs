//! Category management routes.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use tracing::instrument;

use printshop_core::CategoryId;

use crate::db::{CategoryRepository, RepositoryError};
use crate::error::AppError;
use crate::filters;
use crate::forms::CategoryForm;
use crate::middleware::RequireWriteAccess;
use crate::models::Category;
use crate::routes::{AdminPage, redirect_error, redirect_success};
use crate::state::AppState;

/// Category list template.
#[derive(Template, WebTemplate)]
#[template(path = "categories/index.html")]
pub struct CategoriesIndexTemplate {
    pub page: AdminPage,
    pub categories: Vec<Category>,
}

/// Category create/edit template.
#[derive(Template, WebTemplate)]
#[template(path = "categories/form.html")]
pub struct CategoryFormTemplate {
    pub page: AdminPage,
    pub category_id: Option<CategoryId>,
    pub form: CategoryForm,
}

impl CategoryFormTemplate {
    #[must_use]
    pub fn action(&self) -> String {
        self.category_id.map_or_else(
            || "/categories".to_string(),
            |id| format!("/categories/{id}"),
        )
    }
}

impl From<&Category> for CategoryForm {
    fn from(category: &Category) -> Self {
        Self {
            name: category.name.clone(),
            slug: category.slug.clone(),
            description: category.description.clone(),
            sort_order: category.sort_order.to_string(),
            is_active: category.is_active,
        }
    }
}

fn rerender(
    page: AdminPage,
    category_id: Option<CategoryId>,
    form: CategoryForm,
    message: &str,
) -> Response {
    CategoryFormTemplate {
        page: page.with_error(message),
        category_id,
        form,
    }
    .into_response()
}

/// Category list.
///
/// GET /categories
#[instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    page: AdminPage,
) -> Result<CategoriesIndexTemplate, AppError> {
    let categories = CategoryRepository::new(state.pool()).list().await?;
    Ok(CategoriesIndexTemplate { page, categories })
}

/// New category form.
///
/// GET /categories/new
pub async fn new_page(page: AdminPage) -> CategoryFormTemplate {
    CategoryFormTemplate {
        page,
        category_id: None,
        form: CategoryForm {
            sort_order: "0".to_string(),
            is_active: true,
            ..CategoryForm::default()
        },
    }
}

/// Edit category form.
///
/// GET /categories/{id}/edit
pub async fn edit_page(
    State(state): State<AppState>,
    page: AdminPage,
    Path(id): Path<i32>,
) -> Result<CategoryFormTemplate, AppError> {
    let id = CategoryId::new(id);
    let category = CategoryRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Category".to_string()))?;

    Ok(CategoryFormTemplate {
        page,
        category_id: Some(id),
        form: CategoryForm::from(&category),
    })
}

/// Create a category.
///
/// POST /categories
#[instrument(skip(state, page, form), fields(admin_id = %admin.id))]
pub async fn create(
    State(state): State<AppState>,
    RequireWriteAccess(admin): RequireWriteAccess,
    page: AdminPage,
    Form(form): Form<CategoryForm>,
) -> Result<Response, AppError> {
    let category = match form.validate() {
        Ok(category) => category,
        Err(errors) => return Ok(rerender(page, None, form, errors.first_message())),
    };

    match CategoryRepository::new(state.pool()).create(&category).await {
        Ok(id) => {
            tracing::info!(category_id = %id, slug = %category.slug, "category created");
            Ok(redirect_success("/categories", "Category created").into_response())
        }
        Err(RepositoryError::Conflict(message)) => Ok(rerender(page, None, form, &message)),
        Err(e) => Err(e.into()),
    }
}

/// Update a category.
///
/// POST /categories/{id}
#[instrument(skip(state, page, form), fields(admin_id = %admin.id))]
pub async fn update(
    State(state): State<AppState>,
    RequireWriteAccess(admin): RequireWriteAccess,
    page: AdminPage,
    Path(id): Path<i32>,
    Form(form): Form<CategoryForm>,
) -> Result<Response, AppError> {
    let id = CategoryId::new(id);
    let category = match form.validate() {
        Ok(category) => category,
        Err(errors) => return Ok(rerender(page, Some(id), form, errors.first_message())),
    };

    match CategoryRepository::new(state.pool()).update(id, &category).await {
        Ok(()) => {
            tracing::info!(category_id = %id, "category updated");
            Ok(redirect_success("/categories", "Category saved").into_response())
        }
        Err(RepositoryError::NotFound) => Err(AppError::NotFound("Category".to_string())),
        Err(RepositoryError::Conflict(message)) => Ok(rerender(page, Some(id), form, &message)),
        Err(e) => Err(e.into()),
    }
}

/// Delete a category. Categories that still hold products are kept.
///
/// POST /categories/{id}/delete
#[instrument(skip(state), fields(admin_id = %admin.id))]
pub async fn delete(
    State(state): State<AppState>,
    RequireWriteAccess(admin): RequireWriteAccess,
    Path(id): Path<i32>,
) -> Result<Redirect, AppError> {
    let id = CategoryId::new(id);
    match CategoryRepository::new(state.pool()).delete(id).await {
        Ok(()) => {
            tracing::info!(category_id = %id, "category deleted");
            Ok(redirect_success("/categories", "Category deleted"))
        }
        Err(RepositoryError::Conflict(message)) => Ok(redirect_error("/categories", &message)),
        Err(RepositoryError::NotFound) => Err(AppError::NotFound("Category".to_string())),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_form_from_category_validates() {
        let category = Category {
            id: CategoryId::new(3),
            name: "Banners".to_string(),
            slug: "banners".to_string(),
            description: String::new(),
            sort_order: 20,
            is_active: false,
            product_count: 4,
        };
        let valid = CategoryForm::from(&category).validate().unwrap();
        assert_eq!(valid.slug, "banners");
        assert_eq!(valid.sort_order, 20);
        assert!(!valid.is_active);
    }
}
