//! Category API.

use axum::{Json, extract::State};
use tracing::instrument;

use printshop_core::ApiResponse;

use crate::error::ApiResult;
use crate::models::Category;
use crate::state::AppState;

/// `GET /api/categories` (public)
#[instrument(skip(state))]
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Category>> {
    let categories = state.categories().await?;
    Ok(Json(ApiResponse::ok(categories.as_ref().clone())))
}
