//! Address book API.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use tracing::instrument;

use printshop_core::forms::AddressForm;
use printshop_core::{AddressId, ApiResponse};

use crate::db::AddressRepository;
use crate::error::{ApiResult, AppError};
use crate::middleware::RequireAuth;
use crate::models::Address;
use crate::routes::api::ApiJson;
use crate::state::AppState;

/// Body returned after a delete.
#[derive(Debug, Serialize)]
pub struct Deleted {
    pub id: AddressId,
}

/// `GET /api/addresses`
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> ApiResult<Vec<Address>> {
    let addresses = AddressRepository::new(state.pool())
        .list_for_user(user.id)
        .await?;
    Ok(Json(ApiResponse::ok(addresses)))
}

/// `POST /api/addresses`
#[instrument(skip(state, user, form), fields(user_id = %user.id))]
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiJson(form): ApiJson<AddressForm>,
) -> ApiResult<Address> {
    let valid = form.validate()?;
    let address = AddressRepository::new(state.pool())
        .create(user.id, &valid)
        .await?;
    Ok(Json(ApiResponse::ok_with_message(address, "Address added")))
}

/// `PUT /api/addresses/{id}`
#[instrument(skip(state, user, form), fields(user_id = %user.id))]
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<AddressId>,
    ApiJson(form): ApiJson<AddressForm>,
) -> ApiResult<Address> {
    let valid = form.validate()?;
    let address = AddressRepository::new(state.pool())
        .update(user.id, id, &valid)
        .await
        .map_err(not_found)?;
    Ok(Json(ApiResponse::ok_with_message(address, "Address updated")))
}

/// `DELETE /api/addresses/{id}`
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<AddressId>,
) -> ApiResult<Deleted> {
    AddressRepository::new(state.pool())
        .delete(user.id, id)
        .await
        .map_err(not_found)?;
    Ok(Json(ApiResponse::ok_with_message(
        Deleted { id },
        "Address deleted",
    )))
}

/// `POST /api/addresses/{id}/default`
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn set_default(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<AddressId>,
) -> ApiResult<Vec<Address>> {
    let addresses = AddressRepository::new(state.pool());
    addresses.set_default(user.id, id).await.map_err(not_found)?;
    let all = addresses.list_for_user(user.id).await?;
    Ok(Json(ApiResponse::ok_with_message(
        all,
        "Default address updated",
    )))
}

fn not_found(e: crate::db::RepositoryError) -> AppError {
    match e {
        crate::db::RepositoryError::NotFound => AppError::NotFound("Address".to_string()),
        other => AppError::Database(other),
    }
}
