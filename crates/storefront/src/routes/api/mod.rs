//! JSON API.
//!
//! Every response uses the `{success, data}` envelope from
//! [`printshop_core::ApiResponse`]; failures become
//! `{success: false, message}` through [`crate::error::ApiError`].

pub mod addresses;
pub mod categories;
pub mod orders;
pub mod profile;

use axum::{
    Json, Router,
    extract::{FromRequest, Request, rejection::JsonRejection},
    routing::{get, post, put},
};
use serde::de::DeserializeOwned;

use crate::error::{ApiError, AppError};
use crate::state::AppState;

/// JSON body extractor whose rejections use the API envelope.
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(rejection_error(&rejection).into()),
        }
    }
}

fn rejection_error(rejection: &JsonRejection) -> AppError {
    AppError::BadRequest(rejection.body_text())
}

/// Create the `/api` router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/addresses",
            get(addresses::list).post(addresses::create),
        )
        .route(
            "/addresses/{id}",
            put(addresses::update).delete(addresses::delete),
        )
        .route("/addresses/{id}/default", post(addresses::set_default))
        .route("/profile", get(profile::show).put(profile::update))
        .route("/profile/password", post(profile::change_password))
        .route("/orders", get(orders::list))
        .route("/orders/{number}", get(orders::show))
        .route("/categories", get(categories::list))
}
