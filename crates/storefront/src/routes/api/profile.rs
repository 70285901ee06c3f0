//! Profile API.

use axum::{Json, extract::State};
use serde::Serialize;
use tower_sessions::Session;
use tracing::instrument;

use printshop_core::ApiResponse;
use printshop_core::forms::{PasswordForm, ProfileForm};

use crate::db::UserRepository;
use crate::error::{ApiResult, AppError};
use crate::middleware::RequireAuth;
use crate::models::{CurrentUser, User, session_keys};
use crate::routes::api::ApiJson;
use crate::services::auth::AuthService;
use crate::state::AppState;

/// Body returned after a password change.
#[derive(Debug, Serialize)]
pub struct PasswordChanged {
    pub changed: bool,
}

/// `GET /api/profile`
#[instrument(skip(state, current_user), fields(user_id = %current_user.id))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(current_user): RequireAuth,
) -> ApiResult<User> {
    let user = UserRepository::new(state.pool())
        .get_by_id(current_user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Account".to_string()))?;
    Ok(Json(ApiResponse::ok(user)))
}

/// `PUT /api/profile`
#[instrument(skip(state, session, current_user, form), fields(user_id = %current_user.id))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(current_user): RequireAuth,
    ApiJson(form): ApiJson<ProfileForm>,
) -> ApiResult<User> {
    let profile = form.validate()?;
    let user = UserRepository::new(state.pool())
        .update_profile(current_user.id, &profile.full_name, profile.phone.as_deref())
        .await?;

    if let Err(e) = session
        .insert(session_keys::CURRENT_USER, CurrentUser::from(&user))
        .await
    {
        tracing::warn!("Failed to refresh session user: {e}");
    }

    Ok(Json(ApiResponse::ok_with_message(user, "Profile updated")))
}

/// `POST /api/profile/password`
#[instrument(skip(state, current_user, form), fields(user_id = %current_user.id))]
pub async fn change_password(
    State(state): State<AppState>,
    RequireAuth(current_user): RequireAuth,
    ApiJson(form): ApiJson<PasswordForm>,
) -> ApiResult<PasswordChanged> {
    AuthService::new(state.pool())
        .change_password(current_user.id, &form)
        .await?;
    Ok(Json(ApiResponse::ok_with_message(
        PasswordChanged { changed: true },
        "Password changed",
    )))
}
