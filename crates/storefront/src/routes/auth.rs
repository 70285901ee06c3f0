//! Authentication route handlers.
//!
//! Email and password login, registration and logout.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use printshop_core::forms::RegisterForm;

use crate::error::{AppError, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::auth::safe_next_path;
use crate::middleware::{clear_current_user, set_current_user};
use crate::models::{CurrentUser, User};
use crate::routes::{PageContext, redirect_error, redirect_success};
use crate::services::auth::AuthService;
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub next: Option<String>,
}

/// Query parameters for the login page.
#[derive(Debug, Default, Deserialize)]
pub struct LoginQuery {
    pub next: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub page: PageContext,
    pub next: String,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub page: PageContext,
}

async fn start_session(session: &Session, user: &User) -> Result<(), AppError> {
    set_current_user(session, &CurrentUser::from(user))
        .await
        .map_err(|e| AppError::Internal(format!("session write failed: {e}")))?;
    set_sentry_user(&user.id, Some(user.email.as_str()));
    Ok(())
}

fn login_path(next: Option<&str>) -> String {
    safe_next_path(next).map_or_else(
        || "/auth/login".to_string(),
        |next| format!("/auth/login?next={}", urlencoding::encode(next)),
    )
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page. Signed-in customers go straight to their account.
pub async fn login_page(page: PageContext, Query(query): Query<LoginQuery>) -> Response {
    if page.signed_in() {
        return Redirect::to("/account").into_response();
    }
    LoginTemplate {
        page,
        next: safe_next_path(query.next.as_deref())
            .unwrap_or_default()
            .to_string(),
    }
    .into_response()
}

/// Handle login form submission.
#[instrument(skip(state, session, form), fields(email = %form.email))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Redirect, AppError> {
    let next = form.next.as_deref().filter(|n| !n.is_empty());

    match AuthService::new(state.pool())
        .login(&form.email, &form.password)
        .await
    {
        Ok(user) => {
            start_session(&session, &user).await?;
            tracing::info!(user_id = %user.id, "customer logged in");
            Ok(Redirect::to(safe_next_path(next).unwrap_or("/account")))
        }
        Err(e) if e.is_server_error() => Err(e.into()),
        Err(e) => {
            tracing::warn!("Login failed: {}", e);
            Ok(redirect_error(&login_path(next), &e.user_message()))
        }
    }
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
pub async fn register_page(page: PageContext) -> Response {
    if page.signed_in() {
        return Redirect::to("/account").into_response();
    }
    RegisterTemplate { page }.into_response()
}

/// Handle registration form submission. The new customer is signed in.
#[instrument(skip(state, session, form), fields(email = %form.email))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Result<Redirect, AppError> {
    match AuthService::new(state.pool()).register(&form).await {
        Ok(user) => {
            start_session(&session, &user).await?;
            Ok(redirect_success(
                "/account",
                &format!("Welcome, {}!", user.full_name),
            ))
        }
        Err(e) if e.is_server_error() => Err(e.into()),
        Err(e) => {
            tracing::info!("Registration rejected: {}", e);
            Ok(redirect_error("/auth/register", &e.user_message()))
        }
    }
}

// =============================================================================
// Logout
// =============================================================================

/// Sign out. The cart survives; the session ID is rotated.
pub async fn logout(session: Session) -> Redirect {
    if let Err(e) = clear_current_user(&session).await {
        tracing::error!("Failed to clear session: {}", e);
    }
    if let Err(e) = session.cycle_id().await {
        tracing::error!("Failed to rotate session id: {}", e);
    }
    clear_sentry_user();

    redirect_success("/", "You have been signed out")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_path_keeps_safe_next() {
        assert_eq!(login_path(Some("/checkout")), "/auth/login?next=%2Fcheckout");
        assert_eq!(login_path(Some("https://evil.example")), "/auth/login");
        assert_eq!(login_path(None), "/auth/login");
    }
}
