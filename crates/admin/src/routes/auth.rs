//! Authentication route handlers for admin.
//!
//! Email and password login and logout. Accounts are created with
//! `printshop-cli admin create`.

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

use crate::error::{AppError, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::auth::safe_next_path;
use crate::middleware::{OptionalAdminAuth, clear_current_admin, set_current_admin};
use crate::models::CurrentAdmin;
use crate::routes::redirect_error;
use crate::services::auth::AdminAuthService;
use crate::state::AppState;

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
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub next: String,
    pub error: Option<String>,
    pub success: Option<String>,
}

fn login_path(next: Option<&str>) -> String {
    safe_next_path(next).map_or_else(
        || "/auth/login".to_string(),
        |next| format!("/auth/login?next={}", urlencoding::encode(next)),
    )
}

/// Render the login page. Signed-in admins go to the dashboard.
///
/// GET /auth/login
pub async fn login_page(
    OptionalAdminAuth(admin): OptionalAdminAuth,
    Query(query): Query<LoginQuery>,
) -> Response {
    if admin.is_some() {
        return Redirect::to("/").into_response();
    }
    LoginTemplate {
        next: safe_next_path(query.next.as_deref())
            .unwrap_or_default()
            .to_string(),
        error: query.error,
        success: query.success,
    }
    .into_response()
}

/// Handle login form submission.
///
/// POST /auth/login
#[instrument(skip(state, session, form), fields(email = %form.email))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Redirect, AppError> {
    let next = form.next.as_deref().filter(|n| !n.is_empty());

    match AdminAuthService::new(state.pool())
        .login(&form.email, &form.password)
        .await
    {
        Ok(admin) => {
            set_current_admin(&session, &CurrentAdmin::from(&admin))
                .await
                .map_err(|e| AppError::Internal(format!("session write failed: {e}")))?;
            set_sentry_user(&admin.id, admin.email.as_str());
            Ok(Redirect::to(safe_next_path(next).unwrap_or("/")))
        }
        Err(e) if e.is_server_error() => Err(e.into()),
        Err(e) => {
            tracing::warn!("Admin login failed: {}", e);
            Ok(redirect_error(&login_path(next), &e.user_message()))
        }
    }
}

/// Logout and clear session.
///
/// POST /auth/logout
pub async fn logout(session: Session) -> Redirect {
    if let Err(e) = clear_current_admin(&session).await {
        tracing::warn!(error = %e, "failed to clear admin session");
    }
    clear_sentry_user();
    Redirect::to("/auth/login?success=Signed%20out")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_path() {
        assert_eq!(login_path(None), "/auth/login");
        assert_eq!(
            login_path(Some("/orders/PS-000001")),
            "/auth/login?next=%2Forders%2FPS-000001"
        );
        assert_eq!(login_path(Some("https://evil.example")), "/auth/login");
    }
}
