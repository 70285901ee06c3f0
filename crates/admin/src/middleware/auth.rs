//! Authentication middleware and extractors for admin.
//!
//! Every page except the login form requires a signed-in admin. Handlers
//! that change shop data take [`RequireWriteAccess`] instead, which also
//! turns away read-only (viewer) accounts.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::models::{CurrentAdmin, session_keys};

/// Extractor that requires admin authentication.
///
/// If the admin is not logged in, redirects to the login page and brings
/// them back to the requested page afterwards.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAdminAuth(admin): RequireAdminAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", admin.name)
/// }
/// ```
pub struct RequireAdminAuth(pub CurrentAdmin);

/// Error returned when admin authentication is required but missing.
#[derive(Debug)]
pub enum AdminAuthRejection {
    /// Redirect to login page, carrying the page to return to.
    RedirectToLogin(String),
    /// No session layer (misconfiguration).
    Unauthorized,
}

impl IntoResponse for AdminAuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin(next) => Redirect::to(&login_url(&next)).into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
        }
    }
}

fn login_url(next: &str) -> String {
    if next.is_empty() || next == "/" {
        "/auth/login".to_string()
    } else {
        format!("/auth/login?next={}", urlencoding::encode(next))
    }
}

async fn current_admin(parts: &Parts) -> Result<CurrentAdmin, AdminAuthRejection> {
    let session = parts
        .extensions
        .get::<Session>()
        .ok_or(AdminAuthRejection::Unauthorized)?;

    session
        .get::<CurrentAdmin>(session_keys::CURRENT_ADMIN)
        .await
        .ok()
        .flatten()
        .ok_or_else(|| {
            // Only GETs are worth coming back to after login.
            let next = if parts.method == axum::http::Method::GET {
                parts
                    .uri
                    .path_and_query()
                    .map_or_else(String::new, ToString::to_string)
            } else {
                String::new()
            };
            AdminAuthRejection::RedirectToLogin(next)
        })
}

impl<S> FromRequestParts<S> for RequireAdminAuth
where
    S: Send + Sync,
{
    type Rejection = AdminAuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(current_admin(parts).await?))
    }
}

/// Extractor that optionally gets the current admin.
pub struct OptionalAdminAuth(pub Option<CurrentAdmin>);

impl<S> FromRequestParts<S> for OptionalAdminAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(current_admin(parts).await.ok()))
    }
}

/// Extractor that requires an admin whose role may modify shop data.
///
/// Viewers get 403 Forbidden.
pub struct RequireWriteAccess(pub CurrentAdmin);

/// Error returned when write access is required.
#[derive(Debug)]
pub enum WriteAccessRejection {
    NotSignedIn(AdminAuthRejection),
    /// Signed in with a read-only role.
    Forbidden,
}

impl IntoResponse for WriteAccessRejection {
    fn into_response(self) -> Response {
        match self {
            Self::NotSignedIn(rejection) => rejection.into_response(),
            Self::Forbidden => (
                StatusCode::FORBIDDEN,
                "Your account has read-only access",
            )
                .into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireWriteAccess
where
    S: Send + Sync,
{
    type Rejection = WriteAccessRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let admin = current_admin(parts)
            .await
            .map_err(WriteAccessRejection::NotSignedIn)?;

        if !admin.can_write() {
            tracing::warn!(
                admin_id = %admin.id,
                path = %parts.uri.path(),
                "read-only admin attempted a write"
            );
            return Err(WriteAccessRejection::Forbidden);
        }

        Ok(Self(admin))
    }
}

/// Helper to set the current admin in the session.
///
/// The session ID is cycled first so a pre-login session cannot be fixed.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_admin(
    session: &Session,
    admin: &CurrentAdmin,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::CURRENT_ADMIN, admin).await
}

/// Helper to clear the current admin from the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_admin(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}

/// Accept only same-site absolute paths as post-login redirect targets.
#[must_use]
pub fn safe_next_path(next: Option<&str>) -> Option<&str> {
    next.filter(|path| {
        path.starts_with('/')
            && !path.starts_with("//")
            && !path.contains('\\')
            && !path.starts_with("/auth/")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_next_path() {
        assert_eq!(safe_next_path(Some("/orders/PS-000012")), Some("/orders/PS-000012"));
        assert_eq!(safe_next_path(Some("//evil.example")), None);
        assert_eq!(safe_next_path(Some("https://evil.example")), None);
        assert_eq!(safe_next_path(Some("/auth/logout")), None);
    }

    #[test]
    fn test_login_url_keeps_next() {
        assert_eq!(login_url("/"), "/auth/login");
        assert_eq!(
            login_url("/orders?status=pending"),
            "/auth/login?next=%2Forders%3Fstatus%3Dpending"
        );
    }

    #[test]
    fn test_forbidden_status() {
        let response = WriteAccessRejection::Forbidden.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_redirect_to_login() {
        let response = AdminAuthRejection::RedirectToLogin("/products".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers()[axum::http::header::LOCATION],
            "/auth/login?next=%2Fproducts"
        );
    }
}
