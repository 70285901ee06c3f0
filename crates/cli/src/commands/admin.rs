//! Admin user management commands.
//!
//! Admin accounts are only ever created here; the web console has no
//! sign-up page.

use printshop_admin::db::AdminUserRepository;
use printshop_admin::services::auth::{AdminAuthService, AuthError};
use printshop_core::AdminRole;
use thiserror::Error;

use super::{ConnectError, connect};

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    #[error(transparent)]
    Connect(#[from] ConnectError),

    /// Invalid role.
    #[error("Invalid role: {0}. Valid roles: super_admin, admin, viewer")]
    InvalidRole(String),

    #[error("{0}")]
    Auth(#[from] AuthError),

    #[error("Database error: {0}")]
    Repository(#[from] printshop_admin::db::RepositoryError),
}

/// Create a new admin user.
///
/// # Errors
///
/// Returns `AdminError` for an unknown role, invalid input, a duplicate
/// email or a database failure.
pub async fn create_user(
    email: &str,
    name: &str,
    role: &str,
    password: &str,
) -> Result<(), AdminError> {
    let role: AdminRole = role
        .parse()
        .map_err(|_| AdminError::InvalidRole(role.to_owned()))?;

    let pool = connect().await?;
    let admin = AdminAuthService::new(&pool)
        .create_admin(email, name, role, password)
        .await?;

    tracing::info!(
        "Admin user created. ID: {}, Email: {}, Role: {}",
        admin.id,
        admin.email,
        admin.role
    );
    Ok(())
}

/// Print all admin users.
///
/// # Errors
///
/// Returns `AdminError` if the database cannot be read.
pub async fn list_users() -> Result<(), AdminError> {
    let pool = connect().await?;
    let admins = AdminUserRepository::new(&pool).list_all().await?;

    if admins.is_empty() {
        tracing::info!("No admin users. Create one with `printshop-cli admin create`.");
        return Ok(());
    }

    for admin in admins {
        let last_login = admin
            .last_login_at
            .map_or_else(|| "never".to_string(), |at| at.format("%Y-%m-%d %H:%M").to_string());
        tracing::info!(
            "{:>4}  {:<32} {:<12} {} (last login: {})",
            admin.id,
            admin.email,
            admin.role,
            admin.name,
            last_login
        );
    }
    Ok(())
}

/// Set a new password for an existing admin.
///
/// # Errors
///
/// Returns `AdminError` if the admin doesn't exist or the password is
/// outside the length rules.
pub async fn reset_password(email: &str, password: &str) -> Result<(), AdminError> {
    let pool = connect().await?;
    let admin = AdminAuthService::new(&pool)
        .reset_password(email, password)
        .await?;

    tracing::info!("Password updated for {}", admin.email);
    Ok(())
}
