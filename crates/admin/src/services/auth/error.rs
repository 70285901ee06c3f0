//! Admin authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during admin authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] printshop_core::EmailError),

    /// Wrong email or password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Password does not meet the length rules.
    #[error("weak password: {0}")]
    WeakPassword(String),

    /// Display name missing.
    #[error("name is required")]
    MissingName,

    /// No admin with this email.
    #[error("no admin user with this email")]
    UnknownAdmin,

    /// Admin user already exists.
    #[error("admin user already exists")]
    UserAlreadyExists,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}

impl AuthError {
    /// Message safe to show on the login page.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidEmail(_) | Self::InvalidCredentials => {
                "Invalid email or password".to_string()
            }
            Self::WeakPassword(msg) => msg.clone(),
            Self::MissingName => "Name is required".to_string(),
            Self::UserAlreadyExists => "An admin with this email already exists".to_string(),
            Self::UnknownAdmin => "No admin with this email".to_string(),
            Self::Repository(_) | Self::PasswordHash => {
                "Something went wrong, please try again".to_string()
            }
        }
    }

    /// Whether this error is the server's fault.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        matches!(self, Self::Repository(_) | Self::PasswordHash)
    }
}
