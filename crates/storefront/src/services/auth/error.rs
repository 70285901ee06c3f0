//! Authentication error types.

use thiserror::Error;

use printshop_core::forms::FormErrors;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Submitted form failed validation.
    #[error("invalid form: {0}")]
    Validation(#[from] FormErrors),

    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] printshop_core::EmailError),

    /// Invalid credentials (wrong password or user not found).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The current password given for a password change is wrong.
    #[error("current password is incorrect")]
    WrongCurrentPassword,

    /// User not found.
    #[error("user not found")]
    UserNotFound,

    /// User already exists.
    #[error("user already exists")]
    UserAlreadyExists,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}

impl AuthError {
    /// Message safe to show to the customer.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(errors) => errors.first_message().to_string(),
            Self::InvalidEmail(_) => "Please enter a valid email address".to_string(),
            Self::InvalidCredentials | Self::UserNotFound => {
                "Invalid email or password".to_string()
            }
            Self::WrongCurrentPassword => "Current password is incorrect".to_string(),
            Self::UserAlreadyExists => "An account with this email already exists".to_string(),
            Self::Repository(_) | Self::PasswordHash => {
                "Something went wrong, please try again".to_string()
            }
        }
    }

    /// Whether this error is the server's fault rather than the customer's.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        matches!(self, Self::Repository(_) | Self::PasswordHash)
    }
}
