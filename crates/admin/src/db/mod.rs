//! Database operations for the admin console.
//!
//! # Tables
//!
//! - `admin.admin_user` - Admin accounts (separate from storefront customers)
//! - `shop.category`, `shop.product` - Catalog
//! - `shop.order`, `shop.order_item` - Orders placed on the storefront
//! - `shop.promo` - Promo codes
//! - `shop.setting` - Store settings (one JSONB row per tab)
//! - `tower_sessions.session` - Session storage
//!
//! # Migrations
//!
//! The admin schema lives in `crates/admin/migrations/`. It builds on the
//! storefront migrations, so run both:
//! ```bash
//! cargo run -p printshop-cli -- migrate
//! ```

pub mod admin_users;
pub mod categories;
pub mod orders;
pub mod products;
pub mod promos;
pub mod settings;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use admin_users::AdminUserRepository;
pub use categories::CategoryRepository;
pub use orders::{DashboardStats, OrderRepository};
pub use products::{DeleteOutcome, ProductRepository};
pub use promos::PromoRepository;
pub use settings::SettingsRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique slug).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Map unique violations to [`RepositoryError::Conflict`].
pub(crate) fn conflict_on_unique(message: &str) -> impl FnOnce(sqlx::Error) -> RepositoryError + '_ {
    move |e| {
        if let sqlx::Error::Database(ref db_err) = e
            && db_err.is_unique_violation()
        {
            return RepositoryError::Conflict(message.to_owned());
        }
        RepositoryError::Database(e)
    }
}

/// Create a `PostgreSQL` connection pool.
///
/// The admin console has few concurrent users, so the pool is small.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(5)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
