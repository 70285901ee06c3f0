//! Database migration commands.
//!
//! # Usage
//!
//! ```bash
//! # Run storefront migrations (shop, storefront and session schemas)
//! printshop-cli migrate storefront
//!
//! # Run admin migrations (admin schema)
//! printshop-cli migrate admin
//!
//! # Run all migrations, storefront first
//! printshop-cli migrate
//! ```
//!
//! # Migration Files
//!
//! Storefront migrations: `crates/storefront/migrations/`
//! Admin migrations: `crates/admin/migrations/`
//!
//! Both sets share one database and one `_sqlx_migrations` table, so each
//! migrator ignores versions applied by the other. Admin versions start
//! after the storefront ones because the admin tables use `shop` helpers.

use clap::ValueEnum;
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use thiserror::Error;

use super::{ConnectError, connect};

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error(transparent)]
    Connect(#[from] ConnectError),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Which migration set to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum MigrationTarget {
    Storefront,
    Admin,
    #[default]
    All,
}

fn storefront_migrator() -> Migrator {
    let mut migrator = sqlx::migrate!("../storefront/migrations");
    migrator.set_ignore_missing(true);
    migrator
}

fn admin_migrator() -> Migrator {
    let mut migrator = sqlx::migrate!("../admin/migrations");
    migrator.set_ignore_missing(true);
    migrator
}

async fn apply(pool: &PgPool, name: &str, migrator: &Migrator) -> Result<(), MigrationError> {
    tracing::info!("Running {name} migrations...");
    migrator.run(pool).await?;
    tracing::info!(count = migrator.iter().count(), "{name} migrations complete");
    Ok(())
}

/// Run pending migrations for `target`.
///
/// # Errors
///
/// Returns `MigrationError` if the database is unreachable or a migration
/// fails.
pub async fn run(target: MigrationTarget) -> Result<(), MigrationError> {
    let pool = connect().await?;

    if matches!(target, MigrationTarget::Storefront | MigrationTarget::All) {
        apply(&pool, "storefront", &storefront_migrator()).await?;
    }
    if matches!(target, MigrationTarget::Admin | MigrationTarget::All) {
        apply(&pool, "admin", &admin_migrator()).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_versions_follow_storefront_versions() {
        let storefront = storefront_migrator();
        let admin = admin_migrator();

        let last_storefront = storefront.iter().map(|m| m.version).max();
        let first_admin = admin.iter().map(|m| m.version).min();

        assert!(last_storefront.is_some());
        assert!(first_admin.is_some());
        assert!(first_admin > last_storefront);
    }
}
