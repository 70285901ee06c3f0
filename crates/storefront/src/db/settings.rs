//! Store settings (read side).

use serde::de::DeserializeOwned;
use sqlx::PgPool;

use printshop_core::StoreSettings;

use super::RepositoryError;

/// Repository for the JSONB settings rows written by the admin console.
pub struct SettingsRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SettingsRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Load all settings tabs. Missing or unreadable rows fall back to defaults.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn load(&self) -> Result<StoreSettings, RepositoryError> {
        let rows: Vec<(String, serde_json::Value)> =
            sqlx::query_as("SELECT key, value FROM shop.setting")
                .fetch_all(self.pool)
                .await?;

        let mut settings = StoreSettings::default();
        for (key, value) in rows {
            match key.as_str() {
                StoreSettings::GENERAL_KEY => settings.general = decode_or_default(&key, value),
                StoreSettings::SHIPPING_KEY => settings.shipping = decode_or_default(&key, value),
                StoreSettings::ORDERS_KEY => settings.orders = decode_or_default(&key, value),
                other => tracing::debug!(key = other, "ignoring unknown settings row"),
            }
        }
        Ok(settings)
    }
}

fn decode_or_default<T: DeserializeOwned + Default>(key: &str, value: serde_json::Value) -> T {
    serde_json::from_value(value).unwrap_or_else(|e| {
        tracing::warn!(key, error = %e, "invalid settings row, using defaults");
        T::default()
    })
}
