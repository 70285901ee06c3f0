//! Store settings (read/write side).

use serde::Serialize;
use serde::de::DeserializeOwned;
use sqlx::PgPool;

use printshop_core::StoreSettings;

use super::RepositoryError;

/// Repository for the JSONB settings rows, one per tab.
pub struct SettingsRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SettingsRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Load all tabs. Missing or unreadable rows fall back to defaults.
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

    /// Write one tab, replacing its row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::DataCorruption` if the value cannot be
    /// serialized, or `RepositoryError::Database` if the write fails.
    pub async fn save<T: Serialize + Sync>(&self, key: &str, value: &T) -> Result<(), RepositoryError> {
        let json = serde_json::to_value(value)
            .map_err(|e| RepositoryError::DataCorruption(format!("settings {key}: {e}")))?;

        sqlx::query(
            r"
            INSERT INTO shop.setting (key, value)
            VALUES ($1, $2)
            ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, updated_at = NOW()
            ",
        )
        .bind(key)
        .bind(json)
        .execute(self.pool)
        .await?;
        Ok(())
    }
}

fn decode_or_default<T: DeserializeOwned + Default>(key: &str, value: serde_json::Value) -> T {
    serde_json::from_value(value).unwrap_or_else(|e| {
        tracing::warn!(key, error = %e, "invalid settings row, using defaults");
        T::default()
    })
}
