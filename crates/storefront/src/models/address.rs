//! Shipping addresses.

use chrono::{DateTime, Utc};
use serde::Serialize;

use printshop_core::{AddressId, UserId};

/// A customer's shipping address.
///
/// A customer with at least one address has exactly one default.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Address {
    pub id: AddressId,
    pub user_id: UserId,
    pub recipient_name: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub province: String,
    pub postal_code: String,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Address {
    /// Single-line rendering for lists and order snapshots.
    #[must_use]
    pub fn one_line(&self) -> String {
        format!(
            "{}, {}, {} {}",
            self.address, self.city, self.province, self.postal_code
        )
    }
}
