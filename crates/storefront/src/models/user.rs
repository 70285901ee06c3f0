//! Storefront customer.

use chrono::{DateTime, Utc};
use serde::Serialize;

use printshop_core::{Email, UserId};

/// A storefront customer account.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub full_name: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
