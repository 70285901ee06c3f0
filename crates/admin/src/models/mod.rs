//! Domain models for the admin console.
//!
//! Row types derive `sqlx::FromRow`. Admin reads see every record,
//! including inactive products, categories and promos.

pub mod admin_user;
pub mod catalog;
pub mod order;
pub mod promo;
pub mod session;

pub use admin_user::{AdminRole, AdminUser};
pub use catalog::{Category, Product};
pub use order::{Order, OrderItem, OrderSummary, StatusCount};
pub use promo::{Promo, PromoState};
pub use session::{CurrentAdmin, keys as session_keys};
