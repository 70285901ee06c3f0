//! Domain models for the storefront.
//!
//! Row types derive `sqlx::FromRow` and are read with runtime-checked
//! queries; view types for templates live next to their route handlers.

pub mod address;
pub mod cart;
pub mod catalog;
pub mod order;
pub mod promo;
pub mod session;
pub mod user;

pub use address::Address;
pub use cart::{Cart, CartItem};
pub use catalog::{Category, Product};
pub use order::{Order, OrderItem, OrderSummary};
pub use promo::Promo;
pub use session::{CurrentUser, keys as session_keys};
pub use user::User;
