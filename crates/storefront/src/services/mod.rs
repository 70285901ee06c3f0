//! Business logic services for storefront.
//!
//! # Services
//!
//! - `auth` - Customer registration, login and password changes
//! - `checkout` - Cart pricing, promo codes and order placement

pub mod auth;
pub mod checkout;
