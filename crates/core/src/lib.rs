//! Printshop Core - Shared types library.
//!
//! This crate provides common types used across all Printshop components:
//! - `storefront` - Public-facing print shop (catalog, cart, checkout, account)
//! - `admin` - Internal administration console
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP clients. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, money, emails, and statuses
//! - [`forms`] - Validation for profile, password, address and registration forms
//! - [`filter`] - Search/status filters for order history, FAQ and catalog lists
//! - [`pricing`] - Cart subtotals, promo discounts, shipping fees, order totals
//! - [`faq`] - FAQ content records
//! - [`api`] - The `{success, data}` JSON response envelope

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod faq;
pub mod filter;
pub mod forms;
pub mod pricing;
pub mod types;

pub use api::ApiResponse;
pub use types::*;
