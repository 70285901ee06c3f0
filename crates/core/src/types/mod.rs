//! Core types for Printshop.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod money;
pub mod settings;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use money::{CurrencyCode, Price};
pub use settings::{GeneralSettings, OrderSettings, ShippingSettings, StoreSettings};
pub use status::*;
