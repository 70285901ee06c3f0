//! Business logic services for admin.

pub mod auth;
