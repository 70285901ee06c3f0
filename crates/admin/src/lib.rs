//! Printshop admin library.
//!
//! This crate provides the admin functionality as a library,
//! allowing it to be tested and reused (the CLI uses its password hashing
//! and repositories).
//!
//! # Security
//!
//! Admin users can change prices, promos and order states. Bind to a private
//! interface and put it behind a VPN or an authenticating proxy.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod forms;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
