//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Renders `true` as "Yes" and `false` as "No".
///
/// Usage in templates: `{{ product.is_featured|yes_no }}`
#[askama::filter_fn]
pub fn yes_no(value: &bool, _env: &dyn askama::Values) -> askama::Result<&'static str> {
    Ok(if *value { "Yes" } else { "No" })
}
