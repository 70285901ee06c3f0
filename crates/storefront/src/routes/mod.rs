//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                              - Home page
//! GET  /health, /health/ready         - Health checks (main.rs)
//!
//! # Catalog
//! GET  /products?q=&category=         - Product listing
//! GET  /products/{slug}               - Product detail
//! GET  /categories                    - Category listing
//! GET  /categories/{slug}             - Category page
//!
//! # Cart (session)
//! GET  /cart                          - Cart page
//! POST /cart/add | /cart/update | /cart/remove
//!
//! # Checkout (requires auth)
//! GET  /checkout                      - Address, promo and totals
//! POST /checkout                      - Place order
//! POST /checkout/promo                - Apply or clear a promo code
//!
//! # Auth
//! GET|POST /auth/login, /auth/register
//! POST /auth/logout
//!
//! # Account (requires auth)
//! GET  /account                       - Overview
//! GET|POST /account/profile
//! POST /account/password
//! GET|POST /account/addresses
//! POST /account/addresses/{id}        - Update
//! POST /account/addresses/{id}/delete
//! POST /account/addresses/{id}/default
//! GET  /account/orders?q=&status=     - Order history
//! GET  /account/orders/{number}       - Order detail
//!
//! # Content
//! GET  /faq?q=&category=
//!
//! # JSON API ({success, data} envelope)
//! GET|POST   /api/addresses
//! PUT|DELETE /api/addresses/{id}
//! GET|PUT    /api/profile
//! POST       /api/profile/password
//! GET        /api/orders
//! GET        /api/categories
//! ```

pub mod account;
pub mod api;
pub mod auth;
pub mod cart;
pub mod categories;
pub mod checkout;
pub mod faq;
pub mod home;
pub mod products;

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    Router,
    extract::{FromRequestParts, Query},
    http::request::Parts,
    response::Redirect,
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tower_sessions::Session;

use printshop_core::{CurrencyCode, Price, StoreSettings};

use crate::middleware::{CspNonce, OptionalAuth, api_rate_limiter, auth_rate_limiter};
use crate::models::CurrentUser;
use crate::state::AppState;

// =============================================================================
// Flash messages
// =============================================================================

/// Query parameters for error/success display.
#[derive(Debug, Default, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

fn with_message(path: &str, key: &str, message: &str) -> String {
    let separator = if path.contains('?') { '&' } else { '?' };
    format!("{path}{separator}{key}={}", urlencoding::encode(message))
}

/// Redirect with an error toast.
#[must_use]
pub fn redirect_error(path: &str, message: &str) -> Redirect {
    Redirect::to(&with_message(path, "error", message))
}

/// Redirect with a success toast.
#[must_use]
pub fn redirect_success(path: &str, message: &str) -> Redirect {
    Redirect::to(&with_message(path, "success", message))
}

// =============================================================================
// Page context
// =============================================================================

/// Data every page layout needs: signed-in user, cart badge, store name,
/// toast messages and the CSP nonce.
#[derive(Debug, Clone)]
pub struct PageContext {
    pub nonce: String,
    pub user: Option<CurrentUser>,
    pub cart_count: usize,
    pub store_name: String,
    pub currency: CurrencyCode,
    pub error: Option<String>,
    pub success: Option<String>,
}

impl PageContext {
    /// Format an amount in the store currency.
    #[must_use]
    pub fn price(&self, amount: Decimal) -> String {
        Price::new(amount, self.currency).display()
    }

    #[must_use]
    pub const fn signed_in(&self) -> bool {
        self.user.is_some()
    }
}

impl FromRequestParts<AppState> for PageContext {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CspNonce(nonce) = CspNonce::from_request_parts(parts, state).await?;
        let OptionalAuth(user) = OptionalAuth::from_request_parts(parts, state).await?;

        let cart_count = match parts.extensions.get::<Session>() {
            Some(session) => cart::load_cart(session).await.items.len(),
            None => 0,
        };

        let settings = state.settings().await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to load store settings, using defaults");
            Arc::new(StoreSettings::default())
        });

        let message = Query::<MessageQuery>::try_from_uri(&parts.uri)
            .map(|Query(message)| message)
            .unwrap_or_default();

        Ok(Self {
            nonce,
            user,
            cart_count,
            store_name: settings.general.store_name.clone(),
            currency: settings.general.currency,
            error: message.error.filter(|m| !m.trim().is_empty()),
            success: message.success.filter(|m| !m.trim().is_empty()),
        })
    }
}

// =============================================================================
// Routers
// =============================================================================

/// Create the catalog routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::index))
        .route("/products/{slug}", get(products::show))
        .route("/categories", get(categories::index))
        .route("/categories/{slug}", get(categories::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(checkout::show).post(checkout::place_order))
        .route("/promo", post(checkout::apply_promo))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(account::index))
        .route(
            "/profile",
            get(account::profile_page).post(account::update_profile),
        )
        .route("/password", post(account::change_password))
        .route(
            "/addresses",
            get(account::addresses).post(account::create_address),
        )
        .route("/addresses/{id}", post(account::update_address))
        .route("/addresses/{id}/delete", post(account::delete_address))
        .route("/addresses/{id}/default", post(account::set_default_address))
        .route("/orders", get(account::orders))
        .route("/orders/{number}", get(account::order_detail))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/faq", get(faq::index))
        .merge(catalog_routes())
        .nest("/cart", cart_routes())
        .nest("/checkout", checkout_routes())
        .nest("/auth", auth_routes().layer(auth_rate_limiter()))
        .nest("/account", account_routes())
        .nest("/api", api::routes().layer(api_rate_limiter()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_message_encodes() {
        assert_eq!(
            with_message("/account/addresses", "error", "Postal code must be 3-10 digits"),
            "/account/addresses?error=Postal%20code%20must%20be%203-10%20digits"
        );
    }

    #[test]
    fn test_with_message_appends_to_existing_query() {
        assert_eq!(
            with_message("/checkout?step=2", "success", "ok & done"),
            "/checkout?step=2&success=ok%20%26%20done"
        );
    }

    #[test]
    fn test_page_context_price() {
        let page = PageContext {
            nonce: String::new(),
            user: None,
            cart_count: 0,
            store_name: "Printshop".to_string(),
            currency: CurrencyCode::IDR,
            error: None,
            success: None,
        };
        assert_eq!(page.price(Decimal::new(15_000, 0)), "Rp 15.000");
        assert!(!page.signed_in());
    }
}
