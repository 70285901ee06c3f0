//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health, /health/ready          - Health checks (main.rs)
//!
//! # Auth
//! GET|POST /auth/login
//! POST /auth/logout
//!
//! # Dashboard
//! GET  /                               - Status counts, revenue, recent orders
//!
//! # Products
//! GET  /products?q=&category=&status=  - Product list
//! GET  /products/new | POST /products  - Create
//! GET  /products/{id}/edit             - Edit form
//! POST /products/{id}                  - Update
//! POST /products/{id}/toggle           - Activate / deactivate
//! POST /products/{id}/delete           - Delete (deactivates if ordered)
//!
//! # Orders
//! GET  /orders?q=&status=              - Order list
//! GET  /orders/{number}                - Order detail
//! POST /orders/{number}/status         - Change status
//!
//! # Categories
//! GET  /categories | GET /categories/new | POST /categories
//! GET  /categories/{id}/edit | POST /categories/{id}
//! POST /categories/{id}/delete
//!
//! # Promos
//! GET  /promos | GET /promos/new | POST /promos
//! GET  /promos/{id}/edit | POST /promos/{id}
//! POST /promos/{id}/toggle | POST /promos/{id}/delete
//!
//! # Settings
//! GET  /settings?tab=general|shipping|orders
//! POST /settings/general | /settings/shipping | /settings/orders
//! ```
//!
//! Every page except `/auth/login` requires a signed-in admin; every POST
//! except auth requires a role that can write.

pub mod auth;
pub mod categories;
pub mod dashboard;
pub mod orders;
pub mod products;
pub mod promos;
pub mod settings;

use axum::{
    Router,
    extract::{FromRequestParts, Query},
    http::request::Parts,
    response::Redirect,
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::Deserialize;

use printshop_core::{AdminRole, CurrencyCode, Price, StoreSettings};

use crate::db::SettingsRepository;
use crate::middleware::auth::{AdminAuthRejection, RequireAdminAuth};
use crate::models::CurrentAdmin;
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

/// Admin user view for templates.
#[derive(Debug, Clone)]
pub struct AdminUserView {
    pub name: String,
    pub email: String,
    pub role: AdminRole,
    pub can_write: bool,
}

impl AdminUserView {
    #[must_use]
    pub const fn role_label(&self) -> &'static str {
        match self.role {
            AdminRole::SuperAdmin => "Super admin",
            AdminRole::Admin => "Admin",
            AdminRole::Viewer => "Viewer",
        }
    }
}

impl From<&CurrentAdmin> for AdminUserView {
    fn from(admin: &CurrentAdmin) -> Self {
        Self {
            name: admin.name.clone(),
            email: admin.email.to_string(),
            role: admin.role,
            can_write: admin.can_write(),
        }
    }
}

/// Data every admin page layout needs. Extracting it requires a signed-in
/// admin.
#[derive(Debug, Clone)]
pub struct AdminPage {
    pub admin_user: AdminUserView,
    pub current_path: String,
    pub store_name: String,
    pub currency: CurrencyCode,
    /// Public storefront, for "view in store" links.
    pub storefront_url: Option<String>,
    pub error: Option<String>,
    pub success: Option<String>,
}

impl AdminPage {
    /// Format an amount in the store currency.
    #[must_use]
    pub fn price(&self, amount: Decimal) -> String {
        Price::new(amount, self.currency).display()
    }

    /// Optional amount, `-` when absent.
    #[must_use]
    pub fn maybe_price(&self, amount: Option<Decimal>) -> String {
        amount.map_or_else(|| "-".to_string(), |a| self.price(a))
    }

    /// Whether the nav item for `prefix` is the current section.
    #[must_use]
    pub fn is_active(&self, prefix: &str) -> bool {
        if prefix == "/" {
            self.current_path == "/"
        } else {
            self.current_path.starts_with(prefix)
        }
    }

    /// Storefront URL for a path, when the storefront URL is configured.
    #[must_use]
    pub fn storefront_link(&self, path: &str) -> Option<String> {
        self.storefront_url
            .as_deref()
            .map(|base| format!("{}{path}", base.trim_end_matches('/')))
    }

    /// Show an error on a re-rendered form.
    #[must_use]
    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error = Some(message.into());
        self.success = None;
        self
    }
}

impl FromRequestParts<AppState> for AdminPage {
    type Rejection = AdminAuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let RequireAdminAuth(admin) = RequireAdminAuth::from_request_parts(parts, state).await?;

        let settings = SettingsRepository::new(state.pool())
            .load()
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Failed to load store settings, using defaults");
                StoreSettings::default()
            });

        let message = Query::<MessageQuery>::try_from_uri(&parts.uri)
            .map(|Query(message)| message)
            .unwrap_or_default();

        Ok(Self {
            admin_user: AdminUserView::from(&admin),
            current_path: parts.uri.path().to_string(),
            store_name: settings.general.store_name,
            currency: settings.general.currency,
            storefront_url: state.config().storefront_url.clone(),
            error: message.error.filter(|m| !m.trim().is_empty()),
            success: message.success.filter(|m| !m.trim().is_empty()),
        })
    }
}

// =============================================================================
// Routers
// =============================================================================

fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route("/new", get(products::new_page))
        .route("/{id}", post(products::update))
        .route("/{id}/edit", get(products::edit_page))
        .route("/{id}/toggle", post(products::toggle))
        .route("/{id}/delete", post(products::delete))
}

fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index))
        .route("/{number}", get(orders::show))
        .route("/{number}/status", post(orders::update_status))
}

fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(categories::index).post(categories::create))
        .route("/new", get(categories::new_page))
        .route("/{id}", post(categories::update))
        .route("/{id}/edit", get(categories::edit_page))
        .route("/{id}/delete", post(categories::delete))
}

fn promo_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(promos::index).post(promos::create))
        .route("/new", get(promos::new_page))
        .route("/{id}", post(promos::update))
        .route("/{id}/edit", get(promos::edit_page))
        .route("/{id}/toggle", post(promos::toggle))
        .route("/{id}/delete", post(promos::delete))
}

fn settings_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(settings::index))
        .route("/general", post(settings::save_general))
        .route("/shipping", post(settings::save_shipping))
        .route("/orders", post(settings::save_orders))
}

/// Create all routes for the admin console.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::dashboard))
        .route("/auth/login", get(auth::login_page).post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .nest("/products", product_routes())
        .nest("/orders", order_routes())
        .nest("/categories", category_routes())
        .nest("/promos", promo_routes())
        .nest("/settings", settings_routes())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(path: &str) -> AdminPage {
        AdminPage {
            admin_user: AdminUserView {
                name: "Rina".to_string(),
                email: "rina@cetak.id".to_string(),
                role: AdminRole::Viewer,
                can_write: false,
            },
            current_path: path.to_string(),
            store_name: "Printshop".to_string(),
            currency: CurrencyCode::IDR,
            storefront_url: Some("https://cetak.id/".to_string()),
            error: None,
            success: Some("Saved".to_string()),
        }
    }

    #[test]
    fn test_with_message() {
        assert_eq!(
            with_message("/products", "error", "Slug taken"),
            "/products?error=Slug%20taken"
        );
        assert_eq!(
            with_message("/settings?tab=shipping", "success", "Saved"),
            "/settings?tab=shipping&success=Saved"
        );
    }

    #[test]
    fn test_nav_highlighting() {
        let p = page("/products/3/edit");
        assert!(p.is_active("/products"));
        assert!(!p.is_active("/"));
        assert!(page("/").is_active("/"));
    }

    #[test]
    fn test_price_and_error() {
        let p = page("/").with_error("Name is required");
        assert_eq!(p.price(Decimal::new(85_000, 0)), "Rp 85.000");
        assert_eq!(p.maybe_price(None), "-");
        assert_eq!(p.error.as_deref(), Some("Name is required"));
        assert!(p.success.is_none());
        assert_eq!(p.admin_user.role_label(), "Viewer");
    }

    #[test]
    fn test_storefront_link() {
        let mut p = page("/products");
        assert_eq!(
            p.storefront_link("/products/flyers").as_deref(),
            Some("https://cetak.id/products/flyers")
        );
        p.storefront_url = None;
        assert!(p.storefront_link("/").is_none());
    }
}
