//! Cart route handlers.
//!
//! The cart lives in the session as a list of product IDs and quantities.
//! Every mutation is a plain form POST that redirects back with a toast.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use printshop_core::ProductId;

use crate::db::CatalogRepository;
use crate::error::AppError;
use crate::filters;
use crate::models::{Cart, session_keys};
use crate::routes::{PageContext, redirect_error, redirect_success};
use crate::services::checkout::{CheckoutService, PricedLine};
use crate::state::AppState;

// =============================================================================
// Session Helpers
// =============================================================================

/// Read the cart from the session. A missing or unreadable cart is empty.
pub async fn load_cart(session: &Session) -> Cart {
    session
        .get::<Cart>(session_keys::CART)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

/// Write the cart back to the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn save_cart(session: &Session, cart: &Cart) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CART, cart).await
}

/// Empty the cart and forget the entered promo code.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_cart(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.remove::<Cart>(session_keys::CART).await?;
    session.remove::<String>(session_keys::PROMO_CODE).await?;
    Ok(())
}

fn session_error(e: &tower_sessions::session::Error) -> AppError {
    AppError::Internal(format!("session write failed: {e}"))
}

// =============================================================================
// Forms
// =============================================================================

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: ProductId,
    pub quantity: u32,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: ProductId,
}

// =============================================================================
// Templates
// =============================================================================

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub page: PageContext,
    pub lines: Vec<PricedLine>,
    pub subtotal: Decimal,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display cart page.
///
/// Lines whose product has been deactivated are dropped from the session.
#[instrument(skip(state, session, page))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    mut page: PageContext,
) -> Result<Response, AppError> {
    let mut cart = load_cart(&session).await;
    let (lines, unavailable) = CheckoutService::new(state.pool())
        .price_lines(&cart)
        .await?;

    if !unavailable.is_empty() {
        for product_id in &unavailable {
            cart.remove(*product_id);
        }
        save_cart(&session, &cart).await.map_err(|e| session_error(&e))?;
        page.cart_count = cart.items.len();
        page.error = Some("Some items are no longer available and were removed".to_string());
    }

    let subtotal = lines.iter().map(PricedLine::line_total).sum();
    Ok(CartShowTemplate {
        page,
        lines,
        subtotal,
    }
    .into_response())
}

/// Add a product to the cart.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Redirect, AppError> {
    let Some(product) = CatalogRepository::new(state.pool())
        .get_product(form.product_id)
        .await?
    else {
        return Ok(redirect_error("/products", "This product is no longer available"));
    };

    let mut cart = load_cart(&session).await;
    cart.add(
        product.id,
        form.quantity,
        product.min_order_quantity(),
        form.notes,
    );
    save_cart(&session, &cart).await.map_err(|e| session_error(&e))?;

    tracing::debug!(product_id = %product.id, quantity = form.quantity, "added to cart");
    Ok(redirect_success(
        "/cart",
        &format!("{} added to your cart", product.name),
    ))
}

/// Change a line's quantity. Zero removes the line.
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<UpdateCartForm>,
) -> Result<Redirect, AppError> {
    let mut cart = load_cart(&session).await;

    let min_quantity = CatalogRepository::new(state.pool())
        .get_product(form.product_id)
        .await?
        .map_or(1, |p| p.min_order_quantity());

    if !cart.update(form.product_id, form.quantity, min_quantity) {
        return Ok(redirect_error("/cart", "That item is not in your cart"));
    }
    save_cart(&session, &cart).await.map_err(|e| session_error(&e))?;

    Ok(redirect_success("/cart", "Cart updated"))
}

/// Remove a line from the cart.
#[instrument(skip(session))]
pub async fn remove(
    session: Session,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Redirect, AppError> {
    let mut cart = load_cart(&session).await;
    if cart.remove(form.product_id) {
        save_cart(&session, &cart).await.map_err(|e| session_error(&e))?;
    }
    Ok(redirect_success("/cart", "Item removed"))
}
