//! Checkout route handlers.
//!
//! Checkout requires a signed-in customer. The entered promo code is kept in
//! the session until the order is placed or the code is cleared.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use printshop_core::AddressId;

use crate::db::AddressRepository;
use crate::error::{AppError, add_breadcrumb};
use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::{Address, session_keys};
use crate::routes::cart::{clear_cart, load_cart};
use crate::routes::{PageContext, redirect_error, redirect_success};
use crate::services::checkout::{CheckoutError, CheckoutService, Quote};
use crate::state::AppState;

/// Promo form data. An empty code clears the applied promo.
#[derive(Debug, Deserialize)]
pub struct PromoForm {
    #[serde(default)]
    pub code: String,
}

/// Place order form data.
#[derive(Debug, Deserialize)]
pub struct PlaceOrderForm {
    #[serde(default)]
    pub address_id: Option<AddressId>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutTemplate {
    pub page: PageContext,
    pub quote: Quote,
    pub addresses: Vec<Address>,
    pub promo_code: String,
    pub checkout_note: String,
    pub accepting_orders: bool,
    /// Formatted free-shipping threshold, if free shipping is offered.
    pub free_shipping_from: Option<String>,
}

async fn session_promo(session: &Session) -> Option<String> {
    session
        .get::<String>(session_keys::PROMO_CODE)
        .await
        .ok()
        .flatten()
}

/// Display the checkout page.
#[instrument(skip(state, session, page, current_user), fields(user_id = %current_user.id))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(current_user): RequireAuth,
    mut page: PageContext,
) -> Result<Response, AppError> {
    let cart = load_cart(&session).await;
    if cart.is_empty() {
        return Ok(redirect_error("/cart", "Your cart is empty").into_response());
    }

    let settings = state.settings().await?;
    let checkout = CheckoutService::new(state.pool());
    let promo_code = session_promo(&session).await;

    let quote = match checkout
        .quote(&cart, promo_code.as_deref(), &settings)
        .await
    {
        Ok(quote) => quote,
        Err(CheckoutError::Repository(e)) => return Err(e.into()),
        Err(e) => {
            // The stored code stopped being valid (expired, used up, cart shrank).
            let _ = session.remove::<String>(session_keys::PROMO_CODE).await;
            page.error = Some(e.user_message());
            checkout.quote(&cart, None, &settings).await?
        }
    };

    if quote.is_empty() {
        return Ok(redirect_error("/cart", "Your cart is empty").into_response());
    }

    let addresses = AddressRepository::new(state.pool())
        .list_for_user(current_user.id)
        .await?;
    let free_shipping_from = settings
        .shipping
        .free_shipping_threshold
        .map(|threshold| page.price(threshold));

    Ok(CheckoutTemplate {
        page,
        promo_code: quote
            .promo
            .as_ref()
            .map(|p| p.code.clone())
            .unwrap_or_default(),
        quote,
        addresses,
        checkout_note: settings.orders.checkout_note.clone(),
        accepting_orders: settings.orders.accepting_orders,
        free_shipping_from,
    }
    .into_response())
}

/// Apply (or clear) a promo code and return to the checkout page.
#[instrument(skip(state, session, current_user), fields(user_id = %current_user.id))]
pub async fn apply_promo(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(current_user): RequireAuth,
    Form(form): Form<PromoForm>,
) -> Result<Redirect, AppError> {
    let code = form.code.trim();
    if code.is_empty() {
        let _ = session.remove::<String>(session_keys::PROMO_CODE).await;
        return Ok(redirect_success("/checkout", "Promo code removed"));
    }

    let cart = load_cart(&session).await;
    let settings = state.settings().await?;

    match CheckoutService::new(state.pool())
        .quote(&cart, Some(code), &settings)
        .await
    {
        Ok(quote) => {
            let Some(promo) = quote.promo else {
                return Ok(redirect_error("/checkout", "Promo code not found"));
            };
            session
                .insert(session_keys::PROMO_CODE, &promo.code)
                .await
                .map_err(|e| AppError::Internal(format!("session write failed: {e}")))?;
            Ok(redirect_success(
                "/checkout",
                &format!("Promo {} applied", promo.code),
            ))
        }
        Err(CheckoutError::Repository(e)) => Err(e.into()),
        Err(e) => Ok(redirect_error("/checkout", &e.user_message())),
    }
}

/// Place the order, clear the cart and show the new order.
#[instrument(skip(state, session, current_user), fields(user_id = %current_user.id))]
pub async fn place_order(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(current_user): RequireAuth,
    Form(form): Form<PlaceOrderForm>,
) -> Result<Redirect, AppError> {
    let cart = load_cart(&session).await;
    let promo_code = session_promo(&session).await;
    let settings = state.settings().await?;

    let result = CheckoutService::new(state.pool())
        .place_order(
            current_user.id,
            &cart,
            form.address_id,
            promo_code.as_deref(),
            form.notes.as_deref(),
            &settings,
        )
        .await;

    match result {
        Ok(order) => {
            if let Err(e) = clear_cart(&session).await {
                tracing::error!("Failed to clear cart after order: {e}");
            }
            add_breadcrumb(
                "checkout",
                "Order placed",
                Some(&[("order_number", order.order_number.as_str())]),
            );
            Ok(redirect_success(
                &format!("/account/orders/{}", order.order_number),
                "Thank you! Your order has been placed",
            ))
        }
        Err(CheckoutError::Repository(e)) => Err(e.into()),
        Err(CheckoutError::NoAddress) => Ok(redirect_error(
            "/account/addresses",
            &CheckoutError::NoAddress.user_message(),
        )),
        Err(CheckoutError::EmptyCart) => Ok(redirect_error(
            "/cart",
            &CheckoutError::EmptyCart.user_message(),
        )),
        Err(e) => {
            if matches!(e, CheckoutError::PromoUnavailable | CheckoutError::Promo(_)) {
                let _ = session.remove::<String>(session_keys::PROMO_CODE).await;
            }
            Ok(redirect_error("/checkout", &e.user_message()))
        }
    }
}
