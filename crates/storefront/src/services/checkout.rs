//! Cart pricing and order placement.
//!
//! The session cart holds only product IDs and quantities. Everything with a
//! price on it is recomputed here from the catalog, the promo table and the
//! store settings, both for display and when the order is placed.

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::PgPool;
use thiserror::Error;

use printshop_core::pricing::{CartLine, OrderTotals, PromoError};
use printshop_core::{AddressId, ProductId, StoreSettings, UserId};

use crate::db::{
    AddressRepository, CatalogRepository, NewOrder, NewOrderItem, OrderRepository,
    PromoRepository, RepositoryError,
};
use crate::models::promo::normalize_code;
use crate::models::{Cart, Order, Product, Promo};

/// Errors that can occur while pricing or placing an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,

    #[error("store is not accepting orders")]
    NotAcceptingOrders,

    #[error("shipping address not found")]
    AddressNotFound,

    #[error("no shipping address")]
    NoAddress,

    #[error("unknown promo code")]
    UnknownPromo,

    #[error("promo rejected: {0}")]
    Promo(#[from] PromoError),

    #[error("promo no longer available")]
    PromoUnavailable,

    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

impl CheckoutError {
    /// Message safe to show to the customer.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::EmptyCart => "Your cart is empty".to_string(),
            Self::NotAcceptingOrders => {
                "We are not accepting new orders right now, please try again later".to_string()
            }
            Self::AddressNotFound => "Please choose one of your shipping addresses".to_string(),
            Self::NoAddress => "Please add a shipping address before checking out".to_string(),
            Self::UnknownPromo => "Promo code not found".to_string(),
            Self::Promo(e) => capitalize(&e.to_string()),
            Self::PromoUnavailable => "This promo code has reached its usage limit".to_string(),
            Self::Repository(_) => "Something went wrong, please try again".to_string(),
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// A cart line joined with its current catalog data.
#[derive(Debug, Clone)]
pub struct PricedLine {
    pub product: Product,
    pub quantity: u32,
    pub notes: Option<String>,
}

impl PricedLine {
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product.base_price * Decimal::from(self.quantity)
    }

    fn as_cart_line(&self) -> CartLine {
        CartLine {
            unit_price: self.product.base_price,
            quantity: self.quantity,
        }
    }
}

/// The cart as it would be ordered right now.
#[derive(Debug, Clone)]
pub struct Quote {
    pub lines: Vec<PricedLine>,
    /// Cart entries whose product is no longer available.
    pub unavailable: Vec<ProductId>,
    pub promo: Option<Promo>,
    pub totals: OrderTotals,
}

impl Quote {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Checkout service.
pub struct CheckoutService<'a> {
    pool: &'a PgPool,
}

impl<'a> CheckoutService<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Join the cart with the catalog. Products that have been deactivated
    /// since they were added are reported in `unavailable`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the catalog cannot be read.
    pub async fn price_lines(
        &self,
        cart: &Cart,
    ) -> Result<(Vec<PricedLine>, Vec<ProductId>), RepositoryError> {
        let products = CatalogRepository::new(self.pool)
            .get_products(&cart.product_ids())
            .await?;

        let mut lines = Vec::with_capacity(cart.items.len());
        let mut unavailable = Vec::new();
        for item in &cart.items {
            match products.iter().find(|p| p.id == item.product_id) {
                Some(product) => lines.push(PricedLine {
                    product: product.clone(),
                    quantity: item.quantity.max(product.min_order_quantity()),
                    notes: item.notes.clone(),
                }),
                None => unavailable.push(item.product_id),
            }
        }
        Ok((lines, unavailable))
    }

    /// Price the cart with an optional promo code.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::UnknownPromo` or `CheckoutError::Promo` if the
    /// code cannot be applied to this cart.
    pub async fn quote(
        &self,
        cart: &Cart,
        promo_code: Option<&str>,
        settings: &StoreSettings,
    ) -> Result<Quote, CheckoutError> {
        let (lines, unavailable) = self.price_lines(cart).await?;

        let promo = match promo_code.map(normalize_code).filter(|c| !c.is_empty()) {
            Some(code) => Some(
                PromoRepository::new(self.pool)
                    .get_by_code(&code)
                    .await?
                    .ok_or(CheckoutError::UnknownPromo)?,
            ),
            None => None,
        };

        let cart_lines: Vec<CartLine> = lines.iter().map(PricedLine::as_cart_line).collect();
        let terms = promo.as_ref().map(Promo::terms);
        let totals = OrderTotals::compute(
            &cart_lines,
            terms.as_ref(),
            &settings.shipping.rules(),
            Utc::now(),
        )?;

        Ok(Quote {
            lines,
            unavailable,
            promo,
            totals,
        })
    }

    /// Place an order for the cart.
    ///
    /// Prices are recomputed, the promo is re-validated and its usage is
    /// claimed in the same transaction that writes the order.
    ///
    /// # Errors
    ///
    /// Returns a `CheckoutError` describing why the order could not be placed.
    pub async fn place_order(
        &self,
        user_id: UserId,
        cart: &Cart,
        address_id: Option<AddressId>,
        promo_code: Option<&str>,
        notes: Option<&str>,
        settings: &StoreSettings,
    ) -> Result<Order, CheckoutError> {
        if !settings.orders.accepting_orders {
            return Err(CheckoutError::NotAcceptingOrders);
        }

        let quote = self.quote(cart, promo_code, settings).await?;
        if quote.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let addresses = AddressRepository::new(self.pool);
        let shipping = match address_id {
            Some(id) => addresses
                .get(user_id, id)
                .await?
                .ok_or(CheckoutError::AddressNotFound)?,
            None => addresses
                .default_for_user(user_id)
                .await?
                .ok_or(CheckoutError::NoAddress)?,
        };

        let items = quote
            .lines
            .iter()
            .map(|line| NewOrderItem {
                product_id: line.product.id,
                product_name: line.product.name.clone(),
                unit_price: line.product.base_price,
                quantity: i32::try_from(line.quantity).unwrap_or(i32::MAX),
                notes: line.notes.clone(),
            })
            .collect();

        let notes = notes
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(ToString::to_string);

        OrderRepository::new(self.pool)
            .place(NewOrder {
                user_id,
                order_number_prefix: &settings.orders.order_number_prefix,
                items,
                totals: quote.totals,
                promo: quote.promo.map(|p| (p.id, p.code)),
                shipping: &shipping,
                notes,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => CheckoutError::PromoUnavailable,
                other => CheckoutError::Repository(other),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_promo_error_messages_are_capitalized() {
        let err = CheckoutError::Promo(PromoError::Expired);
        assert_eq!(err.user_message(), "This promo code has expired");
    }

    #[test]
    fn test_repository_error_message_is_generic() {
        let err = CheckoutError::Repository(RepositoryError::NotFound);
        assert_eq!(err.user_message(), "Something went wrong, please try again");
    }

    #[test]
    fn test_capitalize_empty() {
        assert_eq!(capitalize(""), "");
    }
}
