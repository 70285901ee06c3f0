//! Account route handlers.
//!
//! These routes require authentication. Every form posts, performs one
//! write and redirects back with a toast.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use printshop_core::filter::OrderFilter;
use printshop_core::forms::{AddressForm, PasswordForm, ProfileForm};
use printshop_core::{AddressId, OrderStatus};

use crate::db::{AddressRepository, OrderRepository, RepositoryError, UserRepository};
use crate::error::AppError;
use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::{Address, CurrentUser, Order, OrderItem, OrderSummary, User, session_keys};
use crate::routes::{PageContext, redirect_error, redirect_success};
use crate::services::auth::AuthService;
use crate::state::AppState;

/// Orders shown on the account overview.
const RECENT_ORDERS: i64 = 5;

// =============================================================================
// Templates
// =============================================================================

/// Account overview page template.
#[derive(Template, WebTemplate)]
#[template(path = "account/index.html")]
pub struct AccountIndexTemplate {
    pub page: PageContext,
    pub user: User,
    pub default_address: Option<Address>,
    pub recent_orders: Vec<OrderSummary>,
}

/// Profile and password page template.
#[derive(Template, WebTemplate)]
#[template(path = "account/profile.html")]
pub struct ProfileTemplate {
    pub page: PageContext,
    pub user: User,
}

/// Address book template.
#[derive(Template, WebTemplate)]
#[template(path = "account/addresses.html")]
pub struct AddressesTemplate {
    pub page: PageContext,
    pub addresses: Vec<Address>,
}

/// A status filter option.
pub struct StatusOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// Order history template.
#[derive(Template, WebTemplate)]
#[template(path = "account/orders.html")]
pub struct OrdersTemplate {
    pub page: PageContext,
    pub orders: Vec<OrderSummary>,
    pub total: usize,
    pub search: String,
    pub statuses: Vec<StatusOption>,
}

/// Order detail template.
#[derive(Template, WebTemplate)]
#[template(path = "account/order.html")]
pub struct OrderDetailTemplate {
    pub page: PageContext,
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// Order history query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct OrdersQuery {
    pub q: Option<String>,
    pub status: Option<String>,
}

/// Status dropdown: "all" followed by every status.
#[must_use]
pub fn status_options(selected: Option<OrderStatus>) -> Vec<StatusOption> {
    std::iter::once(StatusOption {
        value: "all",
        label: "All statuses",
        selected: selected.is_none(),
    })
    .chain(OrderStatus::ALL.iter().map(|status| StatusOption {
        value: status.as_str(),
        label: status.label(),
        selected: selected == Some(*status),
    }))
    .collect()
}

async fn load_user(state: &AppState, current_user: &CurrentUser) -> Result<User, AppError> {
    UserRepository::new(state.pool())
        .get_by_id(current_user.id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("account no longer exists".to_string()))
}

// =============================================================================
// Overview and profile
// =============================================================================

/// Display account overview page.
#[instrument(skip(state, page, current_user), fields(user_id = %current_user.id))]
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(current_user): RequireAuth,
    page: PageContext,
) -> Result<impl IntoResponse, AppError> {
    let user = load_user(&state, &current_user).await?;
    let default_address = AddressRepository::new(state.pool())
        .default_for_user(user.id)
        .await?;
    let recent_orders = OrderRepository::new(state.pool())
        .list_for_user(user.id, Some(RECENT_ORDERS))
        .await?;

    Ok(AccountIndexTemplate {
        page,
        user,
        default_address,
        recent_orders,
    })
}

/// Display the profile and password forms.
#[instrument(skip(state, page, current_user), fields(user_id = %current_user.id))]
pub async fn profile_page(
    State(state): State<AppState>,
    RequireAuth(current_user): RequireAuth,
    page: PageContext,
) -> Result<impl IntoResponse, AppError> {
    let user = load_user(&state, &current_user).await?;
    Ok(ProfileTemplate { page, user })
}

/// Save name and phone.
#[instrument(skip(state, session, current_user, form), fields(user_id = %current_user.id))]
pub async fn update_profile(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(current_user): RequireAuth,
    Form(form): Form<ProfileForm>,
) -> Result<Redirect, AppError> {
    let profile = match form.validate() {
        Ok(profile) => profile,
        Err(errors) => return Ok(redirect_error("/account/profile", errors.first_message())),
    };

    let user = UserRepository::new(state.pool())
        .update_profile(current_user.id, &profile.full_name, profile.phone.as_deref())
        .await?;

    // Keep the header greeting in sync.
    if let Err(e) = session
        .insert(session_keys::CURRENT_USER, CurrentUser::from(&user))
        .await
    {
        tracing::warn!("Failed to refresh session user: {e}");
    }

    Ok(redirect_success("/account/profile", "Profile updated"))
}

/// Change password.
#[instrument(skip(state, current_user, form), fields(user_id = %current_user.id))]
pub async fn change_password(
    State(state): State<AppState>,
    RequireAuth(current_user): RequireAuth,
    Form(form): Form<PasswordForm>,
) -> Result<Redirect, AppError> {
    match AuthService::new(state.pool())
        .change_password(current_user.id, &form)
        .await
    {
        Ok(()) => Ok(redirect_success("/account/profile", "Password changed")),
        Err(e) if e.is_server_error() => Err(e.into()),
        Err(e) => Ok(redirect_error("/account/profile", &e.user_message())),
    }
}

// =============================================================================
// Addresses
// =============================================================================

/// Display the address book.
#[instrument(skip(state, page, current_user), fields(user_id = %current_user.id))]
pub async fn addresses(
    State(state): State<AppState>,
    RequireAuth(current_user): RequireAuth,
    page: PageContext,
) -> Result<impl IntoResponse, AppError> {
    let addresses = AddressRepository::new(state.pool())
        .list_for_user(current_user.id)
        .await?;
    Ok(AddressesTemplate { page, addresses })
}

/// Add an address.
#[instrument(skip(state, current_user, form), fields(user_id = %current_user.id))]
pub async fn create_address(
    State(state): State<AppState>,
    RequireAuth(current_user): RequireAuth,
    Form(form): Form<AddressForm>,
) -> Result<Redirect, AppError> {
    let address = match form.validate() {
        Ok(address) => address,
        Err(errors) => return Ok(redirect_error("/account/addresses", errors.first_message())),
    };

    AddressRepository::new(state.pool())
        .create(current_user.id, &address)
        .await?;
    Ok(redirect_success("/account/addresses", "Address added"))
}

/// Update an address.
#[instrument(skip(state, current_user, form), fields(user_id = %current_user.id))]
pub async fn update_address(
    State(state): State<AppState>,
    RequireAuth(current_user): RequireAuth,
    Path(id): Path<AddressId>,
    Form(form): Form<AddressForm>,
) -> Result<Redirect, AppError> {
    let address = match form.validate() {
        Ok(address) => address,
        Err(errors) => return Ok(redirect_error("/account/addresses", errors.first_message())),
    };

    match AddressRepository::new(state.pool())
        .update(current_user.id, id, &address)
        .await
    {
        Ok(_) => Ok(redirect_success("/account/addresses", "Address updated")),
        Err(RepositoryError::NotFound) => {
            Ok(redirect_error("/account/addresses", "Address not found"))
        }
        Err(e) => Err(e.into()),
    }
}

/// Delete an address.
#[instrument(skip(state, current_user), fields(user_id = %current_user.id))]
pub async fn delete_address(
    State(state): State<AppState>,
    RequireAuth(current_user): RequireAuth,
    Path(id): Path<AddressId>,
) -> Result<Redirect, AppError> {
    match AddressRepository::new(state.pool())
        .delete(current_user.id, id)
        .await
    {
        Ok(()) => Ok(redirect_success("/account/addresses", "Address deleted")),
        Err(RepositoryError::NotFound) => {
            Ok(redirect_error("/account/addresses", "Address not found"))
        }
        Err(e) => Err(e.into()),
    }
}

/// Make an address the default.
#[instrument(skip(state, current_user), fields(user_id = %current_user.id))]
pub async fn set_default_address(
    State(state): State<AppState>,
    RequireAuth(current_user): RequireAuth,
    Path(id): Path<AddressId>,
) -> Result<Redirect, AppError> {
    match AddressRepository::new(state.pool())
        .set_default(current_user.id, id)
        .await
    {
        Ok(()) => Ok(redirect_success(
            "/account/addresses",
            "Default address updated",
        )),
        Err(RepositoryError::NotFound) => {
            Ok(redirect_error("/account/addresses", "Address not found"))
        }
        Err(e) => Err(e.into()),
    }
}

// =============================================================================
// Orders
// =============================================================================

/// Display order history, filtered by search text and status.
#[instrument(skip(state, page, current_user), fields(user_id = %current_user.id))]
pub async fn orders(
    State(state): State<AppState>,
    RequireAuth(current_user): RequireAuth,
    page: PageContext,
    Query(query): Query<OrdersQuery>,
) -> Result<impl IntoResponse, AppError> {
    let all = OrderRepository::new(state.pool())
        .list_for_user(current_user.id, None)
        .await?;

    let filter = OrderFilter::from_query(query.q.as_deref(), query.status.as_deref());
    let orders = filter.apply(&all).into_iter().cloned().collect();

    Ok(OrdersTemplate {
        page,
        orders,
        total: all.len(),
        search: filter.search().unwrap_or_default().to_string(),
        statuses: status_options(filter.status()),
    })
}

/// Display one order.
#[instrument(skip(state, page, current_user), fields(user_id = %current_user.id))]
pub async fn order_detail(
    State(state): State<AppState>,
    RequireAuth(current_user): RequireAuth,
    page: PageContext,
    Path(number): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let (order, items) = OrderRepository::new(state.pool())
        .get_by_number(current_user.id, &number)
        .await?
        .ok_or_else(|| AppError::NotFound("Order".to_string()))?;

    Ok(OrderDetailTemplate { page, order, items })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_options_mark_selection() {
        let options = status_options(Some(OrderStatus::Shipped));
        assert_eq!(options.len(), OrderStatus::ALL.len() + 1);
        assert_eq!(options[0].value, "all");
        assert!(!options[0].selected);
        let selected: Vec<&str> = options
            .iter()
            .filter(|o| o.selected)
            .map(|o| o.value)
            .collect();
        assert_eq!(selected, vec!["shipped"]);
    }

    #[test]
    fn test_status_options_default_all() {
        let options = status_options(None);
        assert!(options[0].selected);
        assert_eq!(options.iter().filter(|o| o.selected).count(), 1);
    }
}
