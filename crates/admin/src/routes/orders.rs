//! Order management routes.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::Redirect,
};
use serde::Deserialize;
use tracing::instrument;

use printshop_core::OrderStatus;
use printshop_core::filter::{ALL, OrderFilter};

use crate::db::{OrderRepository, RepositoryError};
use crate::db::orders::ORDER_LIST_LIMIT;
use crate::error::AppError;
use crate::filters;
use crate::forms::StatusForm;
use crate::middleware::RequireWriteAccess;
use crate::models::{Order, OrderItem, OrderSummary};
use crate::routes::{AdminPage, redirect_error, redirect_success};
use crate::state::AppState;

/// Query parameters for the order list.
#[derive(Debug, Default, Deserialize)]
pub struct OrdersQuery {
    pub q: Option<String>,
    pub status: Option<String>,
}

/// Order list template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/index.html")]
pub struct OrdersIndexTemplate {
    pub page: AdminPage,
    pub orders: Vec<OrderSummary>,
    pub search: String,
    pub status: String,
    pub statuses: &'static [OrderStatus],
}

/// Order detail template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/show.html")]
pub struct OrderShowTemplate {
    pub page: AdminPage,
    pub order: Order,
    pub items: Vec<OrderItem>,
    pub next_statuses: Vec<OrderStatus>,
}

fn order_path(order_number: &str) -> String {
    format!("/orders/{}", urlencoding::encode(order_number))
}

/// Order list, newest first, filtered by search text and status.
///
/// GET /orders
#[instrument(skip(state, page))]
pub async fn index(
    State(state): State<AppState>,
    page: AdminPage,
    Query(query): Query<OrdersQuery>,
) -> Result<OrdersIndexTemplate, AppError> {
    let all = OrderRepository::new(state.pool())
        .list_recent(ORDER_LIST_LIMIT)
        .await?;

    let filter = OrderFilter::from_query(query.q.as_deref(), query.status.as_deref());
    let orders = filter.apply(&all).into_iter().cloned().collect();

    Ok(OrdersIndexTemplate {
        page,
        orders,
        search: query.q.unwrap_or_default(),
        status: query.status.unwrap_or_else(|| ALL.to_string()),
        statuses: &OrderStatus::ALL,
    })
}

/// Order detail with line items and the statuses it can move to.
///
/// GET /orders/{number}
#[instrument(skip(state, page))]
pub async fn show(
    State(state): State<AppState>,
    page: AdminPage,
    Path(number): Path<String>,
) -> Result<OrderShowTemplate, AppError> {
    let repo = OrderRepository::new(state.pool());
    let order = repo
        .get_by_number(&number)
        .await?
        .ok_or_else(|| AppError::NotFound("Order".to_string()))?;
    let items = repo.items(order.id).await?;
    let next_statuses = order.next_statuses();

    Ok(OrderShowTemplate {
        page,
        order,
        items,
        next_statuses,
    })
}

/// Move an order to a new status.
///
/// POST /orders/{number}/status
#[instrument(skip(state, form), fields(admin_id = %admin.id))]
pub async fn update_status(
    State(state): State<AppState>,
    RequireWriteAccess(admin): RequireWriteAccess,
    Path(number): Path<String>,
    Form(form): Form<StatusForm>,
) -> Result<Redirect, AppError> {
    let back = order_path(&number);
    let next = match form.validate() {
        Ok(status) => status,
        Err(errors) => return Ok(redirect_error(&back, errors.first_message())),
    };

    let repo = OrderRepository::new(state.pool());
    let order = repo
        .get_by_number(&number)
        .await?
        .ok_or_else(|| AppError::NotFound("Order".to_string()))?;

    if !order.status.can_transition_to(next) {
        return Ok(redirect_error(
            &back,
            &format!(
                "An order that is {} cannot be moved to {}",
                order.status.label(),
                next.label()
            ),
        ));
    }

    let result = repo.update_status(order.id, order.status, next).await;
    if result.is_ok() {
        tracing::info!(
            order_number = %order.order_number,
            from = %order.status,
            to = %next,
            "order status changed"
        );
    }
    status_update_redirect(&back, next, result)
}

/// Toast for a status update. A concurrent change is shown on the order page
/// rather than as an error page.
fn status_update_redirect(
    back: &str,
    next: OrderStatus,
    result: Result<(), RepositoryError>,
) -> Result<Redirect, AppError> {
    match result {
        Ok(()) => Ok(redirect_success(
            back,
            &format!("Order marked as {}", next.label()),
        )),
        Err(RepositoryError::Conflict(message)) => Ok(redirect_error(back, &message)),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use axum::http::header::LOCATION;
    use axum::response::IntoResponse;

    use super::*;

    fn location(redirect: Redirect) -> String {
        redirect.into_response().headers()[LOCATION]
            .to_str()
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_concurrent_status_change_redirects_with_error() {
        let redirect = status_update_redirect(
            "/orders/PS-1",
            OrderStatus::Shipped,
            Err(RepositoryError::Conflict(
                "The order was updated by someone else, please reload".to_string(),
            )),
        )
        .unwrap();
        assert_eq!(
            location(redirect),
            "/orders/PS-1?error=The%20order%20was%20updated%20by%20someone%20else%2C%20please%20reload"
        );
    }

    #[test]
    fn test_status_change_redirects_with_success() {
        let redirect =
            status_update_redirect("/orders/PS-1", OrderStatus::Shipped, Ok(())).unwrap();
        assert!(location(redirect).starts_with("/orders/PS-1?success=Order%20marked%20as%20"));
    }

    #[test]
    fn test_order_path_encodes_number() {
        assert_eq!(order_path("PS-2410-0001"), "/orders/PS-2410-0001");
        assert_eq!(order_path("PS 1"), "/orders/PS%201");
    }
}
