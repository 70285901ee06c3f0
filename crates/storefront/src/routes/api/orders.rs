//! Order history API.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Serialize;
use tracing::instrument;

use printshop_core::ApiResponse;
use printshop_core::filter::OrderFilter;

use crate::db::OrderRepository;
use crate::error::{ApiResult, AppError};
use crate::middleware::RequireAuth;
use crate::models::{Order, OrderItem, OrderSummary};
use crate::routes::account::OrdersQuery;
use crate::state::AppState;

/// An order with its lines.
#[derive(Debug, Serialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// `GET /api/orders?q=&status=`
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(query): Query<OrdersQuery>,
) -> ApiResult<Vec<OrderSummary>> {
    let all = OrderRepository::new(state.pool())
        .list_for_user(user.id, None)
        .await?;
    let filter = OrderFilter::from_query(query.q.as_deref(), query.status.as_deref());
    let orders = filter.apply(&all).into_iter().cloned().collect();
    Ok(Json(ApiResponse::ok(orders)))
}

/// `GET /api/orders/{number}`
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(number): Path<String>,
) -> ApiResult<OrderDetail> {
    let (order, items) = OrderRepository::new(state.pool())
        .get_by_number(user.id, &number)
        .await?
        .ok_or_else(|| AppError::NotFound("Order".to_string()))?;
    Ok(Json(ApiResponse::ok(OrderDetail { order, items })))
}
