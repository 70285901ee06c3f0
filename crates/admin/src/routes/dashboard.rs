//! Dashboard route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use crate::db::{DashboardStats, OrderRepository};
use crate::error::AppError;
use crate::filters;
use crate::models::OrderSummary;
use crate::routes::AdminPage;
use crate::state::AppState;

/// Orders shown in the "recent orders" table.
const RECENT_ORDERS: i64 = 10;

/// Dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub page: AdminPage,
    pub stats: DashboardStats,
    pub recent_orders: Vec<OrderSummary>,
}

/// Dashboard overview.
///
/// GET /
#[instrument(skip_all)]
pub async fn dashboard(
    State(state): State<AppState>,
    page: AdminPage,
) -> Result<DashboardTemplate, AppError> {
    let orders = OrderRepository::new(state.pool());
    let stats = orders.dashboard_stats().await?;
    let recent_orders = orders.list_recent(RECENT_ORDERS).await?;

    Ok(DashboardTemplate {
        page,
        stats,
        recent_orders,
    })
}
