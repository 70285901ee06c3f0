//! Promo code management routes.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use tracing::instrument;

use printshop_core::{PromoId, PromoKind};

use crate::db::{PromoRepository, RepositoryError};
use crate::error::AppError;
use crate::filters;
use crate::forms::PromoForm;
use crate::middleware::RequireWriteAccess;
use crate::models::Promo;
use crate::routes::{AdminPage, redirect_success};
use crate::state::AppState;

/// Promo list template.
#[derive(Template, WebTemplate)]
#[template(path = "promos/index.html")]
pub struct PromosIndexTemplate {
    pub page: AdminPage,
    pub promos: Vec<Promo>,
}

impl PromosIndexTemplate {
    /// Discount column, e.g. `10%` or `Rp 25.000`.
    #[must_use]
    pub fn discount(&self, promo: &Promo) -> String {
        match promo.kind {
            PromoKind::Percentage => format!("{}%", promo.value.normalize()),
            PromoKind::Fixed => self.page.price(promo.value),
        }
    }
}

/// Promo create/edit template.
#[derive(Template, WebTemplate)]
#[template(path = "promos/form.html")]
pub struct PromoFormTemplate {
    pub page: AdminPage,
    pub promo_id: Option<PromoId>,
    /// Redemptions so far, shown when editing.
    pub used_count: Option<i32>,
    pub form: PromoForm,
}

impl PromoFormTemplate {
    #[must_use]
    pub fn action(&self) -> String {
        self.promo_id
            .map_or_else(|| "/promos".to_string(), |id| format!("/promos/{id}"))
    }

    #[must_use]
    pub fn is_kind(&self, kind: &str) -> bool {
        self.form.kind == kind
    }
}

impl From<&Promo> for PromoForm {
    fn from(promo: &Promo) -> Self {
        Self {
            code: promo.code.clone(),
            description: promo.description.clone(),
            kind: promo.kind.as_str().to_string(),
            value: promo.value.normalize().to_string(),
            min_order_amount: promo
                .min_order_amount
                .map(|a| a.normalize().to_string())
                .unwrap_or_default(),
            max_uses: promo.max_uses.map(|m| m.to_string()).unwrap_or_default(),
            starts_at: promo.starts_at_input(),
            ends_at: promo.ends_at_input(),
            is_active: promo.is_active,
        }
    }
}

fn rerender(
    page: AdminPage,
    promo_id: Option<PromoId>,
    used_count: Option<i32>,
    form: PromoForm,
    message: &str,
) -> Response {
    PromoFormTemplate {
        page: page.with_error(message),
        promo_id,
        used_count,
        form,
    }
    .into_response()
}

fn not_found() -> AppError {
    AppError::NotFound("Promo code".to_string())
}

/// Promo list.
///
/// GET /promos
#[instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    page: AdminPage,
) -> Result<PromosIndexTemplate, AppError> {
    let promos = PromoRepository::new(state.pool()).list().await?;
    Ok(PromosIndexTemplate { page, promos })
}

/// New promo form.
///
/// GET /promos/new
pub async fn new_page(page: AdminPage) -> PromoFormTemplate {
    PromoFormTemplate {
        page,
        promo_id: None,
        used_count: None,
        form: PromoForm {
            kind: PromoKind::Percentage.as_str().to_string(),
            is_active: true,
            ..PromoForm::default()
        },
    }
}

/// Edit promo form.
///
/// GET /promos/{id}/edit
pub async fn edit_page(
    State(state): State<AppState>,
    page: AdminPage,
    Path(id): Path<i32>,
) -> Result<PromoFormTemplate, AppError> {
    let id = PromoId::new(id);
    let promo = PromoRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(not_found)?;

    Ok(PromoFormTemplate {
        page,
        promo_id: Some(id),
        used_count: Some(promo.used_count),
        form: PromoForm::from(&promo),
    })
}

/// Create a promo code.
///
/// POST /promos
#[instrument(skip(state, page, form), fields(admin_id = %admin.id))]
pub async fn create(
    State(state): State<AppState>,
    RequireWriteAccess(admin): RequireWriteAccess,
    page: AdminPage,
    Form(form): Form<PromoForm>,
) -> Result<Response, AppError> {
    let promo = match form.validate() {
        Ok(promo) => promo,
        Err(errors) => return Ok(rerender(page, None, None, form, errors.first_message())),
    };

    match PromoRepository::new(state.pool()).create(&promo).await {
        Ok(id) => {
            tracing::info!(promo_id = %id, code = %promo.code, "promo created");
            Ok(redirect_success("/promos", "Promo code created").into_response())
        }
        Err(RepositoryError::Conflict(message)) => {
            Ok(rerender(page, None, None, form, &message))
        }
        Err(e) => Err(e.into()),
    }
}

/// Update a promo code.
///
/// POST /promos/{id}
#[instrument(skip(state, page, form), fields(admin_id = %admin.id))]
pub async fn update(
    State(state): State<AppState>,
    RequireWriteAccess(admin): RequireWriteAccess,
    page: AdminPage,
    Path(id): Path<i32>,
    Form(form): Form<PromoForm>,
) -> Result<Response, AppError> {
    let id = PromoId::new(id);
    let repo = PromoRepository::new(state.pool());
    let existing = repo.get(id).await?.ok_or_else(not_found)?;
    let used_count = Some(existing.used_count);

    let promo = match form.validate() {
        Ok(promo) => promo,
        Err(errors) => {
            return Ok(rerender(page, Some(id), used_count, form, errors.first_message()));
        }
    };

    match repo.update(id, &promo).await {
        Ok(()) => {
            tracing::info!(promo_id = %id, code = %promo.code, "promo updated");
            Ok(redirect_success("/promos", "Promo code saved").into_response())
        }
        Err(RepositoryError::NotFound) => Err(not_found()),
        Err(RepositoryError::Conflict(message)) => {
            Ok(rerender(page, Some(id), used_count, form, &message))
        }
        Err(e) => Err(e.into()),
    }
}

/// Enable or disable a promo code.
///
/// POST /promos/{id}/toggle
#[instrument(skip(state), fields(admin_id = %admin.id))]
pub async fn toggle(
    State(state): State<AppState>,
    RequireWriteAccess(admin): RequireWriteAccess,
    Path(id): Path<i32>,
) -> Result<Redirect, AppError> {
    let id = PromoId::new(id);
    let active = PromoRepository::new(state.pool())
        .toggle_active(id)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => not_found(),
            other => other.into(),
        })?;

    tracing::info!(promo_id = %id, active, "promo toggled");
    let message = if active {
        "Promo code enabled"
    } else {
        "Promo code disabled"
    };
    Ok(redirect_success("/promos", message))
}

/// Delete a promo code. Orders keep the code they were placed with.
///
/// POST /promos/{id}/delete
#[instrument(skip(state), fields(admin_id = %admin.id))]
pub async fn delete(
    State(state): State<AppState>,
    RequireWriteAccess(admin): RequireWriteAccess,
    Path(id): Path<i32>,
) -> Result<Redirect, AppError> {
    let id = PromoId::new(id);
    match PromoRepository::new(state.pool()).delete(id).await {
        Ok(()) => {
            tracing::info!(promo_id = %id, "promo deleted");
            Ok(redirect_success("/promos", "Promo code deleted"))
        }
        Err(RepositoryError::NotFound) => Err(not_found()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;

    use super::*;

    fn promo() -> Promo {
        Promo {
            id: PromoId::new(4),
            code: "HEMAT10".to_string(),
            description: "10% off".to_string(),
            kind: PromoKind::Percentage,
            value: Decimal::new(1000, 2),
            min_order_amount: Some(Decimal::new(100_000, 0)),
            max_uses: Some(50),
            used_count: 3,
            starts_at: Some(Utc.with_ymd_and_hms(2026, 11, 1, 0, 0, 0).unwrap()),
            ends_at: Some(Utc.with_ymd_and_hms(2026, 11, 30, 23, 59, 0).unwrap()),
            is_active: true,
        }
    }

    #[test]
    fn test_form_from_promo_validates_to_same_terms() {
        let form = PromoForm::from(&promo());
        assert_eq!(form.value, "10");
        assert_eq!(form.starts_at, "2026-11-01T00:00");

        let valid = form.validate().unwrap();
        assert_eq!(valid.code, "HEMAT10");
        assert_eq!(valid.kind, PromoKind::Percentage);
        assert_eq!(valid.value, Decimal::new(10, 0));
        assert_eq!(valid.max_uses, Some(50));
        assert_eq!(valid.starts_at, promo().starts_at);
        assert_eq!(valid.ends_at, promo().ends_at);
    }
}
