//! Store settings routes.
//!
//! One page with three tabs. Each tab posts its own form and is stored as
//! its own settings row, so saving one tab never overwrites another.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use printshop_core::{CurrencyCode, GeneralSettings, OrderSettings, ShippingSettings, StoreSettings};

use crate::db::SettingsRepository;
use crate::error::AppError;
use crate::filters;
use printshop_core::forms::FormErrors;
use crate::forms::{GeneralSettingsForm, OrderSettingsForm, ShippingSettingsForm};
use crate::middleware::RequireWriteAccess;
use crate::models::CurrentAdmin;
use crate::routes::{AdminPage, redirect_success};
use crate::state::AppState;

/// Settings tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SettingsTab {
    #[default]
    General,
    Shipping,
    Orders,
}

impl SettingsTab {
    pub const ALL: [Self; 3] = [Self::General, Self::Shipping, Self::Orders];

    /// Parse the `tab` query parameter, falling back to general.
    #[must_use]
    pub fn from_query(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("shipping") => Self::Shipping,
            Some("orders") => Self::Orders,
            _ => Self::General,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Shipping => "shipping",
            Self::Orders => "orders",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::General => "General",
            Self::Shipping => "Shipping",
            Self::Orders => "Orders",
        }
    }

    fn path(self) -> String {
        format!("/settings?tab={}", self.as_str())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SettingsQuery {
    pub tab: Option<String>,
}

/// Settings page template.
#[derive(Template, WebTemplate)]
#[template(path = "settings.html")]
pub struct SettingsTemplate {
    pub page: AdminPage,
    pub tab: SettingsTab,
    pub tabs: &'static [SettingsTab],
    pub currencies: &'static [CurrencyCode],
    pub general: GeneralSettingsForm,
    pub shipping: ShippingSettingsForm,
    pub orders: OrderSettingsForm,
}

impl SettingsTemplate {
    fn new(page: AdminPage, tab: SettingsTab, settings: &StoreSettings) -> Self {
        Self {
            page,
            tab,
            tabs: &SettingsTab::ALL,
            currencies: &CurrencyCode::ALL,
            general: GeneralSettingsForm::from(&settings.general),
            shipping: ShippingSettingsForm::from(&settings.shipping),
            orders: OrderSettingsForm::from(&settings.orders),
        }
    }

    #[must_use]
    pub fn is_currency(&self, currency: &CurrencyCode) -> bool {
        self.general.currency == currency.code()
    }
}

impl From<&GeneralSettings> for GeneralSettingsForm {
    fn from(settings: &GeneralSettings) -> Self {
        Self {
            store_name: settings.store_name.clone(),
            contact_email: settings.contact_email.clone(),
            contact_phone: settings.contact_phone.clone(),
            address: settings.address.clone(),
            currency: settings.currency.code().to_string(),
        }
    }
}

impl From<&ShippingSettings> for ShippingSettingsForm {
    fn from(settings: &ShippingSettings) -> Self {
        Self {
            flat_fee: settings.flat_fee.normalize().to_string(),
            free_shipping_threshold: settings
                .free_shipping_threshold
                .map(|t| t.normalize().to_string())
                .unwrap_or_default(),
        }
    }
}

impl From<&OrderSettings> for OrderSettingsForm {
    fn from(settings: &OrderSettings) -> Self {
        Self {
            order_number_prefix: settings.order_number_prefix.clone(),
            accepting_orders: settings.accepting_orders,
            checkout_note: settings.checkout_note.clone(),
        }
    }
}

/// Settings page.
///
/// GET /settings?tab=general|shipping|orders
#[instrument(skip(state, page))]
pub async fn index(
    State(state): State<AppState>,
    page: AdminPage,
    Query(query): Query<SettingsQuery>,
) -> Result<SettingsTemplate, AppError> {
    let settings = SettingsRepository::new(state.pool()).load().await?;
    let tab = SettingsTab::from_query(query.tab.as_deref());
    Ok(SettingsTemplate::new(page, tab, &settings))
}

/// Validate one tab and store it under `key`, or re-render the tab with the
/// submitted values and the first error.
async fn save_tab<T: Serialize + Sync>(
    state: &AppState,
    admin: &CurrentAdmin,
    page: AdminPage,
    tab: SettingsTab,
    key: &str,
    validated: Result<T, FormErrors>,
    keep_submitted: impl FnOnce(&mut SettingsTemplate),
) -> Result<Response, AppError> {
    let repo = SettingsRepository::new(state.pool());
    match validated {
        Ok(value) => {
            repo.save(key, &value).await?;
            tracing::info!(admin_id = %admin.id, key, "settings saved");
            Ok(redirect_success(&tab.path(), "Settings saved").into_response())
        }
        Err(errors) => {
            let settings = repo.load().await?;
            let mut template =
                SettingsTemplate::new(page.with_error(errors.first_message()), tab, &settings);
            keep_submitted(&mut template);
            Ok(template.into_response())
        }
    }
}

/// Save the general tab.
///
/// POST /settings/general
#[instrument(skip_all, fields(admin_id = %admin.id))]
pub async fn save_general(
    State(state): State<AppState>,
    RequireWriteAccess(admin): RequireWriteAccess,
    page: AdminPage,
    Form(form): Form<GeneralSettingsForm>,
) -> Result<Response, AppError> {
    let validated = form.validate();
    save_tab(
        &state,
        &admin,
        page,
        SettingsTab::General,
        StoreSettings::GENERAL_KEY,
        validated,
        |t| t.general = form,
    )
    .await
}

/// Save the shipping tab.
///
/// POST /settings/shipping
#[instrument(skip_all, fields(admin_id = %admin.id))]
pub async fn save_shipping(
    State(state): State<AppState>,
    RequireWriteAccess(admin): RequireWriteAccess,
    page: AdminPage,
    Form(form): Form<ShippingSettingsForm>,
) -> Result<Response, AppError> {
    let validated = form.validate();
    save_tab(
        &state,
        &admin,
        page,
        SettingsTab::Shipping,
        StoreSettings::SHIPPING_KEY,
        validated,
        |t| t.shipping = form,
    )
    .await
}

/// Save the orders tab.
///
/// POST /settings/orders
#[instrument(skip_all, fields(admin_id = %admin.id))]
pub async fn save_orders(
    State(state): State<AppState>,
    RequireWriteAccess(admin): RequireWriteAccess,
    page: AdminPage,
    Form(form): Form<OrderSettingsForm>,
) -> Result<Response, AppError> {
    let validated = form.validate();
    save_tab(
        &state,
        &admin,
        page,
        SettingsTab::Orders,
        StoreSettings::ORDERS_KEY,
        validated,
        |t| t.orders = form,
    )
    .await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_from_query() {
        assert_eq!(SettingsTab::from_query(None), SettingsTab::General);
        assert_eq!(SettingsTab::from_query(Some("shipping")), SettingsTab::Shipping);
        assert_eq!(SettingsTab::from_query(Some("orders")), SettingsTab::Orders);
        assert_eq!(SettingsTab::from_query(Some("billing")), SettingsTab::General);
        assert_eq!(SettingsTab::Orders.path(), "/settings?tab=orders");
    }

    #[test]
    fn test_default_settings_round_trip_through_forms() {
        let settings = StoreSettings::default();

        let general = GeneralSettingsForm::from(&settings.general).validate().unwrap();
        assert_eq!(general, settings.general);

        let shipping = ShippingSettingsForm::from(&settings.shipping).validate().unwrap();
        assert_eq!(shipping, settings.shipping);

        let orders = OrderSettingsForm::from(&settings.orders).validate().unwrap();
        assert_eq!(orders, settings.orders);
    }
}
