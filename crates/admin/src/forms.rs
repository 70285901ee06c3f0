//! Admin form parsing and validation.
//!
//! Every admin form arrives as `application/x-www-form-urlencoded` with all
//! values as strings. `validate()` trims, parses and checks them and returns
//! a typed value ready for the repository, or the collected [`FormErrors`].

use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

use printshop_core::forms::{FormErrors, deserialize_checkbox, is_valid_phone};
use printshop_core::{
    CategoryId, CurrencyCode, Email, GeneralSettings, OrderSettings, OrderStatus, PromoKind,
    ShippingSettings,
};

/// Longest accepted product or category name.
pub const MAX_TITLE_LENGTH: usize = 120;
/// Longest accepted order number prefix.
pub const MAX_PREFIX_LENGTH: usize = 6;

/// Turn a display name into a URL slug: lowercase ASCII letters and digits
/// separated by single dashes.
#[must_use]
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}

fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

// =============================================================================
// Field helpers
// =============================================================================

fn required<'a>(errors: &mut FormErrors, field: &'static str, label: &str, value: &'a str) -> &'a str {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.add(field, format!("{label} is required"));
    }
    trimmed
}

fn title(errors: &mut FormErrors, field: &'static str, label: &str, value: &str) -> String {
    let value = required(errors, field, label, value);
    if value.chars().count() > MAX_TITLE_LENGTH {
        errors.add(
            field,
            format!("{label} must be at most {MAX_TITLE_LENGTH} characters"),
        );
    }
    value.to_string()
}

/// Use the submitted slug, or derive one from the name when left blank.
fn slug(errors: &mut FormErrors, submitted: &str, name: &str) -> String {
    let submitted = submitted.trim();
    let slug = if submitted.is_empty() {
        slugify(name)
    } else {
        submitted.to_string()
    };
    if !name.is_empty() && !is_valid_slug(&slug) {
        errors.add(
            "slug",
            "Slug may only contain lowercase letters, digits and dashes",
        );
    }
    slug
}

fn amount(errors: &mut FormErrors, field: &'static str, label: &str, value: &str) -> Decimal {
    let value = value.trim();
    if value.is_empty() {
        errors.add(field, format!("{label} is required"));
        return Decimal::ZERO;
    }
    optional_amount(errors, field, label, value).unwrap_or(Decimal::ZERO)
}

fn optional_amount(
    errors: &mut FormErrors,
    field: &'static str,
    label: &str,
    value: &str,
) -> Option<Decimal> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    match Decimal::from_str(value) {
        Ok(amount) if amount.is_sign_negative() => {
            errors.add(field, format!("{label} cannot be negative"));
            None
        }
        Ok(amount) => Some(amount),
        Err(_) => {
            errors.add(field, format!("{label} must be a number"));
            None
        }
    }
}

fn integer(
    errors: &mut FormErrors,
    field: &'static str,
    label: &str,
    value: &str,
    min: i32,
) -> Option<i32> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    match value.parse::<i32>() {
        Ok(n) if n < min => {
            errors.add(field, format!("{label} must be at least {min}"));
            None
        }
        Ok(n) => Some(n),
        Err(_) => {
            errors.add(field, format!("{label} must be a whole number"));
            None
        }
    }
}

/// Parse a `datetime-local` input (`2026-10-19T14:05`), read as UTC.
fn datetime(errors: &mut FormErrors, field: &'static str, label: &str, value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
        .map(|naive| naive.and_utc())
        .map_err(|_| errors.add(field, format!("{label} is not a valid date")))
        .ok()
}

fn optional_text(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

// =============================================================================
// Products
// =============================================================================

/// Product create/edit form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductForm {
    pub category_id: String,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub description: String,
    pub base_price: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub min_quantity: String,
    #[serde(default)]
    pub turnaround_days: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default, deserialize_with = "deserialize_checkbox")]
    pub is_featured: bool,
    #[serde(default, deserialize_with = "deserialize_checkbox")]
    pub is_active: bool,
}

/// A validated product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidProduct {
    pub category_id: CategoryId,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub base_price: Decimal,
    pub unit: String,
    pub min_quantity: i32,
    pub turnaround_days: i32,
    pub image_url: Option<String>,
    pub is_featured: bool,
    pub is_active: bool,
}

impl ProductForm {
    /// # Errors
    ///
    /// Returns [`FormErrors`] for a missing category or name, a bad slug,
    /// a negative or non-numeric price, or quantities out of range.
    pub fn validate(&self) -> Result<ValidProduct, FormErrors> {
        let mut errors = FormErrors::new();

        let category_id = match self.category_id.trim().parse::<i32>() {
            Ok(id) if id > 0 => CategoryId::new(id),
            _ => {
                errors.add("category_id", "Please choose a category");
                CategoryId::new(0)
            }
        };
        let name = title(&mut errors, "name", "Name", &self.name);
        let slug = slug(&mut errors, &self.slug, &name);
        let base_price = amount(&mut errors, "base_price", "Price", &self.base_price);
        let min_quantity =
            integer(&mut errors, "min_quantity", "Minimum quantity", &self.min_quantity, 1)
                .unwrap_or(1);
        let turnaround_days = integer(
            &mut errors,
            "turnaround_days",
            "Turnaround",
            &self.turnaround_days,
            0,
        )
        .unwrap_or(3);

        let image_url = optional_text(&self.image_url);
        if image_url
            .as_deref()
            .is_some_and(|url| !(url.starts_with("https://") || url.starts_with('/')))
        {
            errors.add("image_url", "Image URL must start with https:// or /");
        }

        let unit = optional_text(&self.unit).unwrap_or_else(|| "pcs".to_string());

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(ValidProduct {
            category_id,
            name,
            slug,
            description: self.description.trim().to_string(),
            base_price,
            unit,
            min_quantity,
            turnaround_days,
            image_url,
            is_featured: self.is_featured,
            is_active: self.is_active,
        })
    }
}

// =============================================================================
// Categories
// =============================================================================

/// Category create/edit form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryForm {
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub sort_order: String,
    #[serde(default, deserialize_with = "deserialize_checkbox")]
    pub is_active: bool,
}

/// A validated category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidCategory {
    pub name: String,
    pub slug: String,
    pub description: String,
    pub sort_order: i32,
    pub is_active: bool,
}

impl CategoryForm {
    /// # Errors
    ///
    /// Returns [`FormErrors`] for a missing name, a bad slug or a
    /// non-numeric sort order.
    pub fn validate(&self) -> Result<ValidCategory, FormErrors> {
        let mut errors = FormErrors::new();

        let name = title(&mut errors, "name", "Name", &self.name);
        let slug = slug(&mut errors, &self.slug, &name);
        let sort_order =
            integer(&mut errors, "sort_order", "Sort order", &self.sort_order, i32::MIN)
                .unwrap_or(0);

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(ValidCategory {
            name,
            slug,
            description: self.description.trim().to_string(),
            sort_order,
            is_active: self.is_active,
        })
    }
}

// =============================================================================
// Promos
// =============================================================================

/// Promo code create/edit form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PromoForm {
    pub code: String,
    #[serde(default)]
    pub description: String,
    pub kind: String,
    pub value: String,
    #[serde(default)]
    pub min_order_amount: String,
    #[serde(default)]
    pub max_uses: String,
    #[serde(default)]
    pub starts_at: String,
    #[serde(default)]
    pub ends_at: String,
    #[serde(default, deserialize_with = "deserialize_checkbox")]
    pub is_active: bool,
}

/// A validated promo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidPromo {
    /// Upper-cased.
    pub code: String,
    pub description: String,
    pub kind: PromoKind,
    pub value: Decimal,
    pub min_order_amount: Option<Decimal>,
    pub max_uses: Option<i32>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub is_active: bool,
}

impl PromoForm {
    /// # Errors
    ///
    /// Returns [`FormErrors`] for a malformed code, an unknown kind, a value
    /// out of range, or an end date before the start date.
    pub fn validate(&self) -> Result<ValidPromo, FormErrors> {
        let mut errors = FormErrors::new();

        let code = required(&mut errors, "code", "Code", &self.code).to_uppercase();
        if !code.is_empty()
            && !(code.len() <= 32
                && code
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'))
        {
            errors.add(
                "code",
                "Code may only contain letters, digits, dashes and underscores (max 32)",
            );
        }

        let kind = PromoKind::from_str(self.kind.trim()).unwrap_or_else(|_| {
            errors.add("kind", "Please choose a discount type");
            PromoKind::Fixed
        });

        let value = amount(&mut errors, "value", "Value", &self.value);
        if value.is_zero() && errors.get("value").is_none() {
            errors.add("value", "Value must be greater than zero");
        }
        if kind == PromoKind::Percentage && value > Decimal::ONE_HUNDRED {
            errors.add("value", "Percentage cannot exceed 100");
        }

        let min_order_amount = optional_amount(
            &mut errors,
            "min_order_amount",
            "Minimum order",
            &self.min_order_amount,
        );
        let max_uses = integer(&mut errors, "max_uses", "Usage limit", &self.max_uses, 1);
        let starts_at = datetime(&mut errors, "starts_at", "Start date", &self.starts_at);
        let ends_at = datetime(&mut errors, "ends_at", "End date", &self.ends_at);
        if let (Some(start), Some(end)) = (starts_at, ends_at)
            && end <= start
        {
            errors.add("ends_at", "End date must be after the start date");
        }

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(ValidPromo {
            code,
            description: self.description.trim().to_string(),
            kind,
            value,
            min_order_amount,
            max_uses,
            starts_at,
            ends_at,
            is_active: self.is_active,
        })
    }
}

// =============================================================================
// Settings
// =============================================================================

/// General settings tab.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeneralSettingsForm {
    pub store_name: String,
    #[serde(default)]
    pub contact_email: String,
    #[serde(default)]
    pub contact_phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub currency: String,
}

impl GeneralSettingsForm {
    /// # Errors
    ///
    /// Returns [`FormErrors`] for a missing store name, a malformed contact
    /// email or phone, or an unsupported currency.
    pub fn validate(&self) -> Result<GeneralSettings, FormErrors> {
        let mut errors = FormErrors::new();

        let store_name = title(&mut errors, "store_name", "Store name", &self.store_name);

        let contact_email = self.contact_email.trim();
        if !contact_email.is_empty() && Email::parse(contact_email).is_err() {
            errors.add("contact_email", "Contact email is not valid");
        }
        let contact_phone = self.contact_phone.trim();
        if !contact_phone.is_empty() && !is_valid_phone(contact_phone) {
            errors.add("contact_phone", "Contact phone is not valid");
        }

        let currency = if self.currency.trim().is_empty() {
            CurrencyCode::default()
        } else {
            CurrencyCode::from_str(&self.currency).unwrap_or_else(|e| {
                errors.add("currency", e);
                CurrencyCode::default()
            })
        };

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(GeneralSettings {
            store_name,
            contact_email: contact_email.to_lowercase(),
            contact_phone: contact_phone.to_string(),
            address: self.address.trim().to_string(),
            currency,
        })
    }
}

/// Shipping settings tab.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShippingSettingsForm {
    pub flat_fee: String,
    /// Empty disables free shipping.
    #[serde(default)]
    pub free_shipping_threshold: String,
}

impl ShippingSettingsForm {
    /// # Errors
    ///
    /// Returns [`FormErrors`] for missing, negative or non-numeric amounts.
    pub fn validate(&self) -> Result<ShippingSettings, FormErrors> {
        let mut errors = FormErrors::new();

        let flat_fee = amount(&mut errors, "flat_fee", "Shipping fee", &self.flat_fee);
        let free_shipping_threshold = optional_amount(
            &mut errors,
            "free_shipping_threshold",
            "Free shipping threshold",
            &self.free_shipping_threshold,
        );

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(ShippingSettings {
            flat_fee,
            free_shipping_threshold,
        })
    }
}

/// Orders settings tab.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderSettingsForm {
    pub order_number_prefix: String,
    #[serde(default, deserialize_with = "deserialize_checkbox")]
    pub accepting_orders: bool,
    #[serde(default)]
    pub checkout_note: String,
}

impl OrderSettingsForm {
    /// # Errors
    ///
    /// Returns [`FormErrors`] when the order number prefix is empty, too long
    /// or not alphanumeric.
    pub fn validate(&self) -> Result<OrderSettings, FormErrors> {
        let mut errors = FormErrors::new();

        let prefix = required(
            &mut errors,
            "order_number_prefix",
            "Order number prefix",
            &self.order_number_prefix,
        )
        .to_uppercase();
        if !prefix.is_empty()
            && (prefix.len() > MAX_PREFIX_LENGTH || !prefix.chars().all(|c| c.is_ascii_alphanumeric()))
        {
            errors.add(
                "order_number_prefix",
                format!("Prefix must be 1-{MAX_PREFIX_LENGTH} letters or digits"),
            );
        }

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(OrderSettings {
            order_number_prefix: prefix,
            accepting_orders: self.accepting_orders,
            checkout_note: self.checkout_note.trim().to_string(),
        })
    }
}

// =============================================================================
// Orders
// =============================================================================

/// Order status change form.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusForm {
    pub status: String,
}

impl StatusForm {
    /// # Errors
    ///
    /// Returns [`FormErrors`] for an unknown status.
    pub fn validate(&self) -> Result<OrderStatus, FormErrors> {
        OrderStatus::from_str(&self.status).map_err(|_| {
            let mut errors = FormErrors::new();
            errors.add("status", "Unknown order status");
            errors
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn product_form() -> ProductForm {
        ProductForm {
            category_id: "2".to_string(),
            name: "  Kartu Nama Premium ".to_string(),
            base_price: "85000".to_string(),
            min_quantity: "100".to_string(),
            turnaround_days: "2".to_string(),
            is_active: true,
            ..ProductForm::default()
        }
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Kartu Nama Premium"), "kartu-nama-premium");
        assert_eq!(slugify("  A5 Flyer -- (Glossy)!"), "a5-flyer-glossy");
        assert_eq!(slugify("Stiker Ø 5cm"), "stiker-5cm");
        assert_eq!(slugify("***"), "");
    }

    #[test]
    fn test_product_form_derives_slug_and_defaults() {
        let product = product_form().validate().unwrap();
        assert_eq!(product.name, "Kartu Nama Premium");
        assert_eq!(product.slug, "kartu-nama-premium");
        assert_eq!(product.category_id, CategoryId::new(2));
        assert_eq!(product.base_price, Decimal::new(85_000, 0));
        assert_eq!(product.unit, "pcs");
        assert_eq!(product.min_quantity, 100);
        assert!(product.is_active);
        assert!(!product.is_featured);
    }

    #[test]
    fn test_product_form_rejects_bad_input() {
        let form = ProductForm {
            category_id: String::new(),
            slug: "Not A Slug".to_string(),
            base_price: "-5".to_string(),
            min_quantity: "0".to_string(),
            image_url: "http://insecure.example/img.png".to_string(),
            ..product_form()
        };
        let errors = form.validate().unwrap_err();
        assert!(errors.get("category_id").is_some());
        assert!(errors.get("slug").is_some());
        assert_eq!(errors.get("base_price"), Some("Price cannot be negative"));
        assert_eq!(errors.get("min_quantity"), Some("Minimum quantity must be at least 1"));
        assert!(errors.get("image_url").is_some());
    }

    #[test]
    fn test_category_form() {
        let form = CategoryForm {
            name: "Banners & Signs".to_string(),
            sort_order: "5".to_string(),
            is_active: true,
            ..CategoryForm::default()
        };
        let category = form.validate().unwrap();
        assert_eq!(category.slug, "banners-signs");
        assert_eq!(category.sort_order, 5);

        let form = CategoryForm {
            name: String::new(),
            ..CategoryForm::default()
        };
        assert_eq!(
            form.validate().unwrap_err().get("name"),
            Some("Name is required")
        );
    }

    fn promo_form() -> PromoForm {
        PromoForm {
            code: " hemat10 ".to_string(),
            kind: "percentage".to_string(),
            value: "10".to_string(),
            is_active: true,
            ..PromoForm::default()
        }
    }

    #[test]
    fn test_promo_code_is_upper_cased() {
        let promo = promo_form().validate().unwrap();
        assert_eq!(promo.code, "HEMAT10");
        assert_eq!(promo.kind, PromoKind::Percentage);
        assert!(promo.max_uses.is_none());
    }

    #[test]
    fn test_promo_percentage_capped() {
        let form = PromoForm {
            value: "150".to_string(),
            ..promo_form()
        };
        assert_eq!(
            form.validate().unwrap_err().get("value"),
            Some("Percentage cannot exceed 100")
        );
    }

    #[test]
    fn test_promo_dates() {
        let form = PromoForm {
            starts_at: "2026-11-01T00:00".to_string(),
            ends_at: "2026-11-30T23:59".to_string(),
            ..promo_form()
        };
        let promo = form.validate().unwrap();
        assert_eq!(
            promo.starts_at,
            Some(Utc.with_ymd_and_hms(2026, 11, 1, 0, 0, 0).unwrap())
        );

        let form = PromoForm {
            starts_at: "2026-11-30T00:00".to_string(),
            ends_at: "2026-11-01T00:00".to_string(),
            ..promo_form()
        };
        assert!(form.validate().unwrap_err().get("ends_at").is_some());
    }

    #[test]
    fn test_promo_rejects_bad_code_and_kind() {
        let form = PromoForm {
            code: "hemat 10%".to_string(),
            kind: "bogus".to_string(),
            ..promo_form()
        };
        let errors = form.validate().unwrap_err();
        assert!(errors.get("code").is_some());
        assert!(errors.get("kind").is_some());
    }

    #[test]
    fn test_general_settings_form() {
        let form = GeneralSettingsForm {
            store_name: "Cetak Kilat".to_string(),
            contact_email: "Halo@CetakKilat.id".to_string(),
            contact_phone: "+62 812-3456-7890".to_string(),
            currency: "idr".to_string(),
            ..GeneralSettingsForm::default()
        };
        let general = form.validate().unwrap();
        assert_eq!(general.contact_email, "halo@cetakkilat.id");
        assert_eq!(general.currency, CurrencyCode::IDR);

        let form = GeneralSettingsForm {
            store_name: "Cetak Kilat".to_string(),
            currency: "GBP".to_string(),
            ..GeneralSettingsForm::default()
        };
        assert!(form.validate().unwrap_err().get("currency").is_some());
    }

    #[test]
    fn test_shipping_settings_form_blank_threshold_disables_free_shipping() {
        let form = ShippingSettingsForm {
            flat_fee: "20000".to_string(),
            free_shipping_threshold: "  ".to_string(),
        };
        let shipping = form.validate().unwrap();
        assert_eq!(shipping.flat_fee, Decimal::new(20_000, 0));
        assert!(shipping.free_shipping_threshold.is_none());
    }

    #[test]
    fn test_order_settings_prefix() {
        let form = OrderSettingsForm {
            order_number_prefix: "ck".to_string(),
            accepting_orders: true,
            checkout_note: String::new(),
        };
        assert_eq!(form.validate().unwrap().order_number_prefix, "CK");

        let form = OrderSettingsForm {
            order_number_prefix: "TOO-LONG".to_string(),
            accepting_orders: true,
            checkout_note: String::new(),
        };
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_status_form() {
        let form = StatusForm {
            status: "printing".to_string(),
        };
        assert_eq!(form.validate().unwrap(), OrderStatus::Printing);
        let form = StatusForm {
            status: "lost".to_string(),
        };
        assert!(form.validate().is_err());
    }
}
