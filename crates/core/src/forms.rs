//! Form validation for customer-facing forms.
//!
//! Forms are deserialized straight from `application/x-www-form-urlencoded`
//! bodies (or JSON for the `/api` routes), validated here, and dropped after
//! the write. Validation returns a cleaned-up value on success so handlers
//! never touch untrimmed input.

use serde::{Deserialize, Serialize};

use crate::types::Email;

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;
/// Maximum password length (argon2 input cap).
pub const MAX_PASSWORD_LENGTH: usize = 128;
/// Maximum length of a person's name.
pub const MAX_NAME_LENGTH: usize = 100;

/// Validation failures, keyed by form field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormErrors {
    errors: Vec<FieldError>,
}

/// One failed field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FormErrors {
    #[must_use]
    pub const fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Message for a field, if it failed.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    /// First message, used as the toast text.
    #[must_use]
    pub fn first_message(&self) -> &str {
        self.errors
            .first()
            .map_or("Please check the form", |e| e.message.as_str())
    }

    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl std::fmt::Display for FormErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.first_message())
    }
}

impl std::error::Error for FormErrors {}

// =============================================================================
// Field rules
// =============================================================================

fn required<'a>(errors: &mut FormErrors, field: &'static str, label: &str, value: &'a str) -> &'a str {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.add(field, format!("{label} is required"));
    }
    trimmed
}

fn check_name(errors: &mut FormErrors, field: &'static str, value: &str) -> String {
    let name = required(errors, field, "Name", value);
    if name.chars().count() > MAX_NAME_LENGTH {
        errors.add(field, format!("Name must be at most {MAX_NAME_LENGTH} characters"));
    }
    name.to_string()
}

/// Phone numbers: digits, `+`, spaces and dashes; 6-20 characters.
#[must_use]
pub fn is_valid_phone(phone: &str) -> bool {
    let len = phone.chars().count();
    (6..=20).contains(&len)
        && phone
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | ' ' | '-'))
        && phone.chars().any(|c| c.is_ascii_digit())
}

/// Postal codes: 3-10 ASCII digits.
#[must_use]
pub fn is_valid_postal_code(code: &str) -> bool {
    (3..=10).contains(&code.len()) && code.chars().all(|c| c.is_ascii_digit())
}

fn check_new_password(errors: &mut FormErrors, password: &str, confirm: &str) {
    if password.is_empty() {
        errors.add("new_password", "Password is required");
        return;
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        errors.add(
            "new_password",
            format!("Password must be at least {MIN_PASSWORD_LENGTH} characters"),
        );
    } else if password.chars().count() > MAX_PASSWORD_LENGTH {
        errors.add(
            "new_password",
            format!("Password must be at most {MAX_PASSWORD_LENGTH} characters"),
        );
    }
    if password != confirm {
        errors.add("confirm_password", "Passwords do not match");
    }
}

// =============================================================================
// Profile
// =============================================================================

/// Profile edit form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileForm {
    pub full_name: String,
    #[serde(default)]
    pub phone: String,
}

/// A validated profile update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidProfile {
    pub full_name: String,
    pub phone: Option<String>,
}

impl ProfileForm {
    /// # Errors
    ///
    /// Returns [`FormErrors`] when the name is empty or too long, or the
    /// phone number is malformed.
    pub fn validate(&self) -> Result<ValidProfile, FormErrors> {
        let mut errors = FormErrors::new();
        let full_name = check_name(&mut errors, "full_name", &self.full_name);

        let phone = self.phone.trim();
        if !phone.is_empty() && !is_valid_phone(phone) {
            errors.add("phone", "Phone number is not valid");
        }

        errors.into_result(ValidProfile {
            full_name,
            phone: (!phone.is_empty()).then(|| phone.to_string()),
        })
    }
}

// =============================================================================
// Password change
// =============================================================================

/// Password change form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PasswordForm {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl PasswordForm {
    /// Validates shape only; the current password is verified against the
    /// stored hash by the caller.
    ///
    /// # Errors
    ///
    /// Returns [`FormErrors`] for missing fields, a short password, a
    /// confirmation mismatch, or a new password equal to the current one.
    pub fn validate(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::new();

        if self.current_password.is_empty() {
            errors.add("current_password", "Current password is required");
        }
        check_new_password(&mut errors, &self.new_password, &self.confirm_password);
        if !self.new_password.is_empty() && self.new_password == self.current_password {
            errors.add(
                "new_password",
                "New password must be different from the current password",
            );
        }

        errors.into_result(())
    }
}

// =============================================================================
// Shipping address
// =============================================================================

/// Shipping address create/edit form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddressForm {
    pub recipient_name: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub province: String,
    pub postal_code: String,
    /// Checkbox: present when ticked.
    #[serde(default, deserialize_with = "deserialize_checkbox")]
    pub is_default: bool,
}

/// A validated address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidAddress {
    pub recipient_name: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub province: String,
    pub postal_code: String,
    pub is_default: bool,
}

impl AddressForm {
    /// # Errors
    ///
    /// Returns [`FormErrors`] for empty fields, a malformed phone number, or
    /// a postal code that is not 3-10 digits.
    pub fn validate(&self) -> Result<ValidAddress, FormErrors> {
        let mut errors = FormErrors::new();

        let recipient_name = check_name(&mut errors, "recipient_name", &self.recipient_name);
        let phone = required(&mut errors, "phone", "Phone", &self.phone);
        if !phone.is_empty() && !is_valid_phone(phone) {
            errors.add("phone", "Phone number is not valid");
        }
        let address = required(&mut errors, "address", "Address", &self.address);
        let city = required(&mut errors, "city", "City", &self.city);
        let province = required(&mut errors, "province", "Province", &self.province);
        let postal_code = required(&mut errors, "postal_code", "Postal code", &self.postal_code);
        if !postal_code.is_empty() && !is_valid_postal_code(postal_code) {
            errors.add("postal_code", "Postal code must be 3-10 digits");
        }

        let valid = ValidAddress {
            recipient_name,
            phone: phone.to_string(),
            address: address.to_string(),
            city: city.to_string(),
            province: province.to_string(),
            postal_code: postal_code.to_string(),
            is_default: self.is_default,
        };
        errors.into_result(valid)
    }
}

// =============================================================================
// Registration
// =============================================================================

/// Customer registration form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterForm {
    pub email: String,
    pub full_name: String,
    pub password: String,
    pub confirm_password: String,
}

/// A validated registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidRegistration {
    pub email: Email,
    pub full_name: String,
}

impl RegisterForm {
    /// # Errors
    ///
    /// Returns [`FormErrors`] for an invalid email or name, or a password
    /// that fails the password rules.
    pub fn validate(&self) -> Result<ValidRegistration, FormErrors> {
        let mut errors = FormErrors::new();

        let email = match Email::parse(&self.email) {
            Ok(email) => Some(email),
            Err(e) => {
                errors.add("email", capitalize(&e.to_string()));
                None
            }
        };
        let full_name = check_name(&mut errors, "full_name", &self.full_name);

        let mut password_errors = FormErrors::new();
        check_new_password(&mut password_errors, &self.password, &self.confirm_password);
        for error in password_errors.errors {
            let field = if error.field == "new_password" {
                "password"
            } else {
                error.field
            };
            errors.add(field, error.message);
        }

        match email {
            Some(email) if errors.is_empty() => Ok(ValidRegistration { email, full_name }),
            _ => Err(errors),
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// HTML checkboxes submit `on` (or any value) when ticked and nothing otherwise.
///
/// # Errors
///
/// Returns the deserializer's error for values that are neither a bool nor a string.
pub fn deserialize_checkbox<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Checkbox {
        Bool(bool),
        Text(String),
    }

    Ok(match Option::<Checkbox>::deserialize(deserializer)? {
        Some(Checkbox::Bool(b)) => b,
        Some(Checkbox::Text(s)) => !matches!(s.as_str(), "" | "false" | "0" | "off"),
        None => false,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn password_form(current: &str, new: &str, confirm: &str) -> PasswordForm {
        PasswordForm {
            current_password: current.to_string(),
            new_password: new.to_string(),
            confirm_password: confirm.to_string(),
        }
    }

    fn address_form() -> AddressForm {
        AddressForm {
            recipient_name: " Budi Santoso ".to_string(),
            phone: "+62 812-3456-7890".to_string(),
            address: "Jl. Merdeka No. 10".to_string(),
            city: "Bandung".to_string(),
            province: "Jawa Barat".to_string(),
            postal_code: "40111".to_string(),
            is_default: false,
        }
    }

    #[test]
    fn test_profile_trims_and_drops_empty_phone() {
        let form = ProfileForm {
            full_name: "  Siti  ".to_string(),
            phone: "   ".to_string(),
        };
        let valid = form.validate().unwrap();
        assert_eq!(valid.full_name, "Siti");
        assert_eq!(valid.phone, None);
    }

    #[test]
    fn test_profile_requires_name() {
        let form = ProfileForm {
            full_name: "   ".to_string(),
            phone: String::new(),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("full_name"), Some("Name is required"));
    }

    #[test]
    fn test_profile_rejects_letters_in_phone() {
        let form = ProfileForm {
            full_name: "Siti".to_string(),
            phone: "0812-CALL-ME".to_string(),
        };
        assert!(form.validate().unwrap_err().get("phone").is_some());
    }

    #[test]
    fn test_password_ok() {
        assert!(password_form("old-secret", "new-secret-1", "new-secret-1")
            .validate()
            .is_ok());
    }

    #[test]
    fn test_password_mismatch() {
        let errors = password_form("old-secret", "new-secret-1", "new-secret-2")
            .validate()
            .unwrap_err();
        assert_eq!(errors.get("confirm_password"), Some("Passwords do not match"));
        assert_eq!(errors.first_message(), "Passwords do not match");
    }

    #[test]
    fn test_password_too_short() {
        let errors = password_form("old-secret", "short", "short").validate().unwrap_err();
        assert_eq!(
            errors.get("new_password"),
            Some("Password must be at least 8 characters")
        );
    }

    #[test]
    fn test_password_must_change() {
        let errors = password_form("same-secret", "same-secret", "same-secret")
            .validate()
            .unwrap_err();
        assert!(errors.get("new_password").is_some());
    }

    #[test]
    fn test_password_requires_current() {
        let errors = password_form("", "new-secret-1", "new-secret-1")
            .validate()
            .unwrap_err();
        assert_eq!(
            errors.get("current_password"),
            Some("Current password is required")
        );
    }

    #[test]
    fn test_address_valid_and_trimmed() {
        let valid = address_form().validate().unwrap();
        assert_eq!(valid.recipient_name, "Budi Santoso");
        assert_eq!(valid.postal_code, "40111");
    }

    #[test]
    fn test_address_postal_code_rules() {
        let mut form = address_form();
        form.postal_code = "40A11".to_string();
        assert!(form.validate().unwrap_err().get("postal_code").is_some());

        form.postal_code = "12".to_string();
        assert!(form.validate().unwrap_err().get("postal_code").is_some());

        form.postal_code = "1234567890".to_string();
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_address_all_fields_required() {
        let errors = AddressForm::default().validate().unwrap_err();
        for field in ["recipient_name", "phone", "address", "city", "province", "postal_code"] {
            assert!(errors.get(field).is_some(), "{field} should be required");
        }
    }

    #[test]
    fn test_address_checkbox_deserialization() {
        let form: AddressForm = serde_json::from_value(serde_json::json!({
            "recipient_name": "A",
            "phone": "081234567",
            "address": "B",
            "city": "C",
            "province": "D",
            "postal_code": "12345",
            "is_default": "on"
        }))
        .unwrap();
        assert!(form.is_default);

        let form: AddressForm = serde_json::from_value(serde_json::json!({
            "recipient_name": "A",
            "phone": "081234567",
            "address": "B",
            "city": "C",
            "province": "D",
            "postal_code": "12345",
            "is_default": true
        }))
        .unwrap();
        assert!(form.is_default);
    }

    #[test]
    fn test_register_collects_all_errors() {
        let form = RegisterForm {
            email: "not-an-email".to_string(),
            full_name: String::new(),
            password: "short".to_string(),
            confirm_password: "other".to_string(),
        };
        let errors = form.validate().unwrap_err();
        assert!(errors.get("email").is_some());
        assert!(errors.get("full_name").is_some());
        assert!(errors.get("password").is_some());
        assert!(errors.get("confirm_password").is_some());
    }

    #[test]
    fn test_register_normalizes_email() {
        let form = RegisterForm {
            email: " Budi@Example.COM ".to_string(),
            full_name: "Budi".to_string(),
            password: "long-enough".to_string(),
            confirm_password: "long-enough".to_string(),
        };
        let valid = form.validate().unwrap();
        assert_eq!(valid.email.as_str(), "budi@example.com");
    }

    #[test]
    fn test_phone_and_postal_helpers() {
        assert!(is_valid_phone("081234567890"));
        assert!(!is_valid_phone("12345"));
        assert!(!is_valid_phone("------"));
        assert!(is_valid_postal_code("123"));
        assert!(!is_valid_postal_code("12345678901"));
    }
}
