//! Integration tests for Printshop.
//!
//! The tests talk HTTP to running servers and are `#[ignore]`d by default.
//!
//! # Running Tests
//!
//! ```bash
//! printshop-cli migrate
//! printshop-cli seed demo
//! printshop-cli admin create -e qa@example.com -n QA -r admin -p 'qa-password-123'
//! cargo run -p printshop-storefront &
//! cargo run -p printshop-admin &
//!
//! ADMIN_TEST_EMAIL=qa@example.com ADMIN_TEST_PASSWORD=qa-password-123 \
//!     cargo test -p printshop-integration-tests -- --ignored
//! ```
//!
//! # Environment Variables
//!
//! - `STOREFRONT_TEST_URL` (default `http://localhost:3000`)
//! - `ADMIN_TEST_URL` (default `http://localhost:3001`)
//! - `ADMIN_TEST_EMAIL`, `ADMIN_TEST_PASSWORD` - an existing admin account

#![allow(clippy::missing_panics_doc, clippy::expect_used)]

use printshop_core::ApiResponse;
use reqwest::header::{HeaderMap, HeaderValue, LOCATION};
use reqwest::{Client, Response, redirect};
use serde_json::Value;

/// Password used for every customer the tests register.
pub const TEST_PASSWORD: &str = "integration-pass-1";

/// Base URL of the storefront under test.
#[must_use]
pub fn storefront_url() -> String {
    std::env::var("STOREFRONT_TEST_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Base URL of the admin console under test.
#[must_use]
pub fn admin_url() -> String {
    std::env::var("ADMIN_TEST_URL").unwrap_or_else(|_| "http://localhost:3001".to_string())
}

/// HTTP client with a cookie jar that does not follow redirects, so tests
/// can assert on `303 See Other` and the `Location` header.
///
/// Each client sends its own `X-Real-IP`, so parallel tests get separate
/// rate-limit buckets.
#[must_use]
pub fn client() -> Client {
    let [a, b, c, ..] = uuid::Uuid::new_v4().into_bytes();
    let mut headers = HeaderMap::new();
    headers.insert(
        "x-real-ip",
        HeaderValue::from_str(&format!("10.{a}.{b}.{c}")).expect("valid header value"),
    );

    Client::builder()
        .default_headers(headers)
        .cookie_store(true)
        .redirect(redirect::Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

/// A fresh, unique customer email.
#[must_use]
pub fn unique_email() -> String {
    format!("it-{}@example.com", uuid::Uuid::new_v4().simple())
}

/// The `Location` header of a redirect response.
#[must_use]
pub fn location(response: &Response) -> String {
    response
        .headers()
        .get(LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// Register a new customer; the client is signed in afterwards.
pub async fn register_customer(client: &Client, email: &str) {
    let response = client
        .post(format!("{}/auth/register", storefront_url()))
        .form(&[
            ("email", email),
            ("full_name", "Integration Tester"),
            ("password", TEST_PASSWORD),
            ("confirm_password", TEST_PASSWORD),
        ])
        .send()
        .await
        .expect("register request failed");

    assert_eq!(response.status().as_u16(), 303);
    assert!(
        location(&response).starts_with("/account"),
        "registration redirected to {}",
        location(&response)
    );
}

/// Sign in to the admin console with `ADMIN_TEST_EMAIL` / `ADMIN_TEST_PASSWORD`.
pub async fn admin_client() -> Client {
    let email = std::env::var("ADMIN_TEST_EMAIL").expect("ADMIN_TEST_EMAIL not set");
    let password = std::env::var("ADMIN_TEST_PASSWORD").expect("ADMIN_TEST_PASSWORD not set");

    let client = client();
    let response = client
        .post(format!("{}/auth/login", admin_url()))
        .form(&[("email", email.as_str()), ("password", password.as_str()), ("next", "")])
        .send()
        .await
        .expect("admin login request failed");

    assert_eq!(response.status().as_u16(), 303);
    assert_eq!(location(&response), "/");
    client
}

/// Parse a `{success, data, message}` envelope.
pub async fn envelope(response: Response) -> ApiResponse<Value> {
    response.json().await.expect("response was not an API envelope")
}

/// First value of `attr` in an HTML document after `marker`.
#[must_use]
pub fn scrape_attr(html: &str, marker: &str, attr: &str) -> Option<String> {
    let rest = html.get(html.find(marker)?..)?;
    let needle = format!("{attr}=\"");
    let value = rest.get(rest.find(&needle)? + needle.len()..)?;
    value.split('"').next().map(str::to_string)
}

/// A valid address body for the JSON API.
#[must_use]
pub fn address_body(recipient: &str, is_default: bool) -> Value {
    serde_json::json!({
        "recipient_name": recipient,
        "phone": "+62 812 3456 7890",
        "address": "Jl. Merdeka No. 1",
        "city": "Bandung",
        "province": "Jawa Barat",
        "postal_code": "40111",
        "is_default": is_default,
    })
}
