//! Storefront JSON API tests.
//!
//! Run with: `cargo test -p printshop-integration-tests -- --ignored`

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

use printshop_integration_tests::{
    address_body, client, envelope, register_customer, storefront_url, unique_email,
};
use reqwest::Client;
use serde_json::Value;

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_profile_requires_sign_in() {
    let response = client()
        .get(format!("{}/api/profile", storefront_url()))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 401);
    let body = envelope(response).await;
    assert!(!body.success);
    assert_eq!(body.message.as_deref(), Some("Please sign in to continue"));
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_categories_are_public() {
    let response = client()
        .get(format!("{}/api/categories", storefront_url()))
        .send()
        .await
        .unwrap();

    assert!(response.status().is_success());
    let body = envelope(response).await;
    assert!(body.success);
    assert!(body.data.unwrap().is_array());
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_profile_after_register() {
    let client = client();
    let email = unique_email();
    register_customer(&client, &email).await;

    let response = client
        .get(format!("{}/api/profile", storefront_url()))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let profile = envelope(response).await.data.unwrap();
    assert_eq!(profile["email"], email);
    assert_eq!(profile["full_name"], "Integration Tester");
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_address_lifecycle() {
    let client = client();
    register_customer(&client, &unique_email()).await;
    let base = storefront_url();

    let response = client
        .post(format!("{base}/api/addresses"))
        .json(&address_body("Home", true))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let created = envelope(response).await;
    assert_eq!(created.message.as_deref(), Some("Address added"));
    let address = created.data.unwrap();
    let id = address["id"].as_i64().unwrap();
    assert_eq!(address["is_default"], true);

    let response = client
        .put(format!("{base}/api/addresses/{id}"))
        .json(&address_body("Office", true))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let updated = envelope(response).await.data.unwrap();
    assert_eq!(updated["recipient_name"], "Office");

    let list = envelope(
        client
            .get(format!("{base}/api/addresses"))
            .send()
            .await
            .unwrap(),
    )
    .await
    .data
    .unwrap();
    assert_eq!(list.as_array().unwrap().len(), 1);

    let response = client
        .delete(format!("{base}/api/addresses/{id}"))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let deleted = envelope(response).await;
    assert_eq!(deleted.message.as_deref(), Some("Address deleted"));
    assert_eq!(deleted.data.unwrap()["id"].as_i64(), Some(id));

    let response = client
        .delete(format!("{base}/api/addresses/{id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_invalid_postal_code_is_rejected() {
    let client = client();
    register_customer(&client, &unique_email()).await;

    let mut body = address_body("Home", false);
    body["postal_code"] = "12ab".into();

    let response = client
        .post(format!("{}/api/addresses", storefront_url()))
        .json(&body)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
    let body = envelope(response).await;
    assert!(!body.success);
    assert!(body.message.unwrap().contains("Postal code"));
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_new_customer_has_no_orders() {
    let client = client();
    register_customer(&client, &unique_email()).await;

    let response = client
        .get(format!("{}/api/orders", storefront_url()))
        .send()
        .await
        .unwrap();

    assert!(response.status().is_success());
    let orders = envelope(response).await.data.unwrap();
    assert!(orders.as_array().unwrap().is_empty());
}

async fn create_address(client: &Client, recipient: &str, is_default: bool) -> i64 {
    let response = client
        .post(format!("{}/api/addresses", storefront_url()))
        .json(&address_body(recipient, is_default))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success(), "create returned {}", response.status());
    envelope(response).await.data.unwrap()["id"].as_i64().unwrap()
}

async fn list_addresses(client: &Client) -> Vec<Value> {
    let response = client
        .get(format!("{}/api/addresses", storefront_url()))
        .send()
        .await
        .unwrap();
    envelope(response)
        .await
        .data
        .unwrap()
        .as_array()
        .unwrap()
        .clone()
}

/// Ids of the addresses flagged as default.
fn default_ids(addresses: &[Value]) -> Vec<i64> {
    addresses
        .iter()
        .filter(|a| a["is_default"] == true)
        .filter_map(|a| a["id"].as_i64())
        .collect()
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_first_address_is_the_only_default() {
    let client = client();
    register_customer(&client, &unique_email()).await;

    let home = create_address(&client, "Home", false).await;
    let office = create_address(&client, "Office", false).await;

    let addresses = list_addresses(&client).await;
    assert_eq!(addresses.len(), 2);
    assert_eq!(default_ids(&addresses), vec![home]);
    assert_ne!(home, office);
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_set_default_clears_previous_default() {
    let client = client();
    register_customer(&client, &unique_email()).await;

    let _home = create_address(&client, "Home", false).await;
    let office = create_address(&client, "Office", false).await;

    let response = client
        .post(format!("{}/api/addresses/{office}/default", storefront_url()))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let body = envelope(response).await;
    assert_eq!(body.message.as_deref(), Some("Default address updated"));

    let addresses = body.data.unwrap().as_array().unwrap().clone();
    assert_eq!(default_ids(&addresses), vec![office]);
    assert_eq!(default_ids(&list_addresses(&client).await), vec![office]);
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_unticking_the_default_keeps_it_default() {
    let client = client();
    register_customer(&client, &unique_email()).await;

    let home = create_address(&client, "Home", false).await;
    create_address(&client, "Office", false).await;

    let response = client
        .put(format!("{}/api/addresses/{home}", storefront_url()))
        .json(&address_body("Home (renamed)", false))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let updated = envelope(response).await.data.unwrap();
    assert_eq!(updated["recipient_name"], "Home (renamed)");
    assert_eq!(updated["is_default"], true);

    assert_eq!(default_ids(&list_addresses(&client).await), vec![home]);
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_deleting_default_promotes_newest_address() {
    let client = client();
    register_customer(&client, &unique_email()).await;

    let home = create_address(&client, "Home", false).await;
    let _office = create_address(&client, "Office", false).await;
    let warehouse = create_address(&client, "Warehouse", false).await;

    let response = client
        .delete(format!("{}/api/addresses/{home}", storefront_url()))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let addresses = list_addresses(&client).await;
    assert_eq!(addresses.len(), 2);
    assert_eq!(default_ids(&addresses), vec![warehouse]);
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_concurrent_delete_and_create_keep_one_default() {
    let client = client();
    register_customer(&client, &unique_email()).await;
    let base = storefront_url();

    for round in 0..5 {
        let only = create_address(&client, &format!("Only {round}"), false).await;

        let delete = client.delete(format!("{base}/api/addresses/{only}")).send();
        let create = client
            .post(format!("{base}/api/addresses"))
            .json(&address_body(&format!("New {round}"), false))
            .send();
        let (deleted, created) = tokio::join!(delete, create);
        assert!(deleted.unwrap().status().is_success());
        assert!(created.unwrap().status().is_success());

        let addresses = list_addresses(&client).await;
        assert_eq!(addresses.len(), 1, "round {round}");
        assert_eq!(default_ids(&addresses).len(), 1, "round {round}: no default left");

        let remaining = addresses[0]["id"].as_i64().unwrap();
        client
            .delete(format!("{base}/api/addresses/{remaining}"))
            .send()
            .await
            .unwrap();
    }
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_concurrent_first_addresses_both_succeed() {
    let client = client();
    register_customer(&client, &unique_email()).await;
    let base = storefront_url();

    let first = client
        .post(format!("{base}/api/addresses"))
        .json(&address_body("Home", false))
        .send();
    let second = client
        .post(format!("{base}/api/addresses"))
        .json(&address_body("Office", false))
        .send();
    let (first, second) = tokio::join!(first, second);
    assert!(first.unwrap().status().is_success());
    assert!(second.unwrap().status().is_success());

    let addresses = list_addresses(&client).await;
    assert_eq!(addresses.len(), 2);
    assert_eq!(default_ids(&addresses).len(), 1);
}
