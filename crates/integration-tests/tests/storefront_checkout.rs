//! Cart and checkout flow against a seeded storefront.
//!
//! Requires `printshop-cli seed demo` (or any active product).

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

use printshop_integration_tests::{
    address_body, client, envelope, location, register_customer, scrape_attr, storefront_url,
    unique_email,
};

#[tokio::test]
#[ignore = "Requires running storefront server with seeded catalog"]
async fn test_place_order() {
    let client = client();
    let base = storefront_url();
    register_customer(&client, &unique_email()).await;

    let address = envelope(
        client
            .post(format!("{base}/api/addresses"))
            .json(&address_body("Home", true))
            .send()
            .await
            .unwrap(),
    )
    .await
    .data
    .unwrap();
    let address_id = address["id"].as_i64().unwrap().to_string();

    let listing = client
        .get(format!("{base}/products"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    let product_path =
        scrape_attr(&listing, "product-card", "href").expect("no products in catalog");

    let detail = client
        .get(format!("{base}{product_path}"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    let product_id =
        scrape_attr(&detail, "name=\"product_id\"", "value").expect("no add-to-cart form");

    let response = client
        .post(format!("{base}/cart/add"))
        .form(&[
            ("product_id", product_id.as_str()),
            ("quantity", "1"),
            ("notes", "Matte finish please"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 303);
    assert!(location(&response).starts_with("/cart?success="));

    let response = client
        .post(format!("{base}/checkout"))
        .form(&[("address_id", address_id.as_str()), ("notes", "")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 303);
    let target = location(&response);
    assert!(target.starts_with("/account/orders/"), "redirected to {target}");

    let orders = envelope(
        client
            .get(format!("{base}/api/orders"))
            .send()
            .await
            .unwrap(),
    )
    .await
    .data
    .unwrap();
    let orders = orders.as_array().unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["status"], "pending");
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_checkout_with_empty_cart_redirects() {
    let client = client();
    register_customer(&client, &unique_email()).await;

    let response = client
        .get(format!("{}/checkout", storefront_url()))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 303);
    assert!(location(&response).starts_with("/cart?error="));
}
