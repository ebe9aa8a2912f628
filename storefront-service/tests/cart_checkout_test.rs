//! Cart and checkout flow tests.

mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn adding_same_product_merges_quantities() {
    let app = TestApp::new();
    let product = app.seed_product("Tomatoes", "50.00").await;
    let customer = Uuid::new_v4();

    app.post(
        &format!("/api/cart/{}/items", customer),
        json!({ "product_id": product.id, "quantity": 2 }),
    )
    .await;
    let (status, cart) = app
        .post(
            &format!("/api/cart/{}/items", customer),
            json!({ "product_id": product.id, "quantity": 3 }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart["items"].as_array().unwrap().len(), 1);
    assert_eq!(cart["total_items"], 5);
    assert_eq!(cart["total_price"], "250.00");
}

#[tokio::test]
async fn zero_quantity_removes_cart_entry() {
    let app = TestApp::new();
    let product = app.seed_product("Tomatoes", "50.00").await;
    let customer = Uuid::new_v4();

    app.post(
        &format!("/api/cart/{}/items", customer),
        json!({ "product_id": product.id }),
    )
    .await;
    let (status, cart) = app
        .put(
            &format!("/api/cart/{}/items/{}", customer, product.id),
            json!({ "quantity": 0 }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert!(cart["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn unavailable_product_cannot_be_added() {
    let app = TestApp::new();
    let product = app.seed_product("Tomatoes", "50.00").await;
    app.put(
        &format!("/api/admin/products/{}", product.id),
        json!({ "is_available": false }),
    )
    .await;

    let (status, _) = app
        .post(
            &format!("/api/cart/{}/items", Uuid::new_v4()),
            json!({ "product_id": product.id }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn checkout_creates_order_and_clears_cart() {
    let app = TestApp::new();
    let product = app.seed_product("Tomatoes", "50.00").await;
    let customer = Uuid::new_v4();

    app.post(
        &format!("/api/cart/{}/items", customer),
        json!({ "product_id": product.id, "quantity": 2 }),
    )
    .await;

    let (status, body) = app
        .post(
            "/api/checkout",
            json!({
                "customer_id": customer,
                "customer_name": "Jane Wanjiku",
                "customer_phone": "+254700000000",
                "delivery_address": "12 Riverside Drive",
            }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["order"]["total_amount"], "100.00");
    assert_eq!(body["order"]["status"], "pending");
    assert_eq!(body["items_count"], 1);

    let (_, cart) = app.get(&format!("/api/cart/{}", customer)).await;
    assert!(cart["items"].as_array().unwrap().is_empty());

    // Checkout records an order confirmation for the customer.
    let (_, notifications) = app
        .get(&format!("/api/notifications?customer_id={}", customer))
        .await;
    assert_eq!(notifications[0]["kind"], "order_confirmation");
}

#[tokio::test]
async fn checkout_with_empty_cart_is_rejected() {
    let app = TestApp::new();

    let (status, body) = app
        .post(
            "/api/checkout",
            json!({
                "customer_id": Uuid::new_v4(),
                "customer_name": "Jane Wanjiku",
                "customer_phone": "+254700000000",
                "delivery_address": "12 Riverside Drive",
            }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Cart is empty");
}

#[tokio::test]
async fn checkout_validates_contact_details() {
    let app = TestApp::new();
    let product = app.seed_product("Tomatoes", "50.00").await;
    let customer = Uuid::new_v4();
    app.post(
        &format!("/api/cart/{}/items", customer),
        json!({ "product_id": product.id }),
    )
    .await;

    let (status, _) = app
        .post(
            "/api/checkout",
            json!({
                "customer_id": customer,
                "customer_name": "",
                "customer_phone": "123",
                "delivery_address": "12 Riverside Drive",
            }),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}
