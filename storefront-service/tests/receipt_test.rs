//! Receipt endpoint tests.

mod common;

use axum::http::StatusCode;
use common::{order_id, TestApp};
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn receipt_renders_business_and_items() {
    let app = TestApp::new();
    let product = app.seed_product("Tomatoes", "50.00").await;
    let order = app.place_order(Uuid::new_v4(), &product, 3).await;
    let id = order_id(&order);

    let (status, text) = app.get_text(&format!("/api/orders/{}/receipt", id)).await;

    assert_eq!(status, StatusCode::OK);
    assert!(text.contains("Fresh Market"));
    assert!(text.contains("RECEIPT"));
    assert!(text.contains("Tomatoes"));
    assert!(text.contains("KSh 150.00"));
    assert!(text.contains("Jane Wanjiku"));
    assert!(text.contains("12 Riverside Drive"));
}

#[tokio::test]
async fn receipt_handles_accented_product_names() {
    let app = TestApp::new();
    // 19 bytes but only 10 chars; truncating by byte offset would panic.
    let product = app.seed_product("añññññññññ", "50.00").await;
    let order = app.place_order(Uuid::new_v4(), &product, 1).await;
    let id = order_id(&order);

    let (status, text) = app.get_text(&format!("/api/orders/{}/receipt", id)).await;

    assert_eq!(status, StatusCode::OK);
    assert!(text.contains("añññññññññ"));
}

#[tokio::test]
async fn receipt_shows_charges_added_during_an_edit() {
    let app = TestApp::new();
    let product = app.seed_product("Tomatoes", "50.00").await;
    let order = app.place_order(Uuid::new_v4(), &product, 3).await;
    let id = order_id(&order);

    app.post_empty(&format!("/api/admin/orders/{}/edit", id))
        .await;
    app.post(
        &format!("/api/admin/orders/{}/edit/charges", id),
        json!({ "name": "Delivery Fee", "amount": "80.00" }),
    )
    .await;
    app.post_empty(&format!("/api/admin/orders/{}/edit/commit", id))
        .await;

    let (status, text) = app.get_text(&format!("/api/orders/{}/receipt", id)).await;

    assert_eq!(status, StatusCode::OK);
    assert!(text.contains("Subtotal:"));
    assert!(text.contains("KSh 150.00"));
    assert!(text.contains("Delivery Fee:"));
    assert!(text.contains("KSh 80.00"));
    // The printed total includes the committed charges.
    assert!(text.contains("KSh 230.00"));
}

#[tokio::test]
async fn receipt_qr_embeds_the_order() {
    let app = TestApp::new();
    let product = app.seed_product("Tomatoes", "50.00").await;
    let order = app.place_order(Uuid::new_v4(), &product, 1).await;
    let id = order_id(&order);

    let (status, body) = app.get(&format!("/api/orders/{}/receipt/qr", id)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["order_id"], id.to_string());
    assert!(!body["qr_png_base64"].as_str().unwrap().is_empty());

    let payload: serde_json::Value =
        serde_json::from_str(body["payload"].as_str().unwrap()).unwrap();
    assert_eq!(payload["order_id"], id.to_string());
}

#[tokio::test]
async fn receipt_for_unknown_order_returns_404() {
    let app = TestApp::new();

    let (status, _) = app
        .get_text(&format!("/api/orders/{}/receipt", Uuid::new_v4()))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
