//! Catalog endpoint tests.

mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn create_and_fetch_product() {
    let app = TestApp::new();

    let (status, created) = app
        .post(
            "/api/admin/products",
            json!({
                "name": "Tomatoes",
                "description": "Fresh vine tomatoes",
                "price": "50.00",
                "unit": "kg",
                "category": "vegetables",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["name"], "Tomatoes");
    assert_eq!(created["is_available"], true);

    let id = created["id"].as_str().unwrap();
    let (status, fetched) = app.get(&format!("/api/products/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["price"], "50.00");
}

#[tokio::test]
async fn public_listing_hides_unavailable_products() {
    let app = TestApp::new();
    let product = app.seed_product("Tomatoes", "50.00").await;
    app.seed_product("Spinach", "30.00").await;

    let (status, _) = app
        .put(
            &format!("/api/admin/products/{}", product.id),
            json!({ "is_available": false }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, public) = app.get("/api/products").await;
    assert_eq!(public.as_array().unwrap().len(), 1);
    assert_eq!(public[0]["name"], "Spinach");

    let (_, admin) = app.get("/api/admin/products").await;
    assert_eq!(admin.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn search_matches_name_case_insensitively() {
    let app = TestApp::new();
    app.seed_product("Tomatoes", "50.00").await;
    app.seed_product("Spinach", "30.00").await;

    let (status, body) = app.get("/api/products?q=toma").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["name"], "Tomatoes");
}

#[tokio::test]
async fn negative_price_is_rejected() {
    let app = TestApp::new();

    let (status, _) = app
        .post(
            "/api/admin/products",
            json!({
                "name": "Tomatoes",
                "price": "-1.00",
                "unit": "kg",
                "category": "vegetables",
            }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn empty_name_fails_validation() {
    let app = TestApp::new();

    let (status, _) = app
        .post(
            "/api/admin/products",
            json!({
                "name": "",
                "price": "10.00",
                "unit": "kg",
                "category": "vegetables",
            }),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn price_change_broadcasts_a_notification() {
    let app = TestApp::new();
    let product = app.seed_product("Tomatoes", "50.00").await;

    let (status, _) = app
        .put(
            &format!("/api/admin/products/{}", product.id),
            json!({ "price": "55.00" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, feed) = app.get("/api/notifications").await;
    assert_eq!(feed[0]["kind"], "price_update");
    assert!(feed[0]["customer_id"].is_null());
}

#[tokio::test]
async fn unknown_product_returns_404() {
    let app = TestApp::new();

    let (status, _) = app.get(&format!("/api/products/{}", Uuid::new_v4())).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
