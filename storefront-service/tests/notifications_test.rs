//! Notification endpoint tests.

mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn promotions_broadcast_to_everyone() {
    let app = TestApp::new();

    let (status, promotion) = app
        .post(
            "/api/admin/notifications/promotions",
            json!({ "title": "Weekend Sale", "message": "Fresh produce at 20% off" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(promotion["kind"], "promotion");
    assert!(promotion["customer_id"].is_null());

    // Broadcasts show up in any customer's feed.
    let (_, feed) = app
        .get(&format!("/api/notifications?customer_id={}", Uuid::new_v4()))
        .await;
    assert_eq!(feed.as_array().unwrap().len(), 1);
    assert_eq!(feed[0]["title"], "Weekend Sale");
}

#[tokio::test]
async fn promotion_requires_title_and_message() {
    let app = TestApp::new();

    let (status, _) = app
        .post(
            "/api/admin/notifications/promotions",
            json!({ "title": "", "message": "" }),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn notifications_can_be_marked_read() {
    let app = TestApp::new();

    let (_, promotion) = app
        .post(
            "/api/admin/notifications/promotions",
            json!({ "title": "Weekend Sale", "message": "Fresh produce at 20% off" }),
        )
        .await;
    let id = promotion["id"].as_str().unwrap();

    let (status, _) = app.post_empty(&format!("/api/notifications/{}/read", id)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, feed) = app.get("/api/notifications").await;
    assert_eq!(feed[0]["read"], true);
}

#[tokio::test]
async fn marking_an_unknown_notification_returns_404() {
    let app = TestApp::new();

    let (status, _) = app
        .post_empty(&format!("/api/notifications/{}/read", Uuid::new_v4()))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
