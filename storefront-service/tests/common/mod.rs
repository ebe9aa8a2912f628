//! Test helpers for storefront-service integration tests.
//!
//! Requests run against the full router over the in-memory storage
//! backend, so no external services are needed.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::str::FromStr;
use std::sync::Arc;
use tower::util::ServiceExt;
use uuid::Uuid;

use storefront_service::config::{
    BusinessConfig, DatabaseConfig, Environment, StorefrontConfig,
};
use storefront_service::models::Product;
use storefront_service::repository::{CatalogRepository, InMemoryStore};
use storefront_service::{build_router, AppState};

pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryStore>,
}

pub fn test_config() -> StorefrontConfig {
    StorefrontConfig {
        environment: Environment::Dev,
        service_name: "storefront-service-test".to_string(),
        log_level: "info".to_string(),
        http_port: 0,
        database: DatabaseConfig {
            url: "postgres://unused".to_string(),
            max_connections: 1,
            min_connections: 1,
        },
        business: BusinessConfig {
            name: "Fresh Market".to_string(),
            address: "Market Street 1".to_string(),
            phone: "+254711111111".to_string(),
            email: Some("orders@freshmarket.test".to_string()),
        },
    }
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let state = AppState::new(
            test_config(),
            store.clone(),
            store.clone(),
            store.clone(),
        );
        TestApp {
            router: build_router(state),
            store,
        }
    }

    async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let request = match body {
            Some(body) => Request::builder()
                .method(method)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .expect("Failed to build request"),
            None => Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .expect("Failed to build request"),
        };

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None).await
    }

    pub async fn get_text(&self, uri: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("Failed to build request");
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes();
        (status, String::from_utf8_lossy(&bytes).into_owned())
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn post_empty(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::POST, uri, None).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, None).await
    }

    /// Seed a catalog product directly through the storage backend.
    pub async fn seed_product(&self, name: &str, price: &str) -> Product {
        self.store
            .create_product(&storefront_service::models::CreateProduct {
                name: name.to_string(),
                description: format!("{} from the market", name),
                price: Decimal::from_str(price).expect("Invalid price"),
                unit: "kg".to_string(),
                category: "vegetables".to_string(),
                is_available: true,
            })
            .await
            .expect("Failed to seed product")
    }

    /// Place an order through the cart and checkout flow; returns the order
    /// body from the checkout response.
    pub async fn place_order(&self, customer_id: Uuid, product: &Product, quantity: i32) -> Value {
        let (status, _) = self
            .post(
                &format!("/api/cart/{}/items", customer_id),
                json!({ "product_id": product.id, "quantity": quantity }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = self
            .post(
                "/api/checkout",
                json!({
                    "customer_id": customer_id,
                    "customer_name": "Jane Wanjiku",
                    "customer_phone": "+254700000000",
                    "delivery_address": "12 Riverside Drive",
                    "payment_method": "mobile_money",
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        body["order"].clone()
    }
}

pub fn order_id(order: &Value) -> Uuid {
    Uuid::parse_str(order["id"].as_str().expect("Order has no id")).expect("Invalid order id")
}
