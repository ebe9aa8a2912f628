//! Grocery-delivery storefront: catalog, carts, checkout, order status
//! tracking, back-office order editing, receipts, and notifications.

pub mod config;
pub mod editing;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod services;
pub mod startup;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use storefront_core::middleware::metrics::metrics_middleware;
use storefront_core::middleware::security_headers::security_headers_middleware;
use storefront_core::middleware::tracing::request_id_middleware;

use crate::config::StorefrontConfig;
use crate::editing::EditSessions;
use crate::repository::{CatalogRepository, NotificationRepository, OrderRepository};
use crate::services::{CartService, NotificationService};

#[derive(Clone)]
pub struct AppState {
    pub config: StorefrontConfig,
    pub catalog: Arc<dyn CatalogRepository>,
    pub orders: Arc<dyn OrderRepository>,
    pub carts: Arc<CartService>,
    pub edit_sessions: Arc<EditSessions>,
    pub notifier: Arc<NotificationService>,
}

impl AppState {
    pub fn new(
        config: StorefrontConfig,
        catalog: Arc<dyn CatalogRepository>,
        orders: Arc<dyn OrderRepository>,
        notifications: Arc<dyn NotificationRepository>,
    ) -> Self {
        AppState {
            config,
            catalog,
            orders,
            carts: Arc::new(CartService::new()),
            edit_sessions: Arc::new(EditSessions::new()),
            notifier: Arc::new(NotificationService::new(notifications)),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Infrastructure
        .route("/health", get(health_check))
        .route("/metrics", get(handlers::metrics::metrics))
        // Catalog
        .route("/api/products", get(handlers::products::list_products))
        .route("/api/products/:id", get(handlers::products::get_product))
        .route(
            "/api/admin/products",
            get(handlers::products::admin_list_products).post(handlers::products::create_product),
        )
        .route(
            "/api/admin/products/:id",
            put(handlers::products::update_product),
        )
        // Carts
        .route(
            "/api/cart/:customer_id",
            get(handlers::cart::get_cart).delete(handlers::cart::clear_cart),
        )
        .route(
            "/api/cart/:customer_id/items",
            post(handlers::cart::add_item),
        )
        .route(
            "/api/cart/:customer_id/items/:product_id",
            put(handlers::cart::update_item).delete(handlers::cart::remove_item),
        )
        // Checkout and orders
        .route("/api/checkout", post(handlers::checkout::checkout))
        .route("/api/orders", get(handlers::orders::list_orders))
        .route(
            "/api/orders/:id",
            get(handlers::orders::get_order).delete(handlers::orders::delete_order),
        )
        .route("/api/orders/:id/status", put(handlers::orders::update_status))
        .route("/api/orders/:id/receipt", get(handlers::receipts::get_receipt))
        .route(
            "/api/orders/:id/receipt/qr",
            get(handlers::receipts::get_receipt_qr),
        )
        // Back-office order editing
        .route(
            "/api/admin/orders/:id/edit",
            post(handlers::editing::begin_edit).get(handlers::editing::get_session),
        )
        .route(
            "/api/admin/orders/:id/edit/items",
            post(handlers::editing::add_item),
        )
        .route(
            "/api/admin/orders/:id/edit/items/:item_id",
            put(handlers::editing::update_item).delete(handlers::editing::remove_item),
        )
        .route(
            "/api/admin/orders/:id/edit/charges",
            post(handlers::editing::add_charge),
        )
        .route(
            "/api/admin/orders/:id/edit/charges/:charge_id",
            delete(handlers::editing::remove_charge),
        )
        .route(
            "/api/admin/orders/:id/edit/commit",
            post(handlers::editing::commit),
        )
        .route(
            "/api/admin/orders/:id/edit/discard",
            post(handlers::editing::discard),
        )
        // Notifications
        .route(
            "/api/notifications",
            get(handlers::notifications::list_notifications),
        )
        .route(
            "/api/notifications/:id/read",
            post(handlers::notifications::mark_read),
        )
        .route(
            "/api/admin/notifications/promotions",
            post(handlers::notifications::send_promotion),
        )
        // Analytics
        .route("/api/admin/analytics", get(handlers::analytics::summary))
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": "storefront-service",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
