//! Storage interfaces for storefront-service.
//!
//! Handlers and services depend on these traits rather than a concrete
//! backend, so the storefront stays testable without a live database.

mod memory;
mod pg;

pub use memory::InMemoryStore;
pub use pg::Database;

use async_trait::async_trait;
use rust_decimal::Decimal;
use storefront_core::error::AppError;
use uuid::Uuid;

use crate::models::{
    AdditionalCharge, CreateOrder, CreateProduct, LineItem, NewCharge, NewLineItem,
    NewNotification, Notification, Order, OrderFilter, Product, ProductFilter, UpdateProduct,
};

#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// List products matching the filter, ordered by name.
    async fn list_products(&self, filter: &ProductFilter) -> Result<Vec<Product>, AppError>;

    async fn get_product(&self, id: Uuid) -> Result<Option<Product>, AppError>;

    async fn create_product(&self, input: &CreateProduct) -> Result<Product, AppError>;

    /// Apply a partial update; `None` when the product does not exist.
    async fn update_product(
        &self,
        id: Uuid,
        input: &UpdateProduct,
    ) -> Result<Option<Product>, AppError>;
}

#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Persist an order header together with its line items in one
    /// transaction. The items are passed explicitly by the caller.
    async fn create_order(
        &self,
        input: &CreateOrder,
        items: &[NewLineItem],
    ) -> Result<Order, AppError>;

    async fn get_order(&self, id: Uuid) -> Result<Option<Order>, AppError>;

    /// List orders matching the filter, newest first.
    async fn list_orders(&self, filter: &OrderFilter) -> Result<Vec<Order>, AppError>;

    async fn list_line_items(&self, order_id: Uuid) -> Result<Vec<LineItem>, AppError>;

    async fn list_charges(&self, order_id: Uuid) -> Result<Vec<AdditionalCharge>, AppError>;

    /// Set the order status and refresh `updated_at`; `None` when the order
    /// does not exist.
    async fn update_status(&self, id: Uuid, status: &str) -> Result<Option<Order>, AppError>;

    /// Delete an order (cascading to its items and charges); `false` when
    /// the order does not exist.
    async fn delete_order(&self, id: Uuid) -> Result<bool, AppError>;

    /// Make the persisted items and charges match the working set exactly
    /// and update the order total, all inside a single transaction.
    ///
    /// Returns the re-inserted rows under their durable ids.
    async fn replace_order_contents(
        &self,
        order_id: Uuid,
        items: &[NewLineItem],
        charges: &[NewCharge],
        grand_total: Decimal,
    ) -> Result<(Vec<LineItem>, Vec<AdditionalCharge>), AppError>;
}

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn insert_notification(
        &self,
        input: &NewNotification,
    ) -> Result<Notification, AppError>;

    /// List notifications, newest first. With a customer id, broadcast
    /// notifications (no customer) are included alongside the customer's
    /// own; without one, everything is returned.
    async fn list_notifications(
        &self,
        customer_id: Option<Uuid>,
    ) -> Result<Vec<Notification>, AppError>;

    /// Mark a notification read; `false` when it does not exist.
    async fn mark_notification_read(&self, id: Uuid) -> Result<bool, AppError>;
}
