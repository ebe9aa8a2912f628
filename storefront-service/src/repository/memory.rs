//! In-memory storage backend.
//!
//! Backs the integration tests and local development; mirrors the
//! PostgreSQL backend's semantics, including the transactional
//! all-or-nothing contract of `replace_order_contents`.

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use std::collections::HashMap;
use storefront_core::error::AppError;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{
    AdditionalCharge, CreateOrder, CreateProduct, LineItem, NewCharge, NewLineItem,
    NewNotification, Notification, Order, OrderFilter, Product, ProductFilter, UpdateProduct,
};

use super::{CatalogRepository, NotificationRepository, OrderRepository};

#[derive(Default)]
pub struct InMemoryStore {
    products: RwLock<HashMap<Uuid, Product>>,
    orders: RwLock<HashMap<Uuid, Order>>,
    items: RwLock<HashMap<Uuid, Vec<LineItem>>>,
    charges: RwLock<HashMap<Uuid, Vec<AdditionalCharge>>>,
    notifications: RwLock<Vec<Notification>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches_search(product: &Product, query: &str) -> bool {
    let query = query.to_lowercase();
    product.name.to_lowercase().contains(&query)
        || product.description.to_lowercase().contains(&query)
        || product.category.to_lowercase().contains(&query)
}

#[async_trait]
impl CatalogRepository for InMemoryStore {
    async fn list_products(&self, filter: &ProductFilter) -> Result<Vec<Product>, AppError> {
        let products = self.products.read().await;
        let mut matching: Vec<Product> = products
            .values()
            .filter(|p| !filter.only_available || p.is_available)
            .filter(|p| {
                filter
                    .category
                    .as_ref()
                    .map(|c| p.category.eq_ignore_ascii_case(c))
                    .unwrap_or(true)
            })
            .filter(|p| {
                filter
                    .search
                    .as_ref()
                    .map(|q| matches_search(p, q))
                    .unwrap_or(true)
            })
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(matching)
    }

    async fn get_product(&self, id: Uuid) -> Result<Option<Product>, AppError> {
        Ok(self.products.read().await.get(&id).cloned())
    }

    async fn create_product(&self, input: &CreateProduct) -> Result<Product, AppError> {
        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4(),
            name: input.name.clone(),
            description: input.description.clone(),
            price: input.price,
            unit: input.unit.clone(),
            category: input.category.clone(),
            is_available: input.is_available,
            created_at: now,
            updated_at: now,
        };
        self.products
            .write()
            .await
            .insert(product.id, product.clone());
        Ok(product)
    }

    async fn update_product(
        &self,
        id: Uuid,
        input: &UpdateProduct,
    ) -> Result<Option<Product>, AppError> {
        let mut products = self.products.write().await;
        let Some(product) = products.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = &input.name {
            product.name = name.clone();
        }
        if let Some(description) = &input.description {
            product.description = description.clone();
        }
        if let Some(price) = input.price {
            product.price = price;
        }
        if let Some(unit) = &input.unit {
            product.unit = unit.clone();
        }
        if let Some(category) = &input.category {
            product.category = category.clone();
        }
        if let Some(is_available) = input.is_available {
            product.is_available = is_available;
        }
        product.updated_at = Utc::now();
        Ok(Some(product.clone()))
    }
}

#[async_trait]
impl OrderRepository for InMemoryStore {
    async fn create_order(
        &self,
        input: &CreateOrder,
        items: &[NewLineItem],
    ) -> Result<Order, AppError> {
        let now = Utc::now();
        let order = Order {
            id: Uuid::new_v4(),
            customer_id: input.customer_id,
            customer_name: input.customer_name.clone(),
            customer_phone: input.customer_phone.clone(),
            customer_email: input.customer_email.clone(),
            delivery_address: input.delivery_address.clone(),
            total_amount: input.total_amount,
            status: input.status.clone(),
            payment_status: input.payment_status.clone(),
            payment_method: input.payment_method.clone(),
            notes: input.notes.clone(),
            created_at: now,
            updated_at: now,
        };

        let rows: Vec<LineItem> = items
            .iter()
            .map(|item| LineItem {
                id: Uuid::new_v4(),
                order_id: order.id,
                product_id: item.product_id,
                product_name: item.product_name.clone(),
                quantity: item.quantity,
                unit_price: item.unit_price,
                total_price: item.total_price,
            })
            .collect();

        self.orders.write().await.insert(order.id, order.clone());
        self.items.write().await.insert(order.id, rows);
        self.charges.write().await.insert(order.id, Vec::new());
        Ok(order)
    }

    async fn get_order(&self, id: Uuid) -> Result<Option<Order>, AppError> {
        Ok(self.orders.read().await.get(&id).cloned())
    }

    async fn list_orders(&self, filter: &OrderFilter) -> Result<Vec<Order>, AppError> {
        let orders = self.orders.read().await;
        let mut matching: Vec<Order> = orders
            .values()
            .filter(|o| {
                filter
                    .status
                    .as_ref()
                    .map(|s| &o.status == s)
                    .unwrap_or(true)
            })
            .filter(|o| {
                filter
                    .customer_id
                    .map(|c| o.customer_id == Some(c))
                    .unwrap_or(true)
            })
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matching)
    }

    async fn list_line_items(&self, order_id: Uuid) -> Result<Vec<LineItem>, AppError> {
        Ok(self
            .items
            .read()
            .await
            .get(&order_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn list_charges(&self, order_id: Uuid) -> Result<Vec<AdditionalCharge>, AppError> {
        Ok(self
            .charges
            .read()
            .await
            .get(&order_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn update_status(&self, id: Uuid, status: &str) -> Result<Option<Order>, AppError> {
        let mut orders = self.orders.write().await;
        let Some(order) = orders.get_mut(&id) else {
            return Ok(None);
        };
        order.status = status.to_string();
        order.updated_at = Utc::now();
        Ok(Some(order.clone()))
    }

    async fn delete_order(&self, id: Uuid) -> Result<bool, AppError> {
        let existed = self.orders.write().await.remove(&id).is_some();
        self.items.write().await.remove(&id);
        self.charges.write().await.remove(&id);
        Ok(existed)
    }

    async fn replace_order_contents(
        &self,
        order_id: Uuid,
        items: &[NewLineItem],
        charges: &[NewCharge],
        grand_total: Decimal,
    ) -> Result<(Vec<LineItem>, Vec<AdditionalCharge>), AppError> {
        // Take the order lock first; nothing is replaced unless the order
        // exists, mirroring the transactional backend.
        let mut orders = self.orders.write().await;
        let Some(order) = orders.get_mut(&order_id) else {
            return Err(AppError::NotFound(anyhow::anyhow!(
                "Order {} not found",
                order_id
            )));
        };

        let persisted_items: Vec<LineItem> = items
            .iter()
            .map(|item| LineItem {
                id: Uuid::new_v4(),
                order_id,
                product_id: item.product_id,
                product_name: item.product_name.clone(),
                quantity: item.quantity,
                unit_price: item.unit_price,
                total_price: item.total_price,
            })
            .collect();

        let persisted_charges: Vec<AdditionalCharge> = charges
            .iter()
            .map(|charge| AdditionalCharge {
                id: Uuid::new_v4(),
                order_id,
                name: charge.name.clone(),
                amount: charge.amount,
                description: charge.description.clone(),
            })
            .collect();

        self.items
            .write()
            .await
            .insert(order_id, persisted_items.clone());
        self.charges
            .write()
            .await
            .insert(order_id, persisted_charges.clone());

        order.total_amount = grand_total;
        order.updated_at = Utc::now();

        Ok((persisted_items, persisted_charges))
    }
}

#[async_trait]
impl NotificationRepository for InMemoryStore {
    async fn insert_notification(
        &self,
        input: &NewNotification,
    ) -> Result<Notification, AppError> {
        let notification = Notification {
            id: Uuid::new_v4(),
            customer_id: input.customer_id,
            kind: input.kind.clone(),
            title: input.title.clone(),
            message: input.message.clone(),
            sent_at: Utc::now(),
            read: false,
        };
        self.notifications.write().await.push(notification.clone());
        Ok(notification)
    }

    async fn list_notifications(
        &self,
        customer_id: Option<Uuid>,
    ) -> Result<Vec<Notification>, AppError> {
        let notifications = self.notifications.read().await;
        let mut matching: Vec<Notification> = notifications
            .iter()
            .filter(|n| match customer_id {
                Some(id) => n.customer_id.is_none() || n.customer_id == Some(id),
                None => true,
            })
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.sent_at.cmp(&a.sent_at));
        Ok(matching)
    }

    async fn mark_notification_read(&self, id: Uuid) -> Result<bool, AppError> {
        let mut notifications = self.notifications.write().await;
        match notifications.iter_mut().find(|n| n.id == id) {
            Some(notification) => {
                notification.read = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
