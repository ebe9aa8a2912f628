//! PostgreSQL storage backend for storefront-service.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use storefront_core::error::AppError;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::models::{
    AdditionalCharge, CreateOrder, CreateProduct, LineItem, NewCharge, NewLineItem,
    NewNotification, Notification, Order, OrderFilter, Product, ProductFilter, UpdateProduct,
};
use crate::services::metrics::DB_QUERY_DURATION;

use super::{CatalogRepository, NotificationRepository, OrderRepository};

const LINE_ITEM_COLUMNS: &str =
    "id, order_id, product_id, product_name, quantity, unit_price, total_price";
const CHARGE_COLUMNS: &str = "id, order_id, name, amount, description";
const ORDER_COLUMNS: &str = "id, customer_id, customer_name, customer_phone, customer_email, \
     delivery_address, total_amount, status, payment_status, payment_method, notes, \
     created_at, updated_at";
const PRODUCT_COLUMNS: &str =
    "id, name, description, price, unit, category, is_available, created_at, updated_at";

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new database connection pool.
    #[instrument(skip(database_url), fields(service = "storefront-service"))]
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, AppError> {
        info!(
            max_connections = max_connections,
            min_connections = min_connections,
            "Connecting to PostgreSQL"
        );

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .connect(database_url)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to connect: {}", e)))?;

        info!("PostgreSQL connection pool established");

        Ok(Self { pool })
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Check database health.
    #[instrument(skip(self))]
    pub async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Health check failed: {}", e)))?;
        Ok(())
    }

    /// Run database migrations.
    #[instrument(skip(self))]
    pub async fn run_migrations(&self) -> Result<(), AppError> {
        info!("Running database migrations");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Migration failed: {}", e)))?;
        info!("Database migrations completed");
        Ok(())
    }
}

#[async_trait]
impl CatalogRepository for Database {
    #[instrument(skip(self, filter))]
    async fn list_products(&self, filter: &ProductFilter) -> Result<Vec<Product>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_products"])
            .start_timer();

        let products = sqlx::query_as::<_, Product>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM products
            WHERE ($1::text IS NULL OR lower(category) = lower($1))
              AND ($2::text IS NULL
                   OR name ILIKE '%' || $2 || '%'
                   OR description ILIKE '%' || $2 || '%'
                   OR category ILIKE '%' || $2 || '%')
              AND (NOT $3 OR is_available)
            ORDER BY name
            "#
        ))
        .bind(&filter.category)
        .bind(&filter.search)
        .bind(filter.only_available)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list products: {}", e)))?;

        timer.observe_duration();

        Ok(products)
    }

    #[instrument(skip(self), fields(product_id = %id))]
    async fn get_product(&self, id: Uuid) -> Result<Option<Product>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_product"])
            .start_timer();

        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get product: {}", e)))?;

        timer.observe_duration();

        Ok(product)
    }

    #[instrument(skip(self, input))]
    async fn create_product(&self, input: &CreateProduct) -> Result<Product, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_product"])
            .start_timer();

        let product = sqlx::query_as::<_, Product>(&format!(
            r#"
            INSERT INTO products (id, name, description, price, unit, category, is_available)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.price)
        .bind(&input.unit)
        .bind(&input.category)
        .bind(input.is_available)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to create product: {}", e)))?;

        timer.observe_duration();

        info!(product_id = %product.id, name = %product.name, "Product created");

        Ok(product)
    }

    #[instrument(skip(self, input), fields(product_id = %id))]
    async fn update_product(
        &self,
        id: Uuid,
        input: &UpdateProduct,
    ) -> Result<Option<Product>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["update_product"])
            .start_timer();

        let product = sqlx::query_as::<_, Product>(&format!(
            r#"
            UPDATE products
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                price = COALESCE($4, price),
                unit = COALESCE($5, unit),
                category = COALESCE($6, category),
                is_available = COALESCE($7, is_available),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.price)
        .bind(&input.unit)
        .bind(&input.category)
        .bind(input.is_available)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to update product: {}", e)))?;

        timer.observe_duration();

        Ok(product)
    }
}

#[async_trait]
impl OrderRepository for Database {
    #[instrument(skip(self, input, items), fields(customer = %input.customer_name))]
    async fn create_order(
        &self,
        input: &CreateOrder,
        items: &[NewLineItem],
    ) -> Result<Order, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_order"])
            .start_timer();

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to begin transaction: {}", e))
        })?;

        let order = sqlx::query_as::<_, Order>(&format!(
            r#"
            INSERT INTO orders (id, customer_id, customer_name, customer_phone, customer_email,
                                delivery_address, total_amount, status, payment_status,
                                payment_method, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(input.customer_id)
        .bind(&input.customer_name)
        .bind(&input.customer_phone)
        .bind(&input.customer_email)
        .bind(&input.delivery_address)
        .bind(input.total_amount)
        .bind(&input.status)
        .bind(&input.payment_status)
        .bind(&input.payment_method)
        .bind(&input.notes)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to create order: {}", e)))?;

        for item in items {
            sqlx::query(
                r#"
                INSERT INTO order_items (id, order_id, product_id, product_name, quantity,
                                         unit_price, total_price)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(order.id)
            .bind(item.product_id)
            .bind(&item.product_name)
            .bind(item.quantity)
            .bind(item.unit_price)
            .bind(item.total_price)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to insert order item: {}", e))
            })?;
        }

        tx.commit().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to commit order: {}", e))
        })?;

        timer.observe_duration();

        info!(order_id = %order.id, total = %order.total_amount, "Order created");

        Ok(order)
    }

    #[instrument(skip(self), fields(order_id = %id))]
    async fn get_order(&self, id: Uuid) -> Result<Option<Order>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_order"])
            .start_timer();

        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get order: {}", e)))?;

        timer.observe_duration();

        Ok(order)
    }

    #[instrument(skip(self, filter))]
    async fn list_orders(&self, filter: &OrderFilter) -> Result<Vec<Order>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_orders"])
            .start_timer();

        let orders = sqlx::query_as::<_, Order>(&format!(
            r#"
            SELECT {ORDER_COLUMNS}
            FROM orders
            WHERE ($1::text IS NULL OR status = $1)
              AND ($2::uuid IS NULL OR customer_id = $2)
            ORDER BY created_at DESC
            "#
        ))
        .bind(&filter.status)
        .bind(filter.customer_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list orders: {}", e)))?;

        timer.observe_duration();

        Ok(orders)
    }

    #[instrument(skip(self), fields(order_id = %order_id))]
    async fn list_line_items(&self, order_id: Uuid) -> Result<Vec<LineItem>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_line_items"])
            .start_timer();

        let items = sqlx::query_as::<_, LineItem>(&format!(
            r#"
            SELECT {LINE_ITEM_COLUMNS}
            FROM order_items
            WHERE order_id = $1
            ORDER BY created_at, id
            "#
        ))
        .bind(order_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to list order items: {}", e))
        })?;

        timer.observe_duration();

        Ok(items)
    }

    #[instrument(skip(self), fields(order_id = %order_id))]
    async fn list_charges(&self, order_id: Uuid) -> Result<Vec<AdditionalCharge>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_charges"])
            .start_timer();

        let charges = sqlx::query_as::<_, AdditionalCharge>(&format!(
            r#"
            SELECT {CHARGE_COLUMNS}
            FROM order_additional_charges
            WHERE order_id = $1
            ORDER BY created_at, id
            "#
        ))
        .bind(order_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to list charges: {}", e))
        })?;

        timer.observe_duration();

        Ok(charges)
    }

    #[instrument(skip(self), fields(order_id = %id, status = status))]
    async fn update_status(&self, id: Uuid, status: &str) -> Result<Option<Order>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["update_status"])
            .start_timer();

        let order = sqlx::query_as::<_, Order>(&format!(
            r#"
            UPDATE orders
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to update order status: {}", e))
        })?;

        timer.observe_duration();

        if let Some(ref order) = order {
            info!(order_id = %order.id, status = %order.status, "Order status updated");
        }

        Ok(order)
    }

    #[instrument(skip(self), fields(order_id = %id))]
    async fn delete_order(&self, id: Uuid) -> Result<bool, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["delete_order"])
            .start_timer();

        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to delete order: {}", e))
            })?;

        timer.observe_duration();

        Ok(result.rows_affected() > 0)
    }

    /// Delete-then-insert replacement of an order's items and charges plus
    /// the derived total, in one transaction so a failure at any step rolls
    /// everything back.
    #[instrument(skip(self, items, charges), fields(order_id = %order_id))]
    async fn replace_order_contents(
        &self,
        order_id: Uuid,
        items: &[NewLineItem],
        charges: &[NewCharge],
        grand_total: Decimal,
    ) -> Result<(Vec<LineItem>, Vec<AdditionalCharge>), AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["replace_order_contents"])
            .start_timer();

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to begin transaction: {}", e))
        })?;

        sqlx::query("DELETE FROM order_items WHERE order_id = $1")
            .bind(order_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to delete order items: {}", e))
            })?;

        let mut persisted_items = Vec::with_capacity(items.len());
        for item in items {
            let row = sqlx::query_as::<_, LineItem>(&format!(
                r#"
                INSERT INTO order_items (id, order_id, product_id, product_name, quantity,
                                         unit_price, total_price)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING {LINE_ITEM_COLUMNS}
                "#
            ))
            .bind(Uuid::new_v4())
            .bind(order_id)
            .bind(item.product_id)
            .bind(&item.product_name)
            .bind(item.quantity)
            .bind(item.unit_price)
            .bind(item.total_price)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to insert order item: {}", e))
            })?;
            persisted_items.push(row);
        }

        sqlx::query("DELETE FROM order_additional_charges WHERE order_id = $1")
            .bind(order_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to delete charges: {}", e))
            })?;

        let mut persisted_charges = Vec::with_capacity(charges.len());
        for charge in charges {
            let row = sqlx::query_as::<_, AdditionalCharge>(&format!(
                r#"
                INSERT INTO order_additional_charges (id, order_id, name, amount, description)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING {CHARGE_COLUMNS}
                "#
            ))
            .bind(Uuid::new_v4())
            .bind(order_id)
            .bind(&charge.name)
            .bind(charge.amount)
            .bind(&charge.description)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to insert charge: {}", e))
            })?;
            persisted_charges.push(row);
        }

        let result = sqlx::query(
            "UPDATE orders SET total_amount = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(order_id)
        .bind(grand_total)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to update order total: {}", e))
        })?;

        if result.rows_affected() == 0 {
            // Dropping the transaction rolls back the deletes and inserts.
            return Err(AppError::NotFound(anyhow::anyhow!(
                "Order {} not found",
                order_id
            )));
        }

        tx.commit().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to commit order contents: {}", e))
        })?;

        timer.observe_duration();

        info!(
            order_id = %order_id,
            items = persisted_items.len(),
            charges = persisted_charges.len(),
            total = %grand_total,
            "Order contents replaced"
        );

        Ok((persisted_items, persisted_charges))
    }
}

#[async_trait]
impl NotificationRepository for Database {
    #[instrument(skip(self, input))]
    async fn insert_notification(
        &self,
        input: &NewNotification,
    ) -> Result<Notification, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["insert_notification"])
            .start_timer();

        let notification = sqlx::query_as::<_, Notification>(
            r#"
            INSERT INTO notifications (id, customer_id, kind, title, message, sent_at, read)
            VALUES ($1, $2, $3, $4, $5, NOW(), FALSE)
            RETURNING id, customer_id, kind, title, message, sent_at, read
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(input.customer_id)
        .bind(&input.kind)
        .bind(&input.title)
        .bind(&input.message)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to insert notification: {}", e))
        })?;

        timer.observe_duration();

        Ok(notification)
    }

    #[instrument(skip(self))]
    async fn list_notifications(
        &self,
        customer_id: Option<Uuid>,
    ) -> Result<Vec<Notification>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_notifications"])
            .start_timer();

        let notifications = sqlx::query_as::<_, Notification>(
            r#"
            SELECT id, customer_id, kind, title, message, sent_at, read
            FROM notifications
            WHERE $1::uuid IS NULL OR customer_id = $1 OR customer_id IS NULL
            ORDER BY sent_at DESC
            "#,
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to list notifications: {}", e))
        })?;

        timer.observe_duration();

        Ok(notifications)
    }

    #[instrument(skip(self), fields(notification_id = %id))]
    async fn mark_notification_read(&self, id: Uuid) -> Result<bool, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["mark_notification_read"])
            .start_timer();

        let result = sqlx::query("UPDATE notifications SET read = TRUE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to mark notification: {}", e))
            })?;

        timer.observe_duration();

        Ok(result.rows_affected() > 0)
    }
}
