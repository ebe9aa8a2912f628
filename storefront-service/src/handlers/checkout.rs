//! Checkout: turn a customer's cart into a persisted order.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use storefront_core::error::AppError;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::models::{CreateOrder, NewLineItem, OrderStatus, PaymentStatus};
use crate::services::metrics::record_order_operation;
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CheckoutRequest {
    pub customer_id: Uuid,
    #[validate(length(min = 1, message = "Customer name must not be empty"))]
    pub customer_name: String,
    #[validate(length(min = 7, message = "Phone number is too short"))]
    pub customer_phone: String,
    #[validate(email(message = "Invalid email address"))]
    pub customer_email: Option<String>,
    #[validate(length(min = 1, message = "Delivery address must not be empty"))]
    pub delivery_address: String,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
}

#[instrument(skip(state, request), fields(customer_id = %request.customer_id))]
pub async fn checkout(
    State(state): State<AppState>,
    Json(request): Json<CheckoutRequest>,
) -> Result<impl IntoResponse, AppError> {
    request.validate()?;

    let cart_items = state.carts.items(request.customer_id).await;
    if cart_items.is_empty() {
        return Err(AppError::BadRequest(anyhow::anyhow!("Cart is empty")));
    }

    let items: Vec<NewLineItem> = cart_items
        .iter()
        .map(|entry| NewLineItem {
            product_id: Some(entry.product.id),
            product_name: entry.product.name.clone(),
            quantity: entry.quantity,
            unit_price: entry.product.price,
            total_price: entry.product.price * Decimal::from(entry.quantity),
        })
        .collect();
    let total_amount: Decimal = items.iter().map(|item| item.total_price).sum();

    let order = state
        .orders
        .create_order(
            &CreateOrder {
                customer_id: Some(request.customer_id),
                customer_name: request.customer_name,
                customer_phone: request.customer_phone,
                customer_email: request.customer_email,
                delivery_address: request.delivery_address,
                total_amount,
                status: OrderStatus::Pending.as_str().to_string(),
                payment_status: PaymentStatus::Pending.as_str().to_string(),
                payment_method: request.payment_method,
                notes: request.notes,
            },
            &items,
        )
        .await?;

    state.carts.clear(request.customer_id).await;
    record_order_operation("create");
    tracing::info!(order_id = %order.id, total = %order.total_amount, "Order placed");

    state
        .notifier
        .send_order_status(&order, "order_confirmation")
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "order": order,
            "items_count": items.len(),
            "message": "Order placed successfully",
        })),
    ))
}
