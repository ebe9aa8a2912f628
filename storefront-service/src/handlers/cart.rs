//! Shopping cart handlers.
//!
//! Carts are keyed by customer id and live in process memory until checkout.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use storefront_core::error::AppError;
use tracing::instrument;
use uuid::Uuid;

use crate::models::CartItem;
use crate::services::CartService;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct CartView {
    pub items: Vec<CartItem>,
    pub total_items: i32,
    pub total_price: Decimal,
}

impl CartView {
    fn from_items(items: Vec<CartItem>) -> Self {
        CartView {
            total_items: CartService::total_items(&items),
            total_price: CartService::total_price(&items),
            items,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub product_id: Uuid,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
}

fn default_quantity() -> i32 {
    1
}

#[derive(Debug, Deserialize)]
pub struct UpdateItemRequest {
    pub quantity: i32,
}

#[instrument(skip(state))]
pub async fn get_cart(
    State(state): State<AppState>,
    Path(customer_id): Path<Uuid>,
) -> Result<Json<CartView>, AppError> {
    let items = state.carts.items(customer_id).await;
    Ok(Json(CartView::from_items(items)))
}

#[instrument(skip(state, request))]
pub async fn add_item(
    State(state): State<AppState>,
    Path(customer_id): Path<Uuid>,
    Json(request): Json<AddItemRequest>,
) -> Result<Json<CartView>, AppError> {
    let product = state
        .catalog
        .get_product(request.product_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Product not found")))?;
    if !product.is_available {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Product is not available"
        )));
    }

    let items = state
        .carts
        .add_item(customer_id, product, request.quantity)
        .await;
    Ok(Json(CartView::from_items(items)))
}

#[instrument(skip(state, request))]
pub async fn update_item(
    State(state): State<AppState>,
    Path((customer_id, product_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<UpdateItemRequest>,
) -> Result<Json<CartView>, AppError> {
    let items = state
        .carts
        .update_quantity(customer_id, product_id, request.quantity)
        .await;
    Ok(Json(CartView::from_items(items)))
}

#[instrument(skip(state))]
pub async fn remove_item(
    State(state): State<AppState>,
    Path((customer_id, product_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<CartView>, AppError> {
    let items = state.carts.remove_item(customer_id, product_id).await;
    Ok(Json(CartView::from_items(items)))
}

#[instrument(skip(state))]
pub async fn clear_cart(
    State(state): State<AppState>,
    Path(customer_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.carts.clear(customer_id).await;
    Ok(StatusCode::NO_CONTENT)
}
