//! Order listing, detail, status tracking, and deletion.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use storefront_core::error::AppError;
use tracing::instrument;
use uuid::Uuid;

use crate::editing::{compute_totals, OrderTotals};
use crate::models::{AdditionalCharge, LineItem, Order, OrderFilter, OrderStatus};
use crate::services::metrics::record_order_operation;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ListOrdersQuery {
    /// Fulfilment status filter; "all" or absent returns everything.
    pub status: Option<String>,
    pub customer_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<LineItem>,
    pub additional_charges: Vec<AdditionalCharge>,
    pub totals: OrderTotals,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

#[instrument(skip(state))]
pub async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<ListOrdersQuery>,
) -> Result<Json<Vec<Order>>, AppError> {
    let filter = OrderFilter {
        status: query.status.filter(|s| s != "all"),
        customer_id: query.customer_id,
    };
    let orders = state.orders.list_orders(&filter).await?;
    Ok(Json(orders))
}

#[instrument(skip(state))]
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<OrderDetail>, AppError> {
    let order = state
        .orders
        .get_order(id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Order not found")))?;
    let items = state.orders.list_line_items(id).await?;
    let additional_charges = state.orders.list_charges(id).await?;
    let totals = compute_totals(&items, &additional_charges);

    Ok(Json(OrderDetail {
        order,
        items,
        additional_charges,
        totals,
    }))
}

#[instrument(skip(state, request))]
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let status = OrderStatus::parse(&request.status)
        .ok_or_else(|| AppError::BadRequest(anyhow::anyhow!("Invalid order status")))?;

    let order = state
        .orders
        .update_status(id, status.as_str())
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Order not found")))?;

    record_order_operation("status_update");
    tracing::info!(order_id = %order.id, status = status.as_str(), "Order status updated");

    if let Some(template_key) = status.notification_key() {
        state.notifier.send_order_status(&order, template_key).await?;
    }

    Ok(Json(json!({
        "order": order,
        "message": format!("Order status updated to {}", status.as_str()),
    })))
}

#[instrument(skip(state))]
pub async fn delete_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let deleted = state.orders.delete_order(id).await?;
    if !deleted {
        return Err(AppError::NotFound(anyhow::anyhow!("Order not found")));
    }

    // Any edit session for the order is now meaningless.
    state.edit_sessions.remove(id).await;
    record_order_operation("delete");
    tracing::info!(order_id = %id, "Order deleted");

    Ok(StatusCode::NO_CONTENT)
}
