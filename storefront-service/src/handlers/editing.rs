//! Back-office order editing handlers.
//!
//! All mutations go through the order's edit session; nothing touches
//! storage until the commit endpoint hands the working set to the
//! repository in a single transaction.

use axum::extract::{Path, State};
use axum::Json;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use storefront_core::error::AppError;
use tracing::instrument;
use uuid::Uuid;

use crate::editing::EditSessionView;
use crate::models::{NewCharge, NewLineItem};
use crate::services::metrics::{record_edit_commit, record_order_operation};
use crate::AppState;

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
    pub quantity: Option<i32>,
    pub unit_price: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
pub struct AddChargeRequest {
    pub name: String,
    pub amount: Decimal,
    pub description: Option<String>,
}

#[instrument(skip(state))]
pub async fn begin_edit(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<Json<EditSessionView>, AppError> {
    // Seed the session from the persisted order.
    state
        .orders
        .get_order(order_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Order not found")))?;
    let items = state.orders.list_line_items(order_id).await?;
    let charges = state.orders.list_charges(order_id).await?;

    let handle = state.edit_sessions.begin(order_id, items, charges).await?;
    let session = handle.lock().await;

    tracing::info!(order_id = %order_id, "Edit session started");
    Ok(Json(session.view()))
}

#[instrument(skip(state))]
pub async fn get_session(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<Json<EditSessionView>, AppError> {
    let handle = state
        .edit_sessions
        .get(order_id)
        .await
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("No edit session for this order")))?;
    let session = handle.lock().await;
    Ok(Json(session.view()))
}

#[instrument(skip(state, request))]
pub async fn add_item(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    Json(request): Json<AddItemRequest>,
) -> Result<Json<EditSessionView>, AppError> {
    let product = state
        .catalog
        .get_product(request.product_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Product not found")))?;

    let handle = state
        .edit_sessions
        .get(order_id)
        .await
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("No edit session for this order")))?;
    let mut session = handle.lock().await;
    session.add_item(&product, request.quantity)?;
    Ok(Json(session.view()))
}

#[instrument(skip(state, request))]
pub async fn update_item(
    State(state): State<AppState>,
    Path((order_id, item_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<UpdateItemRequest>,
) -> Result<Json<EditSessionView>, AppError> {
    let handle = state
        .edit_sessions
        .get(order_id)
        .await
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("No edit session for this order")))?;
    let mut session = handle.lock().await;

    if let Some(quantity) = request.quantity {
        session.update_quantity(item_id, quantity)?;
    }
    if let Some(unit_price) = request.unit_price {
        session.update_price(item_id, unit_price)?;
    }
    Ok(Json(session.view()))
}

#[instrument(skip(state))]
pub async fn remove_item(
    State(state): State<AppState>,
    Path((order_id, item_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<EditSessionView>, AppError> {
    let handle = state
        .edit_sessions
        .get(order_id)
        .await
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("No edit session for this order")))?;
    let mut session = handle.lock().await;
    session.remove_item(item_id)?;
    Ok(Json(session.view()))
}

#[instrument(skip(state, request))]
pub async fn add_charge(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    Json(request): Json<AddChargeRequest>,
) -> Result<Json<EditSessionView>, AppError> {
    let handle = state
        .edit_sessions
        .get(order_id)
        .await
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("No edit session for this order")))?;
    let mut session = handle.lock().await;
    session.add_charge(&request.name, request.amount, request.description)?;
    Ok(Json(session.view()))
}

#[instrument(skip(state))]
pub async fn remove_charge(
    State(state): State<AppState>,
    Path((order_id, charge_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<EditSessionView>, AppError> {
    let handle = state
        .edit_sessions
        .get(order_id)
        .await
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("No edit session for this order")))?;
    let mut session = handle.lock().await;
    session.remove_charge(charge_id)?;
    Ok(Json(session.view()))
}

#[instrument(skip(state))]
pub async fn commit(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let handle = state
        .edit_sessions
        .get(order_id)
        .await
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("No edit session for this order")))?;
    let mut session = handle.lock().await;

    let (working, totals) = session.pending_commit()?;
    let items: Vec<NewLineItem> = working.items.iter().map(NewLineItem::from).collect();
    let charges: Vec<NewCharge> = working.charges.iter().map(NewCharge::from).collect();

    let replaced = state
        .orders
        .replace_order_contents(order_id, &items, &charges, totals.grand_total)
        .await;
    let (persisted_items, persisted_charges) = match replaced {
        Ok(rows) => rows,
        Err(err) => {
            record_edit_commit("failure");
            tracing::warn!(order_id = %order_id, error = %err, "Edit commit failed");
            return Err(err);
        }
    };

    session.complete_commit(persisted_items, persisted_charges);
    record_edit_commit("success");
    record_order_operation("edit_commit");
    tracing::info!(order_id = %order_id, total = %totals.grand_total, "Edit session committed");

    let order = state
        .orders
        .get_order(order_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Order not found")))?;

    Ok(Json(json!({
        "order": order,
        "session": session.view(),
    })))
}

#[instrument(skip(state))]
pub async fn discard(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<Json<EditSessionView>, AppError> {
    let handle = state
        .edit_sessions
        .get(order_id)
        .await
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("No edit session for this order")))?;
    let mut session = handle.lock().await;
    session.discard()?;
    tracing::info!(order_id = %order_id, "Edit session discarded");
    Ok(Json(session.view()))
}
