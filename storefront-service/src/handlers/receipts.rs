//! Receipt handlers: plain-text receipt and verification QR code.

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use storefront_core::error::AppError;
use tracing::instrument;
use uuid::Uuid;

use crate::services::receipts::{
    generate_qr_base64, generate_receipt_text, receipt_qr_payload, BusinessInfo, ReceiptData,
};
use crate::AppState;

fn business_info(state: &AppState) -> BusinessInfo {
    let business = &state.config.business;
    BusinessInfo {
        name: business.name.clone(),
        address: business.address.clone(),
        phone: business.phone.clone(),
        email: business.email.clone(),
    }
}

#[instrument(skip(state))]
pub async fn get_receipt(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let order = state
        .orders
        .get_order(id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Order not found")))?;
    let items = state.orders.list_line_items(id).await?;
    let charges = state.orders.list_charges(id).await?;
    let business = business_info(&state);

    let text = generate_receipt_text(&ReceiptData {
        order: &order,
        items: &items,
        charges: &charges,
        business: &business,
    });

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        text,
    ))
}

#[instrument(skip(state))]
pub async fn get_receipt_qr(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let order = state
        .orders
        .get_order(id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Order not found")))?;

    let payload = receipt_qr_payload(&order);
    let qr_png_base64 = generate_qr_base64(&payload)?;

    Ok(Json(json!({
        "order_id": order.id,
        "payload": payload,
        "qr_png_base64": qr_png_base64,
    })))
}
