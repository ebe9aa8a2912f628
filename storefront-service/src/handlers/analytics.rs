//! Admin analytics handler.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use storefront_core::error::AppError;
use tracing::instrument;

use crate::models::OrderFilter;
use crate::services::{summarize, AnalyticsSummary};
use crate::AppState;

#[instrument(skip(state))]
pub async fn summary(State(state): State<AppState>) -> Result<Json<AnalyticsSummary>, AppError> {
    let orders = state.orders.list_orders(&OrderFilter::default()).await?;
    Ok(Json(summarize(&orders, Utc::now())))
}
