//! Notification handlers.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use storefront_core::error::AppError;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::models::Notification;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ListNotificationsQuery {
    pub customer_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct PromotionRequest {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: String,
    #[validate(length(min = 1, message = "Message must not be empty"))]
    pub message: String,
}

#[instrument(skip(state))]
pub async fn list_notifications(
    State(state): State<AppState>,
    Query(query): Query<ListNotificationsQuery>,
) -> Result<Json<Vec<Notification>>, AppError> {
    let notifications = state.notifier.list(query.customer_id).await?;
    Ok(Json(notifications))
}

#[instrument(skip(state))]
pub async fn mark_read(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let updated = state.notifier.mark_read(id).await?;
    if !updated {
        return Err(AppError::NotFound(anyhow::anyhow!("Notification not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, request))]
pub async fn send_promotion(
    State(state): State<AppState>,
    Json(request): Json<PromotionRequest>,
) -> Result<impl IntoResponse, AppError> {
    request.validate()?;
    let notification = state
        .notifier
        .send_promotion(&request.title, &request.message)
        .await?;
    Ok((StatusCode::CREATED, Json(notification)))
}
