//! Customer notification model for storefront-service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Notification category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    OrderConfirmation,
    StatusUpdate,
    PriceUpdate,
    Promotion,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::OrderConfirmation => "order_confirmation",
            NotificationKind::StatusUpdate => "status_update",
            NotificationKind::PriceUpdate => "price_update",
            NotificationKind::Promotion => "promotion",
        }
    }
}

/// Stored notification record.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    pub id: Uuid,
    /// Absent for broadcast notifications.
    pub customer_id: Option<Uuid>,
    pub kind: String,
    pub title: String,
    pub message: String,
    pub sent_at: DateTime<Utc>,
    pub read: bool,
}

/// Insert shape for a notification.
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub customer_id: Option<Uuid>,
    pub kind: String,
    pub title: String,
    pub message: String,
}
