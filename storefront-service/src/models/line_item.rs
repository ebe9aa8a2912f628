//! Order line item model for storefront-service.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One product entry on an order.
///
/// Invariant: `total_price == unit_price * quantity` after every mutation.
/// During an edit session the id is a locally generated placeholder; the
/// persistence layer assigns durable ids on commit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct LineItem {
    pub id: Uuid,
    pub order_id: Uuid,
    /// Absent for manually entered items.
    pub product_id: Option<Uuid>,
    /// Snapshotted at add time, never re-fetched from the catalog.
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
}

impl LineItem {
    pub fn recompute_total(&mut self) {
        self.total_price = self.unit_price * Decimal::from(self.quantity);
    }
}

/// Insert shape for a line item; storage assigns the durable id.
#[derive(Debug, Clone)]
pub struct NewLineItem {
    pub product_id: Option<Uuid>,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
}

impl From<&LineItem> for NewLineItem {
    fn from(item: &LineItem) -> Self {
        NewLineItem {
            product_id: item.product_id,
            product_name: item.product_name.clone(),
            quantity: item.quantity,
            unit_price: item.unit_price,
            total_price: item.total_price,
        }
    }
}
