//! Additional order charge model for storefront-service.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Named ad-hoc charge attached to an order (e.g. a delivery fee).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct AdditionalCharge {
    pub id: Uuid,
    pub order_id: Uuid,
    pub name: String,
    pub amount: Decimal,
    pub description: Option<String>,
}

/// Insert shape for an additional charge.
#[derive(Debug, Clone)]
pub struct NewCharge {
    pub name: String,
    pub amount: Decimal,
    pub description: Option<String>,
}

impl From<&AdditionalCharge> for NewCharge {
    fn from(charge: &AdditionalCharge) -> Self {
        NewCharge {
            name: charge.name.clone(),
            amount: charge.amount,
            description: charge.description.clone(),
        }
    }
}
