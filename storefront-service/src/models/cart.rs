//! Shopping cart model for storefront-service.

use serde::{Deserialize, Serialize};

use super::Product;

/// Cart entry; the product is snapshotted when added.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    pub product: Product,
    pub quantity: i32,
}
