//! HTTP handlers for storefront-service.

pub mod analytics;
pub mod cart;
pub mod checkout;
pub mod editing;
pub mod metrics;
pub mod notifications;
pub mod orders;
pub mod products;
pub mod receipts;
