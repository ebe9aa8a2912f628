//! Application services for storefront-service.

pub mod analytics;
pub mod carts;
pub mod metrics;
pub mod notifications;
pub mod receipts;

pub use analytics::{summarize, AnalyticsSummary};
pub use carts::CartService;
pub use metrics::{get_metrics, init_metrics};
pub use notifications::NotificationService;
pub use receipts::{generate_qr_base64, generate_receipt_text, receipt_qr_payload, ReceiptData};
