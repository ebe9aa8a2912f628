//! Metrics module for storefront-service.
//! Provides Prometheus metrics for storefront operations.

use once_cell::sync::Lazy;
use prometheus::{
    histogram_opts, opts, register_histogram_vec, register_int_counter_vec, Encoder, HistogramVec,
    IntCounterVec, TextEncoder,
};
use std::sync::OnceLock;

/// Database query duration histogram
pub static DB_QUERY_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        histogram_opts!(
            "storefront_db_query_duration_seconds",
            "Database query duration"
        ),
        &["operation"]
    )
    .expect("Failed to register DB_QUERY_DURATION")
});

/// Order operations counter
pub static ORDER_OPERATIONS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

/// Edit session commit counter by outcome
pub static EDIT_COMMITS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

/// Notification send counter by channel
pub static NOTIFICATIONS_SENT_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

/// Initialize all metrics. Call once at startup.
pub fn init_metrics() {
    ORDER_OPERATIONS_TOTAL.get_or_init(|| {
        register_int_counter_vec!(
            opts!(
                "storefront_order_operations_total",
                "Total order operations by type"
            ),
            &["operation"]
        )
        .expect("Failed to register ORDER_OPERATIONS_TOTAL")
    });

    EDIT_COMMITS_TOTAL.get_or_init(|| {
        register_int_counter_vec!(
            opts!(
                "storefront_edit_commits_total",
                "Total edit session commits by outcome"
            ),
            &["outcome"]
        )
        .expect("Failed to register EDIT_COMMITS_TOTAL")
    });

    NOTIFICATIONS_SENT_TOTAL.get_or_init(|| {
        register_int_counter_vec!(
            opts!(
                "storefront_notifications_sent_total",
                "Total notification deliveries by channel"
            ),
            &["channel"]
        )
        .expect("Failed to register NOTIFICATIONS_SENT_TOTAL")
    });
}

/// Record an order operation if metrics are initialized.
pub fn record_order_operation(operation: &str) {
    if let Some(counter) = ORDER_OPERATIONS_TOTAL.get() {
        counter.with_label_values(&[operation]).inc();
    }
}

/// Record an edit commit outcome if metrics are initialized.
pub fn record_edit_commit(outcome: &str) {
    if let Some(counter) = EDIT_COMMITS_TOTAL.get() {
        counter.with_label_values(&[outcome]).inc();
    }
}

/// Record a notification delivery if metrics are initialized.
pub fn record_notification(channel: &str) {
    if let Some(counter) = NOTIFICATIONS_SENT_TOTAL.get() {
        counter.with_label_values(&[channel]).inc();
    }
}

/// Render all registered metrics in the Prometheus text format.
pub fn get_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode metrics");
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
