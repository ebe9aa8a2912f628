//! Back-office analytics over the order history.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

use crate::models::Order;

#[derive(Debug, Serialize)]
pub struct DailyRevenue {
    pub date: NaiveDate,
    pub revenue: Decimal,
}

#[derive(Debug, Serialize)]
pub struct AnalyticsSummary {
    /// Revenue over paid orders only.
    pub total_revenue: Decimal,
    pub total_orders: usize,
    /// Paid revenue divided by all orders.
    pub average_order_value: Decimal,
    pub orders_by_status: HashMap<String, usize>,
    /// Paid revenue per day, trailing 7 days, oldest first.
    pub revenue_by_day: Vec<DailyRevenue>,
}

fn is_paid(order: &Order) -> bool {
    order.payment_status == "paid"
}

/// Aggregate the order history into the admin dashboard summary.
pub fn summarize(orders: &[Order], now: DateTime<Utc>) -> AnalyticsSummary {
    let total_revenue: Decimal = orders
        .iter()
        .filter(|o| is_paid(o))
        .map(|o| o.total_amount)
        .sum();

    let total_orders = orders.len();
    let average_order_value = if total_orders > 0 {
        total_revenue / Decimal::from(total_orders as u64)
    } else {
        Decimal::ZERO
    };

    let mut orders_by_status: HashMap<String, usize> = HashMap::new();
    for order in orders {
        *orders_by_status.entry(order.status.clone()).or_default() += 1;
    }

    let today = now.date_naive();
    let revenue_by_day = (0..7)
        .rev()
        .map(|days_ago| {
            let date = today - Duration::days(days_ago);
            let revenue = orders
                .iter()
                .filter(|o| is_paid(o) && o.created_at.date_naive() == date)
                .map(|o| o.total_amount)
                .sum();
            DailyRevenue { date, revenue }
        })
        .collect();

    AnalyticsSummary {
        total_revenue,
        total_orders,
        average_order_value,
        orders_by_status,
        revenue_by_day,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn order(total: Decimal, status: &str, payment_status: &str, created: DateTime<Utc>) -> Order {
        Order {
            id: Uuid::new_v4(),
            customer_id: None,
            customer_name: "Customer".to_string(),
            customer_phone: "+254700000000".to_string(),
            customer_email: None,
            delivery_address: "Somewhere".to_string(),
            total_amount: total,
            status: status.to_string(),
            payment_status: payment_status.to_string(),
            payment_method: None,
            notes: None,
            created_at: created,
            updated_at: created,
        }
    }

    #[test]
    fn revenue_counts_paid_orders_only() {
        let now = Utc::now();
        let orders = vec![
            order(Decimal::new(10000, 2), "delivered", "paid", now),
            order(Decimal::new(5000, 2), "pending", "pending", now),
            order(Decimal::new(8000, 2), "delivered", "paid", now - Duration::days(2)),
        ];

        let summary = summarize(&orders, now);
        assert_eq!(summary.total_revenue, Decimal::new(18000, 2));
        assert_eq!(summary.total_orders, 3);
        assert_eq!(summary.average_order_value, Decimal::new(6000, 2));
        assert_eq!(summary.orders_by_status["delivered"], 2);
        assert_eq!(summary.orders_by_status["pending"], 1);
    }

    #[test]
    fn revenue_by_day_covers_trailing_week() {
        let now = Utc::now();
        let orders = vec![
            order(Decimal::new(10000, 2), "delivered", "paid", now),
            order(Decimal::new(9000, 2), "delivered", "paid", now - Duration::days(8)),
        ];

        let summary = summarize(&orders, now);
        assert_eq!(summary.revenue_by_day.len(), 7);
        assert_eq!(summary.revenue_by_day[6].revenue, Decimal::new(10000, 2));
        // The 8-day-old order falls outside the window.
        let window_total: Decimal = summary.revenue_by_day.iter().map(|d| d.revenue).sum();
        assert_eq!(window_total, Decimal::new(10000, 2));
    }
}
