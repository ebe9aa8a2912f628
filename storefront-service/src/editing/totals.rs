//! Derived order totals.
//!
//! Totals are always recomputed from the current working lists rather than
//! maintained incrementally, so they cannot drift from their sources.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{AdditionalCharge, LineItem};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrderTotals {
    pub items_subtotal: Decimal,
    pub charges_total: Decimal,
    pub grand_total: Decimal,
}

/// Recompute subtotal, charges total, and grand total from scratch.
pub fn compute(items: &[LineItem], charges: &[AdditionalCharge]) -> OrderTotals {
    let items_subtotal: Decimal = items.iter().map(|item| item.total_price).sum();
    let charges_total: Decimal = charges.iter().map(|charge| charge.amount).sum();

    OrderTotals {
        items_subtotal,
        charges_total,
        grand_total: items_subtotal + charges_total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn item(quantity: i32, unit_price: Decimal) -> LineItem {
        let mut item = LineItem {
            id: Uuid::new_v4(),
            order_id: Uuid::new_v4(),
            product_id: None,
            product_name: "Tomatoes".to_string(),
            quantity,
            unit_price,
            total_price: Decimal::ZERO,
        };
        item.recompute_total();
        item
    }

    fn charge(amount: Decimal) -> AdditionalCharge {
        AdditionalCharge {
            id: Uuid::new_v4(),
            order_id: Uuid::new_v4(),
            name: "Delivery Fee".to_string(),
            amount,
            description: None,
        }
    }

    #[test]
    fn empty_working_set_totals_zero() {
        let totals = compute(&[], &[]);
        assert_eq!(totals.items_subtotal, Decimal::ZERO);
        assert_eq!(totals.charges_total, Decimal::ZERO);
        assert_eq!(totals.grand_total, Decimal::ZERO);
    }

    #[test]
    fn grand_total_is_subtotal_plus_charges() {
        let items = vec![item(2, Decimal::new(5000, 2)), item(3, Decimal::new(1250, 2))];
        let charges = vec![charge(Decimal::new(8000, 2))];

        let totals = compute(&items, &charges);
        assert_eq!(totals.items_subtotal, Decimal::new(13750, 2));
        assert_eq!(totals.charges_total, Decimal::new(8000, 2));
        assert_eq!(totals.grand_total, Decimal::new(21750, 2));
    }
}
