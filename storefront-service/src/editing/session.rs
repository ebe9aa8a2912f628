//! Per-order edit session state machine.
//!
//! An order's line items and additional charges are edited against an
//! in-memory working set seeded from the last persisted snapshot. Mutations
//! are only accepted while the session is in editing mode; committing hands
//! the working set to the persistence layer wholesale and the persisted rows
//! (with durable ids) become the new snapshot. Discarding restores the
//! snapshot without any I/O.

use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::models::{AdditionalCharge, LineItem, Product};

use super::totals::{self, OrderTotals};
use super::EditError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionMode {
    Viewing,
    Editing,
}

/// Snapshot-or-working pair of line items and charges.
#[derive(Debug, Clone, Default)]
pub struct WorkingSet {
    pub items: Vec<LineItem>,
    pub charges: Vec<AdditionalCharge>,
}

/// Serializable view of a session for the API layer.
#[derive(Debug, Serialize)]
pub struct EditSessionView {
    pub order_id: Uuid,
    pub mode: SessionMode,
    pub dirty: bool,
    pub items: Vec<LineItem>,
    pub charges: Vec<AdditionalCharge>,
    pub totals: OrderTotals,
}

#[derive(Debug)]
pub struct EditSession {
    order_id: Uuid,
    mode: SessionMode,
    snapshot: WorkingSet,
    working: WorkingSet,
    dirty: bool,
}

impl EditSession {
    /// Create a session in viewing mode over the persisted state.
    pub fn new(order_id: Uuid, items: Vec<LineItem>, charges: Vec<AdditionalCharge>) -> Self {
        let snapshot = WorkingSet { items, charges };
        EditSession {
            order_id,
            mode: SessionMode::Viewing,
            working: snapshot.clone(),
            snapshot,
            dirty: false,
        }
    }

    pub fn order_id(&self) -> Uuid {
        self.order_id
    }

    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    pub fn dirty(&self) -> bool {
        self.dirty
    }

    pub fn items(&self) -> &[LineItem] {
        &self.working.items
    }

    pub fn charges(&self) -> &[AdditionalCharge] {
        &self.working.charges
    }

    /// Totals over the current working set, recomputed fresh.
    pub fn totals(&self) -> OrderTotals {
        totals::compute(&self.working.items, &self.working.charges)
    }

    pub fn view(&self) -> EditSessionView {
        EditSessionView {
            order_id: self.order_id,
            mode: self.mode,
            dirty: self.dirty,
            items: self.working.items.clone(),
            charges: self.working.charges.clone(),
            totals: self.totals(),
        }
    }

    /// Replace the persisted snapshot while in viewing mode.
    ///
    /// Used when the order detail is reloaded and the session is re-seeded
    /// from storage before the next edit begins.
    pub fn refresh_snapshot(&mut self, items: Vec<LineItem>, charges: Vec<AdditionalCharge>) {
        debug_assert_eq!(self.mode, SessionMode::Viewing);
        self.snapshot = WorkingSet { items, charges };
        self.working = self.snapshot.clone();
        self.dirty = false;
    }

    /// viewing -> editing: seed working copies from the snapshot.
    pub fn begin_edit(&mut self) -> Result<(), EditError> {
        if self.mode == SessionMode::Editing {
            return Err(EditError::AlreadyEditing);
        }
        self.working = self.snapshot.clone();
        self.mode = SessionMode::Editing;
        self.dirty = false;
        Ok(())
    }

    /// Append a new line item from a catalog product.
    ///
    /// A duplicate product creates a second line rather than incrementing an
    /// existing one. The item carries a temporary id until commit.
    pub fn add_item(&mut self, product: &Product, quantity: i32) -> Result<&LineItem, EditError> {
        self.require_editing()?;

        let quantity = quantity.max(1);
        let mut item = LineItem {
            id: Uuid::new_v4(),
            order_id: self.order_id,
            product_id: Some(product.id),
            product_name: product.name.clone(),
            quantity,
            unit_price: product.price,
            total_price: Decimal::ZERO,
        };
        item.recompute_total();

        self.working.items.push(item);
        self.dirty = true;
        Ok(self.working.items.last().expect("just pushed"))
    }

    /// Set a line item's quantity and recompute its total.
    ///
    /// Quantities below 1 and unknown ids are silently ignored.
    pub fn update_quantity(&mut self, item_id: Uuid, quantity: i32) -> Result<(), EditError> {
        self.require_editing()?;

        if quantity < 1 {
            return Ok(());
        }
        if let Some(item) = self.working.items.iter_mut().find(|i| i.id == item_id) {
            item.quantity = quantity;
            item.recompute_total();
            self.dirty = true;
        }
        Ok(())
    }

    /// Set a line item's unit price and recompute its total.
    ///
    /// Negative prices and unknown ids are silently ignored.
    pub fn update_price(&mut self, item_id: Uuid, unit_price: Decimal) -> Result<(), EditError> {
        self.require_editing()?;

        if unit_price < Decimal::ZERO {
            return Ok(());
        }
        if let Some(item) = self.working.items.iter_mut().find(|i| i.id == item_id) {
            item.unit_price = unit_price;
            item.recompute_total();
            self.dirty = true;
        }
        Ok(())
    }

    /// Remove a line item; removing an unknown id is a no-op.
    pub fn remove_item(&mut self, item_id: Uuid) -> Result<(), EditError> {
        self.require_editing()?;

        let before = self.working.items.len();
        self.working.items.retain(|i| i.id != item_id);
        if self.working.items.len() != before {
            self.dirty = true;
        }
        Ok(())
    }

    /// Append a named charge; empty names and non-positive amounts are
    /// rejected as validation failures and leave the working set unchanged.
    pub fn add_charge(
        &mut self,
        name: &str,
        amount: Decimal,
        description: Option<String>,
    ) -> Result<&AdditionalCharge, EditError> {
        self.require_editing()?;

        if name.trim().is_empty() {
            return Err(EditError::InvalidCharge(
                "charge name must not be empty".to_string(),
            ));
        }
        if amount <= Decimal::ZERO {
            return Err(EditError::InvalidCharge(
                "charge amount must be greater than zero".to_string(),
            ));
        }

        self.working.charges.push(AdditionalCharge {
            id: Uuid::new_v4(),
            order_id: self.order_id,
            name: name.to_string(),
            amount,
            description,
        });
        self.dirty = true;
        Ok(self.working.charges.last().expect("just pushed"))
    }

    /// Remove a charge; removing an unknown id is a no-op.
    pub fn remove_charge(&mut self, charge_id: Uuid) -> Result<(), EditError> {
        self.require_editing()?;

        let before = self.working.charges.len();
        self.working.charges.retain(|c| c.id != charge_id);
        if self.working.charges.len() != before {
            self.dirty = true;
        }
        Ok(())
    }

    /// editing -> viewing without persistence: the working set reverts to
    /// the last persisted snapshot.
    pub fn discard(&mut self) -> Result<(), EditError> {
        self.require_editing()?;

        self.working = self.snapshot.clone();
        self.mode = SessionMode::Viewing;
        self.dirty = false;
        Ok(())
    }

    /// Validate preconditions for a commit and hand out the working set.
    ///
    /// A clean session is a precondition failure; the session itself is left
    /// untouched so the caller can retry or discard after a storage failure.
    pub fn pending_commit(&self) -> Result<(WorkingSet, OrderTotals), EditError> {
        if self.mode != SessionMode::Editing {
            return Err(EditError::NotEditing);
        }
        if !self.dirty {
            return Err(EditError::NothingToCommit);
        }
        Ok((self.working.clone(), self.totals()))
    }

    /// Record a successful commit: the persisted rows become the new
    /// snapshot and the session returns to viewing mode.
    pub fn complete_commit(&mut self, items: Vec<LineItem>, charges: Vec<AdditionalCharge>) {
        self.snapshot = WorkingSet { items, charges };
        self.working = self.snapshot.clone();
        self.mode = SessionMode::Viewing;
        self.dirty = false;
    }

    fn require_editing(&self) -> Result<(), EditError> {
        if self.mode != SessionMode::Editing {
            return Err(EditError::NotEditing);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn product(name: &str, price: Decimal) -> Product {
        Product {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: String::new(),
            price,
            unit: "kg".to_string(),
            category: "vegetables".to_string(),
            is_available: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn seeded_session() -> (EditSession, Uuid) {
        let order_id = Uuid::new_v4();
        let mut item = LineItem {
            id: Uuid::new_v4(),
            order_id,
            product_id: Some(Uuid::new_v4()),
            product_name: "Tomatoes".to_string(),
            quantity: 2,
            unit_price: Decimal::new(5000, 2),
            total_price: Decimal::ZERO,
        };
        item.recompute_total();
        let item_id = item.id;
        (EditSession::new(order_id, vec![item], vec![]), item_id)
    }

    #[test]
    fn mutations_rejected_while_viewing() {
        let (mut session, item_id) = seeded_session();
        assert!(matches!(
            session.update_quantity(item_id, 3),
            Err(EditError::NotEditing)
        ));
        assert!(matches!(session.discard(), Err(EditError::NotEditing)));
    }

    #[test]
    fn begin_edit_twice_is_rejected() {
        let (mut session, _) = seeded_session();
        session.begin_edit().unwrap();
        assert!(matches!(session.begin_edit(), Err(EditError::AlreadyEditing)));
    }

    #[test]
    fn line_total_invariant_holds_across_mutations() {
        let (mut session, item_id) = seeded_session();
        session.begin_edit().unwrap();

        session.update_quantity(item_id, 3).unwrap();
        session.update_price(item_id, Decimal::new(5500, 2)).unwrap();
        session
            .add_item(&product("Spinach", Decimal::new(3000, 2)), 2)
            .unwrap();

        for item in session.items() {
            assert_eq!(item.total_price, item.unit_price * Decimal::from(item.quantity));
        }
    }

    #[test]
    fn invalid_quantity_and_price_are_silent_noops() {
        let (mut session, item_id) = seeded_session();
        session.begin_edit().unwrap();

        session.update_quantity(item_id, 0).unwrap();
        session.update_quantity(item_id, -4).unwrap();
        session.update_price(item_id, Decimal::new(-100, 2)).unwrap();

        assert!(!session.dirty());
        assert_eq!(session.items()[0].quantity, 2);
        assert_eq!(session.items()[0].unit_price, Decimal::new(5000, 2));
    }

    #[test]
    fn removing_unknown_ids_is_a_noop() {
        let (mut session, _) = seeded_session();
        session.begin_edit().unwrap();

        session.remove_item(Uuid::new_v4()).unwrap();
        session.remove_charge(Uuid::new_v4()).unwrap();

        assert!(!session.dirty());
        assert_eq!(session.items().len(), 1);
    }

    #[test]
    fn duplicate_product_creates_second_line() {
        let (mut session, _) = seeded_session();
        session.begin_edit().unwrap();

        let p = product("Spinach", Decimal::new(3000, 2));
        session.add_item(&p, 1).unwrap();
        session.add_item(&p, 1).unwrap();

        assert_eq!(session.items().len(), 3);
    }

    #[test]
    fn charge_validation() {
        let (mut session, _) = seeded_session();
        session.begin_edit().unwrap();

        assert!(session
            .add_charge("", Decimal::new(1000, 2), None)
            .is_err());
        assert!(session
            .add_charge("Delivery", Decimal::ZERO, None)
            .is_err());
        assert!(!session.dirty());

        session
            .add_charge("Delivery", Decimal::new(5000, 2), None)
            .unwrap();
        assert_eq!(session.totals().charges_total, Decimal::new(5000, 2));
    }

    #[test]
    fn worked_scenario_matches_expected_totals() {
        // 2 x 50.00 -> qty 3 -> +80.00 charge -> remove item -> discard.
        let (mut session, item_id) = seeded_session();
        assert_eq!(session.totals().grand_total, Decimal::new(10000, 2));

        session.begin_edit().unwrap();
        session.update_quantity(item_id, 3).unwrap();
        assert_eq!(session.items()[0].total_price, Decimal::new(15000, 2));

        session
            .add_charge("Delivery Fee", Decimal::new(8000, 2), None)
            .unwrap();
        let totals = session.totals();
        assert_eq!(totals.charges_total, Decimal::new(8000, 2));
        assert_eq!(totals.grand_total, Decimal::new(23000, 2));

        session.remove_item(item_id).unwrap();
        let totals = session.totals();
        assert_eq!(totals.items_subtotal, Decimal::ZERO);
        assert_eq!(totals.grand_total, Decimal::new(8000, 2));

        session.discard().unwrap();
        assert!(!session.dirty());
        assert_eq!(session.mode(), SessionMode::Viewing);
        assert_eq!(session.items().len(), 1);
        assert_eq!(session.items()[0].quantity, 2);
        assert_eq!(session.totals().grand_total, Decimal::new(10000, 2));
    }

    #[test]
    fn clean_commit_is_a_precondition_failure() {
        let (mut session, _) = seeded_session();
        session.begin_edit().unwrap();
        assert!(matches!(
            session.pending_commit(),
            Err(EditError::NothingToCommit)
        ));
    }

    #[test]
    fn complete_commit_installs_new_snapshot() {
        let (mut session, item_id) = seeded_session();
        session.begin_edit().unwrap();
        session.update_quantity(item_id, 5).unwrap();

        let (working, totals) = session.pending_commit().unwrap();
        assert_eq!(totals.grand_total, Decimal::new(25000, 2));

        // Pretend storage re-inserted the rows under durable ids.
        let persisted: Vec<LineItem> = working
            .items
            .iter()
            .map(|i| LineItem {
                id: Uuid::new_v4(),
                ..i.clone()
            })
            .collect();
        session.complete_commit(persisted.clone(), vec![]);

        assert_eq!(session.mode(), SessionMode::Viewing);
        assert!(!session.dirty());
        assert_eq!(session.items(), persisted.as_slice());

        // The committed state survives a later edit/discard cycle.
        session.begin_edit().unwrap();
        session.remove_item(persisted[0].id).unwrap();
        session.discard().unwrap();
        assert_eq!(session.items(), persisted.as_slice());
    }
}
