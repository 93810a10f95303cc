//! The billing ledger state machine.
//!
//! [`Ledger`] holds the open bill, its running total, and the saved-bill
//! history (most recent first). Every mutating transition leaves
//! `total == round2(sum of line totals)`; recoverable conditions come back as
//! [`LedgerError`] with state untouched.
//!
//! The open bill is never serialized with the history: a ledger restored via
//! [`Ledger::with_history`] always starts with an empty bill.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::bill::{sum_line_totals, LineItem, NewItem, SavedBill};
use crate::error::LedgerError;
use crate::id::BillId;

/// Result of [`Ledger::add_item`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "item", rename_all = "snake_case")]
pub enum AddOutcome {
    /// A new line was appended.
    Added(LineItem),
    /// An existing line with the same name had its values replaced.
    Updated(LineItem),
}

impl AddOutcome {
    pub fn item(&self) -> &LineItem {
        match self {
            AddOutcome::Added(item) | AddOutcome::Updated(item) => item,
        }
    }
}

/// Open bill plus append-only history.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    items: Vec<LineItem>,
    total: f64,
    history: Vec<SavedBill>,
}

impl Ledger {
    /// An empty ledger with no history.
    pub fn new() -> Self {
        Self::default()
    }

    /// A ledger over previously saved bills, most recent first. Line totals
    /// are recomputed; the open bill starts empty.
    pub fn with_history(history: Vec<SavedBill>) -> Self {
        Ledger {
            items: Vec::new(),
            total: 0.0,
            history: history.into_iter().map(SavedBill::hydrated).collect(),
        }
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn history(&self) -> &[SavedBill] {
        &self.history
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Looks up an open line by name, ignoring case.
    pub fn item(&self, name: &str) -> Option<&LineItem> {
        self.items.iter().find(|item| item.is_named(name))
    }

    pub fn saved_bill(&self, id: BillId) -> Option<&SavedBill> {
        self.history.iter().find(|bill| bill.id == id)
    }

    /// Adds an item, or replaces quantity, unit and price of the line that
    /// already carries this name. Latest values win; quantities are not summed.
    pub fn add_item(&mut self, item: NewItem) -> Result<AddOutcome, LedgerError> {
        item.validate()
            .map_err(|reason| LedgerError::InvalidItem { reason })?;

        let outcome = match self.items.iter_mut().find(|line| line.is_named(&item.name)) {
            Some(line) => {
                line.replace_values(item);
                AddOutcome::Updated(line.clone())
            }
            None => {
                let line = LineItem::from_new(item);
                self.items.push(line.clone());
                AddOutcome::Added(line)
            }
        };
        self.recompute_total();
        Ok(outcome)
    }

    /// Removes the line with this name, ignoring case.
    pub fn remove_item(&mut self, name: &str) -> Result<LineItem, LedgerError> {
        let index = self
            .items
            .iter()
            .position(|line| line.is_named(name))
            .ok_or_else(|| LedgerError::ItemNotFound {
                name: name.trim().to_string(),
            })?;
        let removed = self.items.remove(index);
        self.recompute_total();
        Ok(removed)
    }

    /// Clears the open bill. Returns how many lines were dropped; zero on an
    /// already-empty bill.
    pub fn reset(&mut self) -> usize {
        let cleared = self.items.len();
        self.items.clear();
        self.total = 0.0;
        cleared
    }

    /// Reads the running total. Never mutates.
    pub fn calculate(&self) -> f64 {
        self.total
    }

    /// Builds the saved-bill snapshot of the open bill without changing
    /// anything. Pair with [`Ledger::commit_snapshot`].
    pub fn snapshot(
        &self,
        owner_label: &str,
        created_at: DateTime<Utc>,
    ) -> Result<SavedBill, LedgerError> {
        if self.items.is_empty() {
            return Err(LedgerError::EmptyBill);
        }
        Ok(SavedBill {
            id: BillId::generate(),
            owner_label: owner_label.to_string(),
            items: self.items.clone(),
            total_amount: self.total,
            created_at,
        })
    }

    /// Prepends a snapshot to history and clears the open bill.
    pub fn commit_snapshot(&mut self, bill: SavedBill) {
        self.history.insert(0, bill);
        self.reset();
    }

    /// Snapshot plus commit in one step. Returns the saved bill.
    pub fn save_bill(&mut self, owner_label: &str) -> Result<SavedBill, LedgerError> {
        let bill = self.snapshot(owner_label, Utc::now())?;
        self.commit_snapshot(bill.clone());
        Ok(bill)
    }

    /// Deletes one saved bill from history.
    pub fn delete_saved_bill(&mut self, id: BillId) -> Result<SavedBill, LedgerError> {
        let index = self
            .history
            .iter()
            .position(|bill| bill.id == id)
            .ok_or(LedgerError::BillNotFound { id })?;
        Ok(self.history.remove(index))
    }

    fn recompute_total(&mut self) {
        self.total = sum_line_totals(&self.items);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bill::round2;

    fn item(name: &str, quantity: f64, unit: &str, price: f64) -> NewItem {
        NewItem::new(name, quantity, unit, price)
    }

    #[test]
    fn add_appends_and_totals() {
        let mut ledger = Ledger::new();
        let outcome = ledger.add_item(item("rice", 2.0, "kg", 60.0)).unwrap();
        assert!(matches!(outcome, AddOutcome::Added(_)));
        ledger.add_item(item("dal", 1.0, "kg", 110.5)).unwrap();

        assert_eq!(ledger.items().len(), 2);
        assert_eq!(ledger.items()[0].name, "rice");
        assert_eq!(ledger.total(), 230.5);
    }

    #[test]
    fn re_adding_replaces_latest_values() {
        let mut ledger = Ledger::new();
        let first = ledger.add_item(item("rice", 2.0, "kg", 60.0)).unwrap();
        let second = ledger.add_item(item("RICE", 5.0, "pkt", 20.0)).unwrap();

        assert!(matches!(second, AddOutcome::Updated(_)));
        assert_eq!(ledger.items().len(), 1);
        let line = &ledger.items()[0];
        assert_eq!(line.id, first.item().id);
        assert_eq!(line.name, "rice");
        assert_eq!(line.quantity, 5.0);
        assert_eq!(line.unit, "pkt");
        assert_eq!(line.unit_price, 20.0);
        assert_eq!(ledger.total(), 100.0);
    }

    #[test]
    fn invalid_item_leaves_state_unchanged() {
        let mut ledger = Ledger::new();
        ledger.add_item(item("rice", 1.0, "kg", 50.0)).unwrap();
        let err = ledger.add_item(item("rice", 0.0, "kg", 10.0)).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidItem { .. }));
        assert_eq!(ledger.items()[0].quantity, 1.0);
        assert_eq!(ledger.total(), 50.0);
    }

    #[test]
    fn overflowing_line_total_is_rejected() {
        let mut ledger = Ledger::new();
        ledger.add_item(item("rice", 2.0, "kg", 60.0)).unwrap();

        let err = ledger.add_item(item("rice", 1e307, "kg", 10.0)).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidItem { .. }));
        let err = ledger.add_item(item("dal", 1e306, "kg", 1.0)).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidItem { .. }));

        assert_eq!(ledger.items().len(), 1);
        assert_eq!(ledger.items()[0].quantity, 2.0);
        assert_eq!(ledger.total(), 120.0);
        assert!(ledger.total().is_finite());
    }

    #[test]
    fn remove_is_case_insensitive() {
        let mut ledger = Ledger::new();
        ledger.add_item(item("rice", 1.0, "kg", 50.0)).unwrap();
        ledger.add_item(item("dal", 1.0, "kg", 100.0)).unwrap();

        let removed = ledger.remove_item("Rice").unwrap();
        assert_eq!(removed.name, "rice");
        assert_eq!(ledger.items().len(), 1);
        assert_eq!(ledger.total(), 100.0);
    }

    #[test]
    fn remove_of_absent_item_is_recoverable() {
        let mut ledger = Ledger::new();
        ledger.add_item(item("dal", 1.0, "kg", 100.0)).unwrap();
        let err = ledger.remove_item("rice").unwrap_err();
        assert_eq!(err, LedgerError::ItemNotFound { name: "rice".into() });
        assert_eq!(ledger.items().len(), 1);
        assert_eq!(ledger.total(), 100.0);
    }

    #[test]
    fn reset_is_idempotent() {
        let mut ledger = Ledger::new();
        ledger.add_item(item("rice", 1.0, "kg", 50.0)).unwrap();
        assert_eq!(ledger.reset(), 1);
        assert!(ledger.is_empty());
        assert_eq!(ledger.reset(), 0);
        assert!(ledger.is_empty());
        assert_eq!(ledger.total(), 0.0);
    }

    #[test]
    fn save_snapshots_and_clears() {
        let mut ledger = Ledger::new();
        ledger.add_item(item("rice", 2.0, "kg", 60.0)).unwrap();
        ledger.add_item(item("soap", 3.0, "pcs", 33.33)).unwrap();

        let bill = ledger.save_bill("Murugan Stores").unwrap();
        assert_eq!(bill.items.len(), 2);
        assert_eq!(bill.total_amount, 219.99);
        assert_eq!(bill.total_amount, round2(bill.items.iter().map(|i| i.line_total).sum()));
        assert_eq!(bill.owner_label, "Murugan Stores");

        assert!(ledger.is_empty());
        assert_eq!(ledger.total(), 0.0);
        assert_eq!(ledger.history().len(), 1);
        assert_eq!(ledger.history()[0], bill);

        assert_eq!(ledger.save_bill("Murugan Stores"), Err(LedgerError::EmptyBill));
        assert_eq!(ledger.history().len(), 1);
    }

    #[test]
    fn history_is_most_recent_first() {
        let mut ledger = Ledger::new();
        ledger.add_item(item("rice", 1.0, "kg", 50.0)).unwrap();
        let older = ledger.save_bill("shop").unwrap();
        ledger.add_item(item("dal", 1.0, "kg", 90.0)).unwrap();
        let newer = ledger.save_bill("shop").unwrap();

        let ids: Vec<_> = ledger.history().iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![newer.id, older.id]);
    }

    #[test]
    fn saved_bill_is_a_deep_copy() {
        let mut ledger = Ledger::new();
        ledger.add_item(item("rice", 1.0, "kg", 50.0)).unwrap();
        ledger.save_bill("shop").unwrap();
        ledger.add_item(item("rice", 9.0, "kg", 1.0)).unwrap();
        assert_eq!(ledger.history()[0].items[0].quantity, 1.0);
    }

    #[test]
    fn snapshot_does_not_mutate() {
        let mut ledger = Ledger::new();
        ledger.add_item(item("rice", 1.0, "kg", 50.0)).unwrap();
        let bill = ledger.snapshot("shop", Utc::now()).unwrap();
        assert_eq!(ledger.items().len(), 1);
        assert!(ledger.history().is_empty());

        ledger.commit_snapshot(bill.clone());
        assert!(ledger.is_empty());
        assert_eq!(ledger.saved_bill(bill.id), Some(&bill));
    }

    #[test]
    fn delete_saved_bill() {
        let mut ledger = Ledger::new();
        ledger.add_item(item("rice", 1.0, "kg", 50.0)).unwrap();
        let bill = ledger.save_bill("shop").unwrap();

        let missing = BillId::generate();
        assert_eq!(
            ledger.delete_saved_bill(missing),
            Err(LedgerError::BillNotFound { id: missing })
        );
        assert_eq!(ledger.delete_saved_bill(bill.id).unwrap().id, bill.id);
        assert!(ledger.history().is_empty());
    }

    #[test]
    fn restored_ledger_has_empty_bill() {
        let mut ledger = Ledger::new();
        ledger.add_item(item("rice", 1.0, "kg", 50.0)).unwrap();
        ledger.save_bill("shop").unwrap();
        ledger.add_item(item("dal", 1.0, "kg", 90.0)).unwrap();

        let restored = Ledger::with_history(ledger.history().to_vec());
        assert!(restored.is_empty());
        assert_eq!(restored.total(), 0.0);
        assert_eq!(restored.history().len(), 1);
    }

    #[test]
    fn calculate_is_read_only() {
        let mut ledger = Ledger::new();
        ledger.add_item(item("rice", 1.5, "kg", 41.0)).unwrap();
        assert_eq!(ledger.calculate(), 61.5);
        assert_eq!(ledger.items().len(), 1);
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Op {
            Add(usize, f64, f64),
            Remove(usize),
            Reset,
        }

        const NAMES: &[&str] = &["rice", "Rice", "dal", "soap", "milk"];

        /// Mostly everyday amounts, sometimes large enough to overflow a
        /// line total.
        fn amount(low: f64, high: f64) -> impl Strategy<Value = f64> {
            prop_oneof![
                8 => low..high,
                1 => 1e10f64..1e15,
                1 => 1e300f64..f64::MAX,
            ]
        }

        fn op() -> impl Strategy<Value = Op> {
            prop_oneof![
                4 => (0..NAMES.len(), amount(0.01, 100.0), amount(0.0, 1000.0))
                    .prop_map(|(n, q, p)| Op::Add(n, q, p)),
                2 => (0..NAMES.len()).prop_map(Op::Remove),
                1 => Just(Op::Reset),
            ]
        }

        proptest! {
            #[test]
            fn total_always_matches_lines(ops in proptest::collection::vec(op(), 0..40)) {
                let mut ledger = Ledger::new();
                for op in ops {
                    match op {
                        Op::Add(n, q, p) => {
                            let before = ledger.items().to_vec();
                            if let Err(err) = ledger.add_item(NewItem::new(NAMES[n], q, "kg", p)) {
                                prop_assert!(matches!(err, LedgerError::InvalidItem { .. }), "expected InvalidItem, got {:?}", err);
                                prop_assert_eq!(ledger.items(), before.as_slice());
                            }
                        }
                        Op::Remove(n) => {
                            let _ = ledger.remove_item(NAMES[n]);
                        }
                        Op::Reset => {
                            ledger.reset();
                        }
                    }
                    let expected = round2(ledger.items().iter().map(|i| i.line_total).sum());
                    prop_assert_eq!(ledger.total(), expected);
                    prop_assert!(ledger.total().is_finite());

                    let mut names: Vec<String> =
                        ledger.items().iter().map(|i| i.name.to_lowercase()).collect();
                    names.sort();
                    names.dedup();
                    prop_assert_eq!(names.len(), ledger.items().len());
                }
            }
        }
    }
}
