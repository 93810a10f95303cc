//! A billing session: parser, ledger and persistence wired together.
//!
//! [`BillingSession`] is the single owner of the open bill. Utterances are
//! parsed, every resulting command is applied in order, and each application
//! yields one [`Notice`]. Saved bills, the owner label and enrollment flags go
//! through the injected [`BillStore`]; the open bill never does.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;

use vbill_core::{
    AddOutcome, BillId, CaptureEvent, CaptureMachine, CaptureState, Catalog, CommandParser,
    Ledger, LedgerError, LineItem, NewItem, ParsedCommand, SavedBill,
};

use crate::error::StorageError;
use crate::notice::Notice;
use crate::traits::BillStore;
use crate::types::enrollment_key;

/// What one utterance did to the session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UtteranceOutcome {
    pub utterance: String,
    /// Commands applied, in segment order. Empty when nothing parsed.
    pub commands: Vec<ParsedCommand>,
    /// One notice per command, or a single `NotUnderstood`.
    pub notices: Vec<Notice>,
}

impl UtteranceOutcome {
    pub fn understood(&self) -> bool {
        !self.commands.is_empty()
    }
}

pub struct BillingSession<S: BillStore> {
    store: S,
    parser: CommandParser,
    ledger: Ledger,
    owner_label: String,
    enrollment: BTreeMap<String, bool>,
    capture: CaptureMachine,
}

impl<S: BillStore> BillingSession<S> {
    /// Opens a session over `store`, restoring history, owner label and
    /// enrollment flags. The open bill starts empty.
    pub fn open(store: S, catalog: Arc<Catalog>) -> Result<Self, StorageError> {
        let state = store.load_state()?;
        tracing::debug!(
            saved_bills = state.history.len(),
            owner = %state.owner_label,
            "opened billing session"
        );
        Ok(BillingSession {
            store,
            parser: CommandParser::new(catalog),
            ledger: Ledger::with_history(state.history),
            owner_label: state.owner_label,
            enrollment: state.enrollment_flags,
            capture: CaptureMachine::new(),
        })
    }

    // -------------------------------------------------------------------
    // Utterances and commands
    // -------------------------------------------------------------------

    /// Parses `text` and applies every command in order.
    pub fn handle_utterance(&mut self, text: &str) -> Result<UtteranceOutcome, StorageError> {
        let Some(commands) = self.parser.parse(text) else {
            tracing::debug!(utterance = text, "utterance not understood");
            return Ok(UtteranceOutcome {
                utterance: text.to_string(),
                commands: Vec::new(),
                notices: vec![Notice::NotUnderstood],
            });
        };

        let mut notices = Vec::with_capacity(commands.len());
        for command in &commands {
            notices.push(self.apply(command)?);
        }
        Ok(UtteranceOutcome {
            utterance: text.to_string(),
            commands,
            notices,
        })
    }

    /// Applies one command to the ledger. Only `Save` can fail, and only when
    /// the store does.
    pub fn apply(&mut self, command: &ParsedCommand) -> Result<Notice, StorageError> {
        let notice = match command {
            ParsedCommand::Add {
                item,
                quantity,
                unit,
                unit_price,
            } => self.add_item(NewItem::new(item.as_str(), *quantity, unit.as_str(), *unit_price)),
            ParsedCommand::Remove { item } => self.remove_item(item.as_str()),
            ParsedCommand::Reset => self.reset_bill(),
            ParsedCommand::Save => self.save_bill()?,
            ParsedCommand::Calculate => self.calculate(),
        };
        Ok(notice)
    }

    pub fn add_item(&mut self, item: NewItem) -> Notice {
        let name = item.name.clone();
        match self.ledger.add_item(item) {
            Ok(AddOutcome::Added(item)) => {
                tracing::debug!(item = %item.name, total = self.ledger.total(), "item added");
                Notice::ItemAdded { item }
            }
            Ok(AddOutcome::Updated(item)) => {
                tracing::debug!(item = %item.name, total = self.ledger.total(), "item updated");
                Notice::ItemUpdated { item }
            }
            Err(err) => Notice::from_ledger_error(err, &name),
        }
    }

    pub fn remove_item(&mut self, name: &str) -> Notice {
        match self.ledger.remove_item(name) {
            Ok(item) => {
                tracing::debug!(item = %item.name, total = self.ledger.total(), "item removed");
                Notice::ItemRemoved { item }
            }
            Err(err) => Notice::from_ledger_error(err, name),
        }
    }

    pub fn reset_bill(&mut self) -> Notice {
        let cleared = self.ledger.reset();
        tracing::debug!(cleared, "bill cleared");
        Notice::BillCleared { cleared }
    }

    /// Persists the open bill, then commits it to history. If the store
    /// fails the open bill is left as it was.
    pub fn save_bill(&mut self) -> Result<Notice, StorageError> {
        let bill = match self.ledger.snapshot(&self.owner_label, Utc::now()) {
            Ok(bill) => bill,
            Err(LedgerError::EmptyBill) => return Ok(Notice::CannotSaveEmptyBill),
            Err(err) => return Ok(Notice::from_ledger_error(err, "")),
        };

        if let Err(err) = self.store.append_bill(&bill) {
            tracing::warn!(bill = %bill.id, error = %err, "failed to persist saved bill");
            return Err(err);
        }

        let notice = Notice::BillSaved {
            bill_id: bill.id,
            total: bill.total_amount,
            item_count: bill.items.len(),
        };
        tracing::info!(bill = %bill.id, total = bill.total_amount, items = bill.items.len(), "bill saved");
        self.ledger.commit_snapshot(bill);
        Ok(notice)
    }

    pub fn calculate(&self) -> Notice {
        Notice::TotalRequested {
            total: self.ledger.calculate(),
        }
    }

    // -------------------------------------------------------------------
    // History and owner settings
    // -------------------------------------------------------------------

    /// Deletes a saved bill. Returns `None` when no such bill exists.
    pub fn delete_saved_bill(&mut self, id: BillId) -> Result<Option<SavedBill>, StorageError> {
        if self.ledger.saved_bill(id).is_none() {
            return Ok(None);
        }
        match self.store.delete_bill(id) {
            Ok(()) | Err(StorageError::BillNotFound(_)) => {}
            Err(err) => {
                tracing::warn!(bill = %id, error = %err, "failed to delete saved bill");
                return Err(err);
            }
        }
        tracing::debug!(bill = %id, "saved bill deleted");
        Ok(self.ledger.delete_saved_bill(id).ok())
    }

    pub fn set_owner_label(&mut self, label: &str) -> Result<(), StorageError> {
        let label = label.trim();
        self.store.set_owner_label(label).inspect_err(|err| {
            tracing::warn!(error = %err, "failed to persist owner label");
        })?;
        self.owner_label = label.to_string();
        Ok(())
    }

    pub fn set_enrollment(&mut self, owner: &str, enrolled: bool) -> Result<(), StorageError> {
        self.store.set_enrollment(owner, enrolled).inspect_err(|err| {
            tracing::warn!(error = %err, "failed to persist enrollment flag");
        })?;
        self.enrollment.insert(enrollment_key(owner), enrolled);
        Ok(())
    }

    /// Whether the current owner label has completed voice enrollment.
    pub fn is_enrolled(&self) -> bool {
        self.enrollment
            .get(&enrollment_key(&self.owner_label))
            .copied()
            .unwrap_or(false)
    }

    // -------------------------------------------------------------------
    // Speech capture
    // -------------------------------------------------------------------

    /// Routes one capture event. A finalized transcript is handled as an
    /// utterance; anything else only moves the capture state.
    pub fn feed_capture(
        &mut self,
        event: CaptureEvent,
    ) -> Result<Option<UtteranceOutcome>, StorageError> {
        match self.capture.handle(event) {
            Some(transcript) => self.handle_utterance(&transcript).map(Some),
            None => Ok(None),
        }
    }

    // -------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------

    pub fn items(&self) -> &[LineItem] {
        self.ledger.items()
    }

    pub fn total(&self) -> f64 {
        self.ledger.total()
    }

    /// Saved bills, most recent first.
    pub fn history(&self) -> &[SavedBill] {
        self.ledger.history()
    }

    pub fn saved_bill(&self, id: BillId) -> Option<&SavedBill> {
        self.ledger.saved_bill(id)
    }

    pub fn owner_label(&self) -> &str {
        &self.owner_label
    }

    pub fn enrollment_flags(&self) -> &BTreeMap<String, bool> {
        &self.enrollment
    }

    pub fn capture_state(&self) -> CaptureState {
        self.capture.state()
    }

    pub fn interim_transcript(&self) -> &str {
        self.capture.interim()
    }

    pub fn parser(&self) -> &CommandParser {
        &self.parser
    }

    pub fn catalog(&self) -> &Catalog {
        self.parser.catalog()
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryStore;
    use crate::sqlite::SqliteStore;
    use crate::types::PersistedState;

    fn catalog() -> Arc<Catalog> {
        Arc::new(Catalog::builtin().unwrap())
    }

    fn session() -> BillingSession<InMemoryStore> {
        BillingSession::open(InMemoryStore::new(), catalog()).unwrap()
    }

    /// Store whose bill writes always fail.
    struct FailingStore(InMemoryStore);

    impl BillStore for FailingStore {
        fn owner_label(&self) -> Result<String, StorageError> {
            self.0.owner_label()
        }
        fn set_owner_label(&mut self, label: &str) -> Result<(), StorageError> {
            self.0.set_owner_label(label)
        }
        fn enrollment_flags(&self) -> Result<BTreeMap<String, bool>, StorageError> {
            self.0.enrollment_flags()
        }
        fn set_enrollment(&mut self, owner: &str, enrolled: bool) -> Result<(), StorageError> {
            self.0.set_enrollment(owner, enrolled)
        }
        fn append_bill(&mut self, _bill: &SavedBill) -> Result<(), StorageError> {
            Err(StorageError::Migration("disk full".into()))
        }
        fn get_bill(&self, id: BillId) -> Result<SavedBill, StorageError> {
            self.0.get_bill(id)
        }
        fn delete_bill(&mut self, id: BillId) -> Result<(), StorageError> {
            self.0.delete_bill(id)
        }
        fn list_bills(&self) -> Result<Vec<SavedBill>, StorageError> {
            self.0.list_bills()
        }
        fn save_state(&mut self, state: &PersistedState) -> Result<(), StorageError> {
            self.0.save_state(state)
        }
    }

    #[test]
    fn add_then_total() {
        let mut session = session();
        let outcome = session.handle_utterance("add rice 2kg 60rs").unwrap();
        assert!(outcome.understood());
        assert!(matches!(outcome.notices[0], Notice::ItemAdded { .. }));
        assert_eq!(session.total(), 120.0);

        let outcome = session.handle_utterance("total").unwrap();
        assert_eq!(outcome.notices, vec![Notice::TotalRequested { total: 120.0 }]);
        assert_eq!(session.items().len(), 1);
    }

    #[test]
    fn repeated_add_reports_update() {
        let mut session = session();
        session.handle_utterance("add rice 2kg 60rs").unwrap();
        let outcome = session.handle_utterance("arisi 3 kg 55 rupees").unwrap();
        assert!(matches!(outcome.notices[0], Notice::ItemUpdated { .. }));
        assert_eq!(session.items().len(), 1);
        assert_eq!(session.total(), 165.0);
    }

    #[test]
    fn unknown_utterance_is_not_understood() {
        let mut session = session();
        let outcome = session.handle_utterance("hello there").unwrap();
        assert!(!outcome.understood());
        assert_eq!(outcome.notices, vec![Notice::NotUnderstood]);
    }

    #[test]
    fn one_notice_per_command() {
        let mut session = session();
        let outcome = session
            .handle_utterance("add rice 2kg 60rs and add dal 1kg 110rs and remove rice")
            .unwrap();
        assert_eq!(outcome.commands.len(), 3);
        assert_eq!(outcome.notices.len(), 3);
        assert!(matches!(outcome.notices[2], Notice::ItemRemoved { .. }));
        assert_eq!(session.total(), 110.0);
    }

    #[test]
    fn overflowing_quantity_is_rejected_and_history_stays_loadable() {
        let store = SqliteStore::in_memory().unwrap();
        let mut session = BillingSession::open(store, catalog()).unwrap();

        let huge = format!("add rice 1{} kg 10 rs", "0".repeat(307));
        let outcome = session.handle_utterance(&huge).unwrap();
        assert_eq!(outcome.commands.len(), 1);
        assert!(matches!(
            outcome.notices[0],
            Notice::ItemRejected { ref name, .. } if name == "rice"
        ));
        assert!(session.items().is_empty());
        assert!(session.total().is_finite());

        let outcome = session.handle_utterance("save").unwrap();
        assert_eq!(outcome.notices, vec![Notice::CannotSaveEmptyBill]);

        session.handle_utterance("add rice 2kg 60rs and save").unwrap();
        let stored = session.store().list_bills().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].total_amount, 120.0);
    }

    #[test]
    fn removing_absent_item_is_a_notice() {
        let mut session = session();
        let outcome = session.handle_utterance("remove rice").unwrap();
        assert_eq!(
            outcome.notices,
            vec![Notice::ItemNotFound {
                name: "rice".into()
            }]
        );
    }

    #[test]
    fn save_persists_and_clears() {
        let mut session = session();
        session.set_owner_label("Murugan Stores").unwrap();
        session.handle_utterance("add rice 2kg 60rs").unwrap();

        let outcome = session.handle_utterance("save").unwrap();
        assert!(matches!(outcome.notices[0], Notice::BillSaved { total, .. } if total == 120.0));
        assert!(session.items().is_empty());
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.history()[0].owner_label, "Murugan Stores");

        let stored = session.store().list_bills().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, session.history()[0].id);

        let outcome = session.handle_utterance("save").unwrap();
        assert_eq!(outcome.notices, vec![Notice::CannotSaveEmptyBill]);
        assert_eq!(session.store().list_bills().unwrap().len(), 1);
    }

    #[test]
    fn failed_save_keeps_open_bill() {
        let mut session = BillingSession::open(FailingStore(InMemoryStore::new()), catalog()).unwrap();
        session.handle_utterance("add rice 2kg 60rs").unwrap();

        assert!(session.handle_utterance("save").is_err());
        assert_eq!(session.items().len(), 1);
        assert_eq!(session.total(), 120.0);
        assert!(session.history().is_empty());
    }

    #[test]
    fn reopen_restores_history_but_not_open_bill() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("till.db");
        let path = path.to_str().unwrap();

        {
            let store = SqliteStore::new(path).unwrap();
            let mut session = BillingSession::open(store, catalog()).unwrap();
            session.set_owner_label("Anbu Traders").unwrap();
            session.handle_utterance("add rice 2kg 60rs and save").unwrap();
            session.handle_utterance("add dal 1kg 110rs").unwrap();
        }

        let session = BillingSession::open(SqliteStore::new(path).unwrap(), catalog()).unwrap();
        assert_eq!(session.owner_label(), "Anbu Traders");
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.history()[0].total_amount, 120.0);
        assert!(session.items().is_empty());
    }

    #[test]
    fn delete_saved_bill() {
        let mut session = session();
        session.handle_utterance("add rice 2kg 60rs and save").unwrap();
        let id = session.history()[0].id;

        let deleted = session.delete_saved_bill(id).unwrap();
        assert_eq!(deleted.map(|bill| bill.id), Some(id));
        assert!(session.history().is_empty());
        assert!(session.store().list_bills().unwrap().is_empty());

        assert_eq!(session.delete_saved_bill(id).unwrap(), None);
    }

    #[test]
    fn enrollment_follows_owner_label() {
        let mut session = session();
        session.set_owner_label("Murugan Stores").unwrap();
        assert!(!session.is_enrolled());

        session.set_enrollment("murugan stores", true).unwrap();
        assert!(session.is_enrolled());

        session.set_owner_label("Anbu Traders").unwrap();
        assert!(!session.is_enrolled());
        assert_eq!(session.store().enrollment_flags().unwrap().len(), 1);
    }

    #[test]
    fn capture_forwards_only_final_transcripts() {
        let mut session = session();
        assert!(session.feed_capture(CaptureEvent::Start).unwrap().is_none());
        assert!(session
            .feed_capture(CaptureEvent::Interim("add rice".into()))
            .unwrap()
            .is_none());
        assert!(session.items().is_empty());

        let outcome = session
            .feed_capture(CaptureEvent::Final("add rice 2kg 60rs".into()))
            .unwrap()
            .unwrap();
        assert!(outcome.understood());
        assert_eq!(session.items().len(), 1);
        assert_eq!(session.capture_state(), CaptureState::Listening);
    }

    #[test]
    fn cancelled_capture_changes_nothing() {
        let mut session = session();
        session.feed_capture(CaptureEvent::Start).unwrap();
        session
            .feed_capture(CaptureEvent::Interim("add rice 2kg 60rs".into()))
            .unwrap();
        assert!(session.feed_capture(CaptureEvent::Cancel).unwrap().is_none());
        assert!(session.items().is_empty());
        assert_eq!(session.capture_state(), CaptureState::Idle);
    }
}
