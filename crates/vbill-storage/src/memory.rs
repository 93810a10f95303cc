//! In-memory implementation of [`BillStore`].
//!
//! [`InMemoryStore`] is a first-class backend for tests and ephemeral
//! sessions. It keeps the same ordering and duplicate rules as the SQLite
//! backend.

use std::collections::BTreeMap;

use vbill_core::{BillId, SavedBill};

use crate::error::StorageError;
use crate::traits::BillStore;
use crate::types::{enrollment_key, PersistedState};

/// Vec/BTreeMap-backed store. History is kept most recent first.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    owner_label: String,
    history: Vec<SavedBill>,
    enrollment: BTreeMap<String, bool>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-populated with `state`.
    pub fn with_state(state: PersistedState) -> Self {
        InMemoryStore {
            owner_label: state.owner_label,
            history: state.history,
            enrollment: state.enrollment_flags,
        }
    }

    fn position(&self, id: BillId) -> Result<usize, StorageError> {
        self.history
            .iter()
            .position(|bill| bill.id == id)
            .ok_or(StorageError::BillNotFound(id))
    }
}

impl BillStore for InMemoryStore {
    fn owner_label(&self) -> Result<String, StorageError> {
        Ok(self.owner_label.clone())
    }

    fn set_owner_label(&mut self, label: &str) -> Result<(), StorageError> {
        self.owner_label = label.trim().to_string();
        Ok(())
    }

    fn enrollment_flags(&self) -> Result<BTreeMap<String, bool>, StorageError> {
        Ok(self.enrollment.clone())
    }

    fn set_enrollment(&mut self, owner: &str, enrolled: bool) -> Result<(), StorageError> {
        self.enrollment.insert(enrollment_key(owner), enrolled);
        Ok(())
    }

    fn append_bill(&mut self, bill: &SavedBill) -> Result<(), StorageError> {
        if self.history.iter().any(|b| b.id == bill.id) {
            return Err(StorageError::DuplicateBill(bill.id));
        }
        self.history.insert(0, bill.clone());
        Ok(())
    }

    fn get_bill(&self, id: BillId) -> Result<SavedBill, StorageError> {
        let index = self.position(id)?;
        Ok(self.history[index].clone().hydrated())
    }

    fn delete_bill(&mut self, id: BillId) -> Result<(), StorageError> {
        let index = self.position(id)?;
        self.history.remove(index);
        Ok(())
    }

    fn list_bills(&self) -> Result<Vec<SavedBill>, StorageError> {
        Ok(self.history.iter().cloned().map(SavedBill::hydrated).collect())
    }

    fn save_state(&mut self, state: &PersistedState) -> Result<(), StorageError> {
        *self = InMemoryStore::with_state(state.clone());
        Ok(())
    }
}
