//! The [`BillStore`] trait: the persistence port behind a billing session.
//!
//! Two-layer API design:
//! - **Low-level CRUD** methods (owner label, enrollment flags, saved bills)
//!   each touch one record.
//! - **High-level convenience** methods (`load_state`, `save_state`) move the
//!   whole [`PersistedState`] at once.
//!
//! The open bill never passes through this trait.

use std::collections::BTreeMap;

use vbill_core::{BillId, SavedBill};

use crate::error::StorageError;
use crate::types::PersistedState;

/// The storage contract for billing history and owner settings.
///
/// Synchronous; a session owns its store exclusively.
pub trait BillStore {
    // -------------------------------------------------------------------
    // Owner settings
    // -------------------------------------------------------------------

    /// The stored owner label, or an empty string if none was set.
    fn owner_label(&self) -> Result<String, StorageError>;

    fn set_owner_label(&mut self, label: &str) -> Result<(), StorageError>;

    /// Enrollment flags keyed by lowercased owner label.
    fn enrollment_flags(&self) -> Result<BTreeMap<String, bool>, StorageError>;

    fn set_enrollment(&mut self, owner: &str, enrolled: bool) -> Result<(), StorageError>;

    // -------------------------------------------------------------------
    // Saved bill CRUD
    // -------------------------------------------------------------------

    /// Stores a new saved bill as the most recent history entry.
    ///
    /// Fails with [`StorageError::DuplicateBill`] if the id is already stored.
    fn append_bill(&mut self, bill: &SavedBill) -> Result<(), StorageError>;

    fn get_bill(&self, id: BillId) -> Result<SavedBill, StorageError>;

    fn delete_bill(&mut self, id: BillId) -> Result<(), StorageError>;

    /// All saved bills, most recent first, with line totals recomputed.
    fn list_bills(&self) -> Result<Vec<SavedBill>, StorageError>;

    // -------------------------------------------------------------------
    // High-level convenience methods
    // -------------------------------------------------------------------

    /// Loads the full persisted state.
    fn load_state(&self) -> Result<PersistedState, StorageError> {
        Ok(PersistedState {
            owner_label: self.owner_label()?,
            history: self.list_bills()?,
            enrollment_flags: self.enrollment_flags()?,
        })
    }

    /// Replaces everything stored with `state`.
    fn save_state(&mut self, state: &PersistedState) -> Result<(), StorageError>;
}

/// Lets a session hold a boxed store chosen at runtime.
impl<T: BillStore + ?Sized> BillStore for Box<T> {
    fn owner_label(&self) -> Result<String, StorageError> {
        (**self).owner_label()
    }

    fn set_owner_label(&mut self, label: &str) -> Result<(), StorageError> {
        (**self).set_owner_label(label)
    }

    fn enrollment_flags(&self) -> Result<BTreeMap<String, bool>, StorageError> {
        (**self).enrollment_flags()
    }

    fn set_enrollment(&mut self, owner: &str, enrolled: bool) -> Result<(), StorageError> {
        (**self).set_enrollment(owner, enrolled)
    }

    fn append_bill(&mut self, bill: &SavedBill) -> Result<(), StorageError> {
        (**self).append_bill(bill)
    }

    fn get_bill(&self, id: BillId) -> Result<SavedBill, StorageError> {
        (**self).get_bill(id)
    }

    fn delete_bill(&mut self, id: BillId) -> Result<(), StorageError> {
        (**self).delete_bill(id)
    }

    fn list_bills(&self) -> Result<Vec<SavedBill>, StorageError> {
        (**self).list_bills()
    }

    fn load_state(&self) -> Result<PersistedState, StorageError> {
        (**self).load_state()
    }

    fn save_state(&mut self, state: &PersistedState) -> Result<(), StorageError> {
        (**self).save_state(state)
    }
}
