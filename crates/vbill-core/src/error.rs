//! Core error types for vbill-core.
//!
//! [`CoreError`] covers catalog loading. [`LedgerError`] covers the
//! recoverable ledger conditions; callers turn those into user notices rather
//! than treating them as faults.

use thiserror::Error;

use crate::id::BillId;

/// Errors produced while building a catalog.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Two catalog entries claim the same surface form.
    #[error("surface form '{form}' maps to both '{first}' and '{second}'")]
    DuplicateSurfaceForm {
        form: String,
        first: String,
        second: String,
    },

    /// Two catalog entries share a canonical id.
    #[error("duplicate canonical id: '{id}'")]
    DuplicateItem { id: String },

    /// The dictionary document is structurally valid JSON but semantically wrong.
    #[error("invalid catalog: {reason}")]
    InvalidCatalog { reason: String },

    /// The dictionary document could not be decoded.
    #[error("catalog decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Recoverable conditions raised by ledger transitions.
///
/// Every variant leaves the ledger unchanged.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// Remove of an item that is not in the open bill.
    #[error("could not find \"{name}\" in the current bill")]
    ItemNotFound { name: String },

    /// Save was requested while the open bill has no items.
    #[error("cannot save an empty bill")]
    EmptyBill,

    /// A history entry with this id does not exist.
    #[error("saved bill not found: {id}")]
    BillNotFound { id: BillId },

    /// The item violates a line-item invariant.
    #[error("invalid item: {reason}")]
    InvalidItem { reason: String },
}
