//! Storage error types for vbill-storage.
//!
//! [`StorageError`] covers backend failures: SQLite, serialization, schema
//! migration, and missing or duplicate saved bills.

use thiserror::Error;

use vbill_core::BillId;

/// Errors produced by storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// JSON serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The SQLite driver reported an error.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Applying schema migrations failed.
    #[error("migration error: {0}")]
    Migration(String),

    /// A saved bill with the given id was not found.
    #[error("saved bill not found: {0}")]
    BillNotFound(BillId),

    /// A saved bill with the given id is already stored.
    #[error("saved bill already stored: {0}")]
    DuplicateBill(BillId),

    /// A stored row could not be turned back into a model value.
    #[error("integrity error: {reason}")]
    IntegrityError { reason: String },
}
