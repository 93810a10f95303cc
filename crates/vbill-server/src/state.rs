//! Application state with a shared `BillingSession`.
//!
//! [`AppState`] wraps the session in `Arc<tokio::sync::Mutex<>>` for use with
//! axum handlers, so every ledger transition is serialized. The session holds
//! a `rusqlite::Connection`, which is `!Sync`, so a `Mutex` rather than an
//! `RwLock`.

use std::sync::Arc;

use vbill_core::Catalog;
use vbill_storage::{BillStore, BillingSession, InMemoryStore, SqliteStore};

use crate::error::ApiError;

/// The session type the server drives; the store is picked at startup.
pub type Session = BillingSession<Box<dyn BillStore + Send>>;

/// Shared application state for the HTTP server.
#[derive(Clone)]
pub struct AppState {
    /// The single billing session. Capture state lives behind the same lock.
    pub session: Arc<tokio::sync::Mutex<Session>>,
}

impl AppState {
    /// Creates an `AppState` whose session persists to the SQLite database
    /// at `db_path`.
    pub fn new(db_path: &str, catalog: Catalog) -> Result<Self, ApiError> {
        let store = SqliteStore::new(db_path)?;
        Self::with_store(Box::new(store), catalog)
    }

    /// Creates an `AppState` over an in-memory store with the embedded
    /// catalog (for testing).
    pub fn in_memory() -> Result<Self, ApiError> {
        Self::with_store(Box::new(InMemoryStore::new()), Catalog::builtin()?)
    }

    pub fn with_store(store: Box<dyn BillStore + Send>, catalog: Catalog) -> Result<Self, ApiError> {
        let session = BillingSession::open(store, Arc::new(catalog))?;
        Ok(AppState {
            session: Arc::new(tokio::sync::Mutex::new(session)),
        })
    }
}

/// Loads the catalog from `path`, or the embedded one when `path` is `None`.
pub fn load_catalog(path: Option<&str>) -> Result<Catalog, ApiError> {
    match path {
        Some(path) => {
            let document = std::fs::read_to_string(path).map_err(|err| {
                ApiError::InternalError(format!("cannot read catalog '{}': {}", path, err))
            })?;
            Ok(Catalog::from_json(&document)?)
        }
        None => Ok(Catalog::builtin()?),
    }
}
