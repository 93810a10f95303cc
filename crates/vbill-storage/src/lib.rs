//! Persistence and session layer for vbill.
//!
//! Provides the [`BillStore`] trait defining the storage contract, the
//! [`InMemoryStore`] and [`SqliteStore`] backends, and [`BillingSession`],
//! which owns a ledger and writes saved bills through a store.
//!
//! # Architecture
//!
//! The storage layer has a two-layer API:
//! - **Low-level CRUD** methods (append/get/delete saved bills, owner label,
//!   enrollment flags) are what a session calls as it goes.
//! - **High-level convenience** methods (`load_state`, `save_state`) move the
//!   whole [`PersistedState`] for startup and bulk import.
//!
//! # Modules
//!
//! - [`error`]: StorageError enum with all failure modes
//! - [`types`]: PersistedState, the shape that survives a restart
//! - [`traits`]: BillStore trait definition
//! - [`memory`]: InMemoryStore implementation
//! - [`schema`]: migration setup and connection pragmas
//! - [`sqlite`]: SqliteStore implementation
//! - [`notice`]: user-facing feedback for applied commands
//! - [`session`]: BillingSession

pub mod error;
pub mod memory;
pub mod notice;
pub mod schema;
pub mod session;
pub mod sqlite;
pub mod traits;
pub mod types;

// Re-export key types for ergonomic use.
pub use error::StorageError;
pub use memory::InMemoryStore;
pub use notice::Notice;
pub use session::{BillingSession, UtteranceOutcome};
pub use sqlite::SqliteStore;
pub use traits::BillStore;
pub use types::{enrollment_key, PersistedState};
