//! Core of the vbill point-of-sale assistant: turns bilingual (English /
//! Tamil) utterances into billing commands and applies them to a ledger.
//!
//! # Modules
//!
//! - [`catalog`]: bilingual item dictionary and exact-match resolution
//! - [`normalize`]: case folding and spoken-numeral substitution
//! - [`segment`]: clause splitting on conjunction markers
//! - [`extract`]: price / quantity / item extraction for add clauses
//! - [`parser`]: per-clause intent classification
//! - [`ledger`]: open bill and saved-bill history state machine
//! - [`capture`]: speech-capture event state machine

pub mod bill;
pub mod capture;
pub mod catalog;
pub mod command;
pub mod error;
pub mod extract;
pub mod id;
pub mod ledger;
pub mod normalize;
pub mod parser;
pub mod segment;

// Re-export commonly used types
pub use bill::{round2, LineItem, NewItem, SavedBill, DEFAULT_UNIT};
pub use capture::{CaptureEvent, CaptureMachine, CaptureState};
pub use catalog::{Catalog, CatalogEntry, Category};
pub use command::{DropReason, ParsedCommand, SegmentOutcome, SegmentTrace};
pub use error::{CoreError, LedgerError};
pub use id::{BillId, ItemId, LineItemId};
pub use ledger::{AddOutcome, Ledger};
pub use parser::CommandParser;
