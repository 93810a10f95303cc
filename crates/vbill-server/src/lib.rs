//! HTTP/JSON API for the vbill billing assistant.
//!
//! Exposes a single shared [`BillingSession`](vbill_storage::BillingSession)
//! over REST: utterances, direct bill edits, saved-bill history, owner
//! settings, catalog browsing and speech-capture events. This crate contains
//! the server framework, API schema types, error handling, and route
//! definitions.

pub mod error;
pub mod handlers;
pub mod router;
pub mod schema;
pub mod state;
