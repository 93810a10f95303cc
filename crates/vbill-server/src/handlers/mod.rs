//! HTTP handler modules for the vbill API.
//!
//! Each sub-module implements thin handlers that parse requests, acquire the
//! session lock, delegate to [`BillingSession`](vbill_storage::BillingSession),
//! and return JSON responses. No billing logic lives in handlers.

pub mod bill;
pub mod capture;
pub mod catalog;
pub mod history;
pub mod owner;
pub mod utterances;
