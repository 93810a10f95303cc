//! Utterance and parse request/response types.

use serde::{Deserialize, Serialize};

use vbill_core::{ParsedCommand, SegmentTrace};
use vbill_storage::Notice;

use super::bill::BillView;

/// A finalized transcript to parse (and, for `/utterances`, apply).
#[derive(Debug, Clone, Deserialize)]
pub struct UtteranceRequest {
    pub text: String,
}

/// Response from applying an utterance.
#[derive(Debug, Clone, Serialize)]
pub struct UtteranceResponse {
    pub commands: Vec<ParsedCommand>,
    pub notices: Vec<Notice>,
    /// Rendered notices, in the same order.
    pub messages: Vec<String>,
    pub bill: BillView,
}

/// Response from a dry-run parse. Nothing is applied.
#[derive(Debug, Clone, Serialize)]
pub struct ParseResponse {
    /// `None` when no segment produced a command.
    pub commands: Option<Vec<ParsedCommand>>,
    pub segments: Vec<SegmentTrace>,
}
