//! Speech-capture event batch types.

use serde::{Deserialize, Serialize};

use vbill_core::{CaptureEvent, CaptureState};
use vbill_storage::Notice;

use super::bill::BillView;

/// Largest number of events accepted in one request.
pub const MAX_CAPTURE_BATCH: usize = 64;

#[derive(Debug, Clone, Deserialize)]
pub struct CaptureRequest {
    pub events: Vec<CaptureEvent>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CaptureResponse {
    /// Capture state after the whole batch.
    pub state: CaptureState,
    /// Finalized transcripts forwarded to the parser, in order.
    pub transcripts: Vec<String>,
    pub notices: Vec<Notice>,
    pub bill: BillView,
}
