//! Open-bill request/response types.

use serde::{Deserialize, Serialize};

use vbill_core::LineItem;
use vbill_storage::Notice;

use crate::state::Session;

/// The open bill as shown to the user.
#[derive(Debug, Clone, Serialize)]
pub struct BillView {
    pub items: Vec<LineItem>,
    pub total: f64,
}

impl BillView {
    pub fn of(session: &Session) -> Self {
        BillView {
            items: session.items().to_vec(),
            total: session.total(),
        }
    }
}

/// Request to add (or replace) an item directly, bypassing the parser.
#[derive(Debug, Clone, Deserialize)]
pub struct AddItemRequest {
    /// Any catalog surface form; stored under its canonical id.
    pub name: String,
    pub quantity: f64,
    /// Defaults to "pcs".
    #[serde(default)]
    pub unit: Option<String>,
    pub unit_price: f64,
}

/// Response for a single bill transition.
#[derive(Debug, Clone, Serialize)]
pub struct NoticeResponse {
    pub notice: Notice,
    /// Rendered user-facing message.
    pub message: String,
    pub bill: BillView,
}

impl NoticeResponse {
    pub fn new(notice: Notice, session: &Session) -> Self {
        NoticeResponse {
            message: notice.to_string(),
            notice,
            bill: BillView::of(session),
        }
    }
}
