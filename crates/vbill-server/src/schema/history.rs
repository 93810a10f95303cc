//! Saved-bill history response types.

use serde::Serialize;

use vbill_core::SavedBill;

/// Saved bills, most recent first.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryResponse {
    pub bills: Vec<SavedBill>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteBillResponse {
    pub deleted: SavedBill,
}
