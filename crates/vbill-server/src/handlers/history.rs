//! Saved-bill history handlers.

use axum::extract::{Path, State};
use axum::Json;

use vbill_core::{BillId, SavedBill};

use crate::error::ApiError;
use crate::schema::history::{DeleteBillResponse, HistoryResponse};
use crate::state::AppState;

fn parse_bill_id(raw: &str) -> Result<BillId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest(format!("invalid bill id '{}'", raw)))
}

/// Lists saved bills, most recent first.
///
/// `GET /history`
pub async fn list_history(
    State(state): State<AppState>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let session = state.session.lock().await;
    Ok(Json(HistoryResponse {
        bills: session.history().to_vec(),
    }))
}

/// Returns one saved bill.
///
/// `GET /history/{id}`
pub async fn get_saved_bill(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SavedBill>, ApiError> {
    let id = parse_bill_id(&id)?;
    let session = state.session.lock().await;
    session
        .saved_bill(id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("saved bill {}", id)))
}

/// Deletes one saved bill.
///
/// `DELETE /history/{id}`
pub async fn delete_saved_bill(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteBillResponse>, ApiError> {
    let id = parse_bill_id(&id)?;
    let mut session = state.session.lock().await;
    let deleted = session
        .delete_saved_bill(id)?
        .ok_or_else(|| ApiError::NotFound(format!("saved bill {}", id)))?;
    Ok(Json(DeleteBillResponse { deleted }))
}
