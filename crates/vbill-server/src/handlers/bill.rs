//! Open-bill handlers: view, direct edits, reset, save and total.

use axum::extract::{Path, State};
use axum::Json;

use vbill_core::{NewItem, DEFAULT_UNIT};

use crate::error::ApiError;
use crate::schema::bill::{AddItemRequest, BillView, NoticeResponse};
use crate::state::AppState;

/// Returns the open bill.
///
/// `GET /bill`
pub async fn get_bill(State(state): State<AppState>) -> Result<Json<BillView>, ApiError> {
    let session = state.session.lock().await;
    Ok(Json(BillView::of(&session)))
}

/// Adds an item by any catalog surface form.
///
/// `POST /bill/items`
pub async fn add_item(
    State(state): State<AppState>,
    Json(req): Json<AddItemRequest>,
) -> Result<Json<NoticeResponse>, ApiError> {
    let mut session = state.session.lock().await;
    let id = session.catalog().resolve(&req.name).cloned().ok_or_else(|| {
        ApiError::InvalidInput {
            message: format!("unknown item '{}'", req.name),
            details: serde_json::json!({ "name": req.name }),
        }
    })?;

    let unit = req.unit.unwrap_or_else(|| DEFAULT_UNIT.to_string());
    let notice = session.add_item(NewItem::new(id.as_str(), req.quantity, unit, req.unit_price));
    Ok(Json(NoticeResponse::new(notice, &session)))
}

/// Removes an item. An absent item is reported as a notice, not an error.
///
/// `DELETE /bill/items/{name}`
pub async fn remove_item(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<NoticeResponse>, ApiError> {
    let mut session = state.session.lock().await;
    let name = session
        .catalog()
        .resolve(&name)
        .map(|id| id.as_str().to_string())
        .unwrap_or(name);
    let notice = session.remove_item(&name);
    Ok(Json(NoticeResponse::new(notice, &session)))
}

/// Clears the open bill.
///
/// `POST /bill/reset`
pub async fn reset_bill(State(state): State<AppState>) -> Result<Json<NoticeResponse>, ApiError> {
    let mut session = state.session.lock().await;
    let notice = session.reset_bill();
    Ok(Json(NoticeResponse::new(notice, &session)))
}

/// Saves the open bill to history.
///
/// `POST /bill/save`
pub async fn save_bill(State(state): State<AppState>) -> Result<Json<NoticeResponse>, ApiError> {
    let mut session = state.session.lock().await;
    let notice = session.save_bill()?;
    Ok(Json(NoticeResponse::new(notice, &session)))
}

/// Reads the running total.
///
/// `GET /bill/total`
pub async fn total(State(state): State<AppState>) -> Result<Json<NoticeResponse>, ApiError> {
    let session = state.session.lock().await;
    let notice = session.calculate();
    Ok(Json(NoticeResponse::new(notice, &session)))
}
