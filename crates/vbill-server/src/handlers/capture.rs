//! Speech-capture event handler.

use axum::extract::State;
use axum::Json;

use crate::error::ApiError;
use crate::schema::bill::BillView;
use crate::schema::capture::{CaptureRequest, CaptureResponse, MAX_CAPTURE_BATCH};
use crate::state::AppState;

/// Feeds a batch of recognizer events through the capture machine. Only
/// finalized transcripts are applied to the bill.
///
/// `POST /capture/events`
pub async fn capture_events(
    State(state): State<AppState>,
    Json(req): Json<CaptureRequest>,
) -> Result<Json<CaptureResponse>, ApiError> {
    if req.events.len() > MAX_CAPTURE_BATCH {
        return Err(ApiError::InvalidInput {
            message: format!(
                "too many capture events: {} (max {})",
                req.events.len(),
                MAX_CAPTURE_BATCH
            ),
            details: serde_json::json!({
                "received": req.events.len(),
                "max": MAX_CAPTURE_BATCH,
            }),
        });
    }

    let mut session = state.session.lock().await;
    let mut transcripts = Vec::new();
    let mut notices = Vec::new();
    for event in req.events {
        if let Some(outcome) = session.feed_capture(event)? {
            transcripts.push(outcome.utterance);
            notices.extend(outcome.notices);
        }
    }

    Ok(Json(CaptureResponse {
        state: session.capture_state(),
        transcripts,
        notices,
        bill: BillView::of(&session),
    }))
}
