//! Utterance handlers: apply a transcript, or dry-run parse it.

use axum::extract::State;
use axum::Json;

use crate::error::ApiError;
use crate::schema::bill::BillView;
use crate::schema::utterances::{ParseResponse, UtteranceRequest, UtteranceResponse};
use crate::state::AppState;

/// Parses an utterance and applies every command it yields.
///
/// `POST /utterances`
pub async fn handle_utterance(
    State(state): State<AppState>,
    Json(req): Json<UtteranceRequest>,
) -> Result<Json<UtteranceResponse>, ApiError> {
    let mut session = state.session.lock().await;
    let outcome = session.handle_utterance(&req.text)?;
    Ok(Json(UtteranceResponse {
        messages: outcome.notices.iter().map(ToString::to_string).collect(),
        commands: outcome.commands,
        notices: outcome.notices,
        bill: BillView::of(&session),
    }))
}

/// Parses an utterance without touching the bill, with per-segment traces.
///
/// `POST /parse`
pub async fn parse_utterance(
    State(state): State<AppState>,
    Json(req): Json<UtteranceRequest>,
) -> Result<Json<ParseResponse>, ApiError> {
    let session = state.session.lock().await;
    let parser = session.parser();
    Ok(Json(ParseResponse {
        commands: parser.parse(&req.text),
        segments: parser.explain(&req.text),
    }))
}
