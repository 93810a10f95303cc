//! Router assembly for the vbill HTTP API.
//!
//! [`build_router`] wires all handler functions to their routes with
//! CORS and tracing middleware layers.

use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Builds the complete axum router with all API routes.
///
/// Routes use axum 0.8 `/{param}` path syntax.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Utterances
        .route("/utterances", post(handlers::utterances::handle_utterance))
        .route("/parse", post(handlers::utterances::parse_utterance))
        // Open bill
        .route("/bill", get(handlers::bill::get_bill))
        .route("/bill/items", post(handlers::bill::add_item))
        .route("/bill/items/{name}", delete(handlers::bill::remove_item))
        .route("/bill/reset", post(handlers::bill::reset_bill))
        .route("/bill/save", post(handlers::bill::save_bill))
        .route("/bill/total", get(handlers::bill::total))
        // History
        .route("/history", get(handlers::history::list_history))
        .route(
            "/history/{id}",
            get(handlers::history::get_saved_bill).delete(handlers::history::delete_saved_bill),
        )
        // Owner
        .route(
            "/owner",
            get(handlers::owner::get_owner).put(handlers::owner::set_owner),
        )
        .route("/owner/enrollment", put(handlers::owner::set_enrollment))
        // Catalog and capture
        .route("/catalog", get(handlers::catalog::list_catalog))
        .route("/capture/events", post(handlers::capture::capture_events))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
