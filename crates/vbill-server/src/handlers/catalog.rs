//! Catalog browsing handler. The parser never goes through here.

use axum::extract::{Query, State};
use axum::Json;

use crate::error::ApiError;
use crate::schema::catalog::{CatalogQuery, CatalogResponse};
use crate::state::AppState;

/// Lists catalog categories, optionally filtered by a search term.
///
/// `GET /catalog?q=term`
pub async fn list_catalog(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<CatalogResponse>, ApiError> {
    let session = state.session.lock().await;
    let categories = session.catalog().search(query.q.as_deref().unwrap_or(""));
    let item_count = categories.iter().map(|c| c.items.len()).sum();
    Ok(Json(CatalogResponse {
        categories,
        item_count,
    }))
}
