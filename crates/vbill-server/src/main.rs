//! Binary entrypoint for the vbill HTTP server.
//!
//! Reads configuration from environment variables:
//! - `VBILL_DB_PATH`: SQLite database file path (default: "vbill.db")
//! - `VBILL_PORT`: Server listen port (default: "3000")
//! - `VBILL_CATALOG_PATH`: optional catalog JSON replacing the embedded one

use vbill_server::router::build_router;
use vbill_server::state::{load_catalog, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let db_path = std::env::var("VBILL_DB_PATH").unwrap_or_else(|_| "vbill.db".to_string());
    let port = std::env::var("VBILL_PORT").unwrap_or_else(|_| "3000".to_string());
    let catalog_path = std::env::var("VBILL_CATALOG_PATH").ok();

    let catalog = load_catalog(catalog_path.as_deref())?;
    tracing::info!(items = catalog.len(), "catalog loaded");

    let state = AppState::new(&db_path, catalog)?;
    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", port);
    tracing::info!("vbill server starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
