//! # midicat-fb Library
//!
//! Facet browser for the MIDI score catalog: read-only HTTP endpoints
//! for listing facets, enumerating their values and resolving facet
//! selections to matching scores.

use axum::routing::get;
use axum::Router;
use sqlx::SqlitePool;

pub mod api;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Read-only catalog database pool
    pub db: SqlitePool,
}

impl AppState {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

/// Build the complete midicat-fb router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/facets", get(api::list_facets))
        .route("/api/facets/:facet/values", get(api::facet_values))
        .route("/api/scores", get(api::query_scores))
        .route("/api/failures", get(api::list_failures))
        .route("/api/stats", get(api::stats))
        .merge(api::health_routes())
        .with_state(state)
}
