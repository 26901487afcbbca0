//! Catalog-level views: failed files and row counts

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;

use midicat_common::db::catalog::{self, CatalogCounts, FailureEntry};

use crate::AppState;

/// Failure listing response
#[derive(Debug, Serialize)]
pub struct FailuresResponse {
    pub total: usize,
    pub failures: Vec<FailureEntry>,
}

/// GET /api/failures
///
/// Files the indexer could not summarize, with their decode errors.
pub async fn list_failures(
    State(state): State<AppState>,
) -> Result<Json<FailuresResponse>, CatalogError> {
    let failures = catalog::failures(&state.db)
        .await
        .map_err(|e| CatalogError::Database(e.to_string()))?;

    Ok(Json(FailuresResponse {
        total: failures.len(),
        failures,
    }))
}

/// GET /api/stats
///
/// Total, indexed and failed row counts.
pub async fn stats(State(state): State<AppState>) -> Result<Json<CatalogCounts>, CatalogError> {
    let counts = catalog::counts(&state.db)
        .await
        .map_err(|e| CatalogError::Database(e.to_string()))?;

    Ok(Json(counts))
}

/// Catalog view errors
#[derive(Debug)]
pub enum CatalogError {
    Database(String),
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            CatalogError::Database(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", msg),
            ),
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
