//! Faceted score queries

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;

use midicat_common::db::catalog::{self, CatalogEntry};
use midicat_common::facet::{Facet, FacetSelection};

use crate::AppState;

/// Query parameters: one optional equality constraint per facet. An
/// absent parameter or the `*ANY*` sentinel leaves that facet
/// unconstrained.
#[derive(Debug, Deserialize)]
pub struct ScoreQuery {
    keys: Option<String>,
    notecount: Option<String>,
    different_notes: Option<String>,
    different_times: Option<String>,
    tracks: Option<String>,
}

impl ScoreQuery {
    fn raw(&self, facet: Facet) -> Option<&str> {
        match facet {
            Facet::Keys => self.keys.as_deref(),
            Facet::NoteCount => self.notecount.as_deref(),
            Facet::DifferentNotes => self.different_notes.as_deref(),
            Facet::DifferentTimes => self.different_times.as_deref(),
            Facet::Tracks => self.tracks.as_deref(),
        }
    }
}

/// Score query response
#[derive(Debug, Serialize)]
pub struct ScoresResponse {
    pub total: usize,
    pub results: Vec<CatalogEntry>,
}

/// GET /api/scores
///
/// Resolves the facet selection to matching catalog entries, ordered
/// by path. Files the indexer could not summarize never appear.
pub async fn query_scores(
    State(state): State<AppState>,
    Query(params): Query<ScoreQuery>,
) -> Result<Json<ScoresResponse>, ScoreError> {
    let mut selection = FacetSelection::new();
    for facet in Facet::ALL {
        selection
            .set_raw(facet, params.raw(facet))
            .map_err(|e| ScoreError::InvalidValue(e.to_string()))?;
    }

    let results = catalog::query(&state.db, &selection)
        .await
        .map_err(|e| ScoreError::Database(e.to_string()))?;

    Ok(Json(ScoresResponse {
        total: results.len(),
        results,
    }))
}

/// Score query errors
#[derive(Debug)]
pub enum ScoreError {
    InvalidValue(String),
    Database(String),
}

impl IntoResponse for ScoreError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ScoreError::InvalidValue(msg) => (StatusCode::BAD_REQUEST, msg),
            ScoreError::Database(msg) => (
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
