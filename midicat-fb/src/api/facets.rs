//! Facet discovery endpoints
//!
//! Lists the queryable facets and enumerates the distinct stored
//! values of one facet, always led by the `*ANY*` wildcard so a client
//! can render a complete choice list directly.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;
use std::str::FromStr;

use midicat_common::db::catalog;
use midicat_common::facet::Facet;

use crate::AppState;

/// GET /api/facets
///
/// The queryable facets in presentation order.
pub async fn list_facets() -> Json<Vec<Facet>> {
    Json(Facet::ALL.to_vec())
}

/// Facet value enumeration response
#[derive(Debug, Serialize)]
pub struct FacetValuesResponse {
    pub facet: String,
    pub values: Vec<String>,
}

/// GET /api/facets/:facet/values
///
/// Distinct stored values for one facet, wildcard first.
pub async fn facet_values(
    State(state): State<AppState>,
    Path(facet): Path<String>,
) -> Result<Json<FacetValuesResponse>, FacetError> {
    let facet = Facet::from_str(&facet).map_err(|e| FacetError::UnknownFacet(e.to_string()))?;

    let values = catalog::facet_choices(&state.db, facet)
        .await
        .map_err(|e| FacetError::Database(e.to_string()))?;

    Ok(Json(FacetValuesResponse {
        facet: facet.to_string(),
        values,
    }))
}

/// Facet endpoint errors
#[derive(Debug)]
pub enum FacetError {
    UnknownFacet(String),
    Database(String),
}

impl IntoResponse for FacetError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            FacetError::UnknownFacet(msg) => (StatusCode::BAD_REQUEST, msg),
            FacetError::Database(msg) => (
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
