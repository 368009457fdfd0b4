use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::error::{ServerError, ServerResult};
use crate::index::Record;
use crate::state::ServerState;

/// Query parameters for the lookup route.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// Source table name. Currently only validated for presence.
    #[serde(default)]
    pub tname: String,

    /// Registration number to look up.
    #[serde(default)]
    pub snumber: String,
}

/// Lookup response envelope: matched records plus an error slot.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub body: Vec<Record>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Look up records by registration number (GET /search).
///
/// Returns every indexed record for the number, one per source file, in
/// file order; an unknown number yields an empty body, not an error.
/// `tname == "foo"` is the legacy frontend health probe and answers 401.
pub async fn search(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<SearchQuery>,
) -> ServerResult<impl IntoResponse> {
    if query.tname.is_empty() {
        return Err(ServerError::BadRequest("param 'tname' is empty".into()));
    }
    if query.tname == "foo" {
        return Err(ServerError::Unauthorized);
    }
    if query.snumber.is_empty() {
        return Err(ServerError::BadRequest("param 'snumber' is empty".into()));
    }

    let matches = state.lookup(&query.snumber).to_vec();

    info!(
        tname = %query.tname,
        snumber = %query.snumber,
        hits = matches.len(),
        "search"
    );

    Ok(Json(SearchResponse {
        body: matches,
        error: None,
    }))
}
