//! Offence search endpoint.
//!
//! Every outcome is a `SearchResult` body. A query string that cannot be
//! read is a 400; query failures carry the error message with a gateway
//! status so callers can tell them apart from an empty result.

use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::warn;

use offences_athena::AthenaError;
use offences_core::{SearchParams, SearchResult};

use crate::state::AppState;

pub async fn search(
    State(state): State<Arc<AppState>>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> (StatusCode, Json<SearchResult>) {
    let Query(params) = match params {
        Ok(params) => params,
        Err(rejection) => {
            let message = rejection.body_text();
            warn!(error = %message, "Rejected search query string");
            return (StatusCode::BAD_REQUEST, Json(SearchResult::from_error(message)));
        }
    };

    match state.search.run(&params).await {
        Ok(records) => (StatusCode::OK, Json(SearchResult::from_records(records))),
        Err(e) => {
            warn!(error = %e, "Search failed");
            (error_status(&e), Json(SearchResult::from_error(e.to_string())))
        }
    }
}

/// Map an Athena error to the HTTP status of the search response.
fn error_status(e: &AthenaError) -> StatusCode {
    match e {
        AthenaError::QueryTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        _ => StatusCode::BAD_GATEWAY,
    }
}
