//! Dropdown metadata for the search form. Static; no Athena call.

use axum::Json;

use offences_core::{filter_options, FilterOptions};

pub async fn filters() -> Json<FilterOptions> {
    Json(filter_options())
}
