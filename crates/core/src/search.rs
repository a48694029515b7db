//! Search request and response types shared by the query layer and the HTTP API.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One result row: column name -> cell value, in result-set column order.
pub type Record = IndexMap<String, String>;

/// Query-string parameters accepted by the search endpoint.
///
/// Fields default to the empty string when absent. The dropdown defaults
/// (`year=2023`, `state=WA`) are a frontend concern and are not applied here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    pub year: String,
    pub month: String,
    pub state: String,
}

/// JSON body returned by the search endpoint.
///
/// Only constructed through [`SearchResult::from_records`] and
/// [`SearchResult::from_error`], so `count` always equals `data.len()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    error: Option<String>,
    data: Vec<Record>,
    count: usize,
}

impl SearchResult {
    pub fn from_records(data: Vec<Record>) -> Self {
        Self {
            error: None,
            count: data.len(),
            data,
        }
    }

    pub fn from_error(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            data: Vec::new(),
            count: 0,
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn data(&self) -> &[Record] {
        &self.data
    }

    pub fn count(&self) -> usize {
        self.count
    }
}
