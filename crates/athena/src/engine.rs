//! The seam between the search flow and the query service.
//!
//! [`crate::AthenaClient`] implements [`QueryEngine`] against AWS; tests drive
//! the poll loop with scripted implementations.

use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_athena::types::QueryExecutionState;

use crate::client::AthenaError;
use crate::result::AthenaQueryResult;
use crate::search::SearchQuery;

/// Lifecycle state of a query execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionState {
    Queued,
    Running,
    Succeeded,
    Failed,
    Cancelled,
}

impl ExecutionState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Cancelled)
    }
}

impl From<&QueryExecutionState> for ExecutionState {
    fn from(state: &QueryExecutionState) -> Self {
        match state {
            QueryExecutionState::Succeeded => Self::Succeeded,
            QueryExecutionState::Failed => Self::Failed,
            QueryExecutionState::Cancelled => Self::Cancelled,
            QueryExecutionState::Running => Self::Running,
            // Queued and any state added to the API later keep us polling.
            _ => Self::Queued,
        }
    }
}

/// Current state plus Athena's reason string for FAILED/CANCELLED.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionStatus {
    pub state: ExecutionState,
    pub reason: Option<String>,
}

impl ExecutionStatus {
    pub fn new(state: ExecutionState) -> Self {
        Self { state, reason: None }
    }

    pub fn with_reason(state: ExecutionState, reason: impl Into<String>) -> Self {
        Self {
            state,
            reason: Some(reason.into()),
        }
    }
}

/// Operations the search flow needs from a query service.
#[async_trait]
pub trait QueryEngine: Send + Sync {
    /// Submit a query and return its execution id.
    async fn start_query(&self, query: &SearchQuery) -> Result<String, AthenaError>;

    /// Fetch the current execution status.
    async fn query_status(&self, query_id: &str) -> Result<ExecutionStatus, AthenaError>;

    /// Fetch the result set of a SUCCEEDED query, header row included.
    async fn fetch_results(&self, query_id: &str) -> Result<AthenaQueryResult, AthenaError>;

    /// Ask the service to stop a running query.
    async fn cancel_query(&self, query_id: &str) -> Result<(), AthenaError>;
}

#[async_trait]
impl<T: QueryEngine + ?Sized> QueryEngine for Arc<T> {
    async fn start_query(&self, query: &SearchQuery) -> Result<String, AthenaError> {
        (**self).start_query(query).await
    }

    async fn query_status(&self, query_id: &str) -> Result<ExecutionStatus, AthenaError> {
        (**self).query_status(query_id).await
    }

    async fn fetch_results(&self, query_id: &str) -> Result<AthenaQueryResult, AthenaError> {
        (**self).fetch_results(query_id).await
    }

    async fn cancel_query(&self, query_id: &str) -> Result<(), AthenaError> {
        (**self).cancel_query(query_id).await
    }
}
