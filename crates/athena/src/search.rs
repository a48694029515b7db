//! Offence search: build the parameterized query, submit it, poll until it
//! finishes and reshape the rows.

use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use offences_core::{Record, SearchParams};

use crate::client::AthenaError;
use crate::engine::{ExecutionState, QueryEngine};

/// Columns selected from `offences_view`, filtered by year and registration state.
pub const OFFENCES_SQL: &str = "SELECT \
offence_location_code, \
camera_location_code, \
sum_inf_count, \
camera_type_offence, \
latitude, \
longitude \
FROM offences_view WHERE offence_year = ? AND rego_state = ?";

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

/// SQL text plus the positional values bound to its `?` placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub sql: String,
    pub parameters: Vec<String>,
}

impl SearchQuery {
    /// The offences query for the given parameters. `month` is not a filter.
    pub fn for_params(params: &SearchParams) -> Self {
        Self {
            sql: OFFENCES_SQL.to_string(),
            parameters: vec![
                string_literal(&params.year),
                string_literal(&params.state),
            ],
        }
    }
}

/// Athena substitutes execution parameters as SQL text, so values are sent as
/// quoted string literals.
fn string_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

// ---------------------------------------------------------------------------
// Polling
// ---------------------------------------------------------------------------

/// How often to poll and when to give up.
///
/// Polling is bounded by default: after `timeout` the query is cancelled and
/// the search fails with [`AthenaError::QueryTimeout`]. A `None` timeout keeps
/// polling for as long as Athena reports QUEUED or RUNNING.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    /// `None` polls until the service reports a terminal state.
    pub timeout: Option<Duration>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(500),
            timeout: Some(Duration::from_secs(300)),
        }
    }
}

/// Runs offence searches against a [`QueryEngine`].
pub struct OffenceSearch<E> {
    engine: E,
    policy: PollPolicy,
}

impl<E: QueryEngine> OffenceSearch<E> {
    pub fn new(engine: E, policy: PollPolicy) -> Self {
        Self { engine, policy }
    }

    /// Run one search end to end.
    ///
    /// Every failure is returned to the caller rather than swallowed: a
    /// submission error, a FAILED or CANCELLED execution and a poll timeout
    /// are all `Err`. Only a SUCCEEDED query yields rows, which may be empty.
    pub async fn run(&self, params: &SearchParams) -> Result<Vec<Record>, AthenaError> {
        let query = SearchQuery::for_params(params);
        info!(
            year = %params.year,
            month = %params.month,
            state = %params.state,
            "Starting offence search"
        );

        let query_id = self.engine.start_query(&query).await?;
        info!(query_id = %query_id, "Query execution started");

        self.wait_for_success(&query_id).await?;

        let result = self.engine.fetch_results(&query_id).await.map_err(|e| {
            error!(query_id = %query_id, error = %e, "Fetching results failed");
            e
        })?;

        let records = result.into_records();
        info!(query_id = %query_id, rows = records.len(), "Offence search finished");
        Ok(records)
    }

    /// Poll at a fixed interval until the query reaches a terminal state.
    ///
    /// Returns `Ok(())` only for SUCCEEDED. On timeout the query is cancelled
    /// best-effort before [`AthenaError::QueryTimeout`] is returned.
    async fn wait_for_success(&self, query_id: &str) -> Result<(), AthenaError> {
        let start = Instant::now();

        loop {
            let status = self.engine.query_status(query_id).await?;

            debug!(
                query_id = %query_id,
                state = ?status.state,
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Polling query status"
            );

            match status.state {
                ExecutionState::Succeeded => return Ok(()),

                ExecutionState::Failed => {
                    let reason = status.reason.unwrap_or_else(|| "unknown".to_string());
                    error!(query_id = %query_id, reason = %reason, "Query failed");
                    return Err(AthenaError::QueryFailed {
                        query_id: query_id.to_string(),
                        reason,
                    });
                }

                ExecutionState::Cancelled => {
                    warn!(query_id = %query_id, "Query was cancelled");
                    return Err(AthenaError::QueryCancelled {
                        query_id: query_id.to_string(),
                    });
                }

                ExecutionState::Queued | ExecutionState::Running => {}
            }

            if let Some(timeout) = self.policy.timeout {
                if start.elapsed() >= timeout {
                    warn!(
                        query_id = %query_id,
                        timeout_seconds = timeout.as_secs(),
                        "Query timed out, cancelling"
                    );
                    if let Err(e) = self.engine.cancel_query(query_id).await {
                        warn!(query_id = %query_id, error = %e, "Cancel request failed");
                    }
                    return Err(AthenaError::QueryTimeout {
                        query_id: query_id.to_string(),
                        seconds: timeout.as_secs(),
                    });
                }
            }

            tokio::time::sleep(self.policy.interval).await;
        }
    }
}
