//! AWS Athena query execution client.
//!
//! Provides [`AthenaClient`], the [`QueryEngine`] backed by the AWS SDK. It
//! submits parameterized queries with the configured database, workgroup,
//! output location and result reuse, and parses `GetQueryResults` output into
//! [`AthenaQueryResult`].

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_athena::operation::get_query_results::GetQueryResultsOutput;
use aws_sdk_athena::types::{
    QueryExecutionContext, ResultConfiguration, ResultReuseByAgeConfiguration,
    ResultReuseConfiguration,
};
use tracing::{debug, info, warn};

use crate::config::AthenaConfig;
use crate::engine::{ExecutionState, ExecutionStatus, QueryEngine};
use crate::result::{AthenaColumn, AthenaQueryResult};
use crate::search::SearchQuery;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Errors that can occur during Athena operations.
#[derive(Debug, thiserror::Error)]
pub enum AthenaError {
    /// The query execution failed on the Athena side.
    #[error("Query {query_id} failed: {reason}")]
    QueryFailed { query_id: String, reason: String },

    /// The query was cancelled (either by the user or by Athena).
    #[error("Query {query_id} was cancelled")]
    QueryCancelled { query_id: String },

    /// The query did not finish within the poll timeout.
    #[error("Query {query_id} timed out after {seconds}s")]
    QueryTimeout { query_id: String, seconds: u64 },

    /// An AWS SDK error (stringified).
    #[error("AWS SDK error: {0}")]
    AwsSdk(String),

    /// Failed to parse Athena result data.
    #[error("Parse error: {0}")]
    ParseError(String),
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Client for executing queries against AWS Athena.
pub struct AthenaClient {
    config: AthenaConfig,
    athena_client: aws_sdk_athena::Client,
}

impl AthenaClient {
    /// Create a new [`AthenaClient`] from the given configuration.
    ///
    /// Credentials and, unless `config.region` is set, the region come from
    /// the SDK default provider chain.
    pub async fn new(config: AthenaConfig) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &config.region {
            loader = loader.region(aws_sdk_athena::config::Region::new(region.clone()));
        }
        let aws_cfg = loader.load().await;

        let athena_client = aws_sdk_athena::Client::new(&aws_cfg);

        info!(
            region = ?aws_cfg.region(),
            database = %config.database,
            workgroup = %config.workgroup,
            "AthenaClient initialised"
        );

        Self {
            config,
            athena_client,
        }
    }

    fn result_reuse(&self) -> Option<ResultReuseConfiguration> {
        if self.config.result_reuse_minutes <= 0 {
            return None;
        }
        Some(
            ResultReuseConfiguration::builder()
                .result_reuse_by_age_configuration(
                    ResultReuseByAgeConfiguration::builder()
                        .enabled(true)
                        .max_age_in_minutes(self.config.result_reuse_minutes)
                        .build(),
                )
                .build(),
        )
    }
}

#[async_trait]
impl QueryEngine for AthenaClient {
    async fn start_query(&self, query: &SearchQuery) -> Result<String, AthenaError> {
        debug!(sql = %query.sql, parameters = ?query.parameters, "Submitting Athena query");

        let start_resp = self
            .athena_client
            .start_query_execution()
            .query_string(&query.sql)
            .set_execution_parameters(Some(query.parameters.clone()))
            .query_execution_context(
                QueryExecutionContext::builder()
                    .database(&self.config.database)
                    .build(),
            )
            .result_configuration(
                ResultConfiguration::builder()
                    .output_location(self.config.output_location())
                    .build(),
            )
            .set_result_reuse_configuration(self.result_reuse())
            .work_group(&self.config.workgroup)
            .send()
            .await
            .map_err(|e| AthenaError::AwsSdk(e.to_string()))?;

        start_resp
            .query_execution_id()
            .map(str::to_string)
            .ok_or_else(|| AthenaError::AwsSdk("No query execution ID returned".into()))
    }

    async fn query_status(&self, query_id: &str) -> Result<ExecutionStatus, AthenaError> {
        let resp = self
            .athena_client
            .get_query_execution()
            .query_execution_id(query_id)
            .send()
            .await
            .map_err(|e| AthenaError::AwsSdk(e.to_string()))?;

        let status = resp
            .query_execution()
            .ok_or_else(|| AthenaError::AwsSdk("No query execution in response".into()))?
            .status();

        Ok(ExecutionStatus {
            state: status
                .and_then(|s| s.state())
                .map(ExecutionState::from)
                .unwrap_or(ExecutionState::Queued),
            reason: status
                .and_then(|s| s.state_change_reason())
                .map(str::to_string),
        })
    }

    async fn fetch_results(&self, query_id: &str) -> Result<AthenaQueryResult, AthenaError> {
        let output = self
            .athena_client
            .get_query_results()
            .query_execution_id(query_id)
            .send()
            .await
            .map_err(|e| AthenaError::AwsSdk(e.to_string()))?;

        parse_results(query_id, &output)
    }

    async fn cancel_query(&self, query_id: &str) -> Result<(), AthenaError> {
        info!(query_id = %query_id, "Cancelling query");

        self.athena_client
            .stop_query_execution()
            .query_execution_id(query_id)
            .send()
            .await
            .map_err(|e| AthenaError::AwsSdk(e.to_string()))?;

        Ok(())
    }
}

/// Whether Athena holds further result pages beyond this one.
fn has_more_pages(output: &GetQueryResultsOutput) -> bool {
    output.next_token().is_some_and(|token| !token.is_empty())
}

/// Convert the raw SDK output into an [`AthenaQueryResult`].
///
/// Athena returns column metadata in `ResultSetMetadata` and data rows in
/// `ResultSet.Rows`. Rows are kept as-is; the header echo is dropped later by
/// [`crate::result::reshape`]. Only this page is read.
fn parse_results(
    query_id: &str,
    output: &GetQueryResultsOutput,
) -> Result<AthenaQueryResult, AthenaError> {
    let result_set = output
        .result_set()
        .ok_or_else(|| AthenaError::ParseError("No ResultSet in response".into()))?;

    let columns: Vec<AthenaColumn> = result_set
        .result_set_metadata()
        .map(|meta| {
            meta.column_info()
                .iter()
                .map(|ci| AthenaColumn::new(ci.name(), ci.r#type()))
                .collect()
        })
        .unwrap_or_default();

    let rows: Vec<Vec<Option<String>>> = result_set
        .rows()
        .iter()
        .map(|row| {
            row.data()
                .iter()
                .map(|datum| datum.var_char_value().map(str::to_string))
                .collect()
        })
        .collect();

    debug!(
        query_id = %query_id,
        columns = columns.len(),
        rows = rows.len(),
        "Parsed Athena results"
    );

    if has_more_pages(output) {
        warn!(
            query_id = %query_id,
            rows = rows.len(),
            "Result set has more pages; returning the first page only"
        );
    }

    Ok(AthenaQueryResult {
        query_id: query_id.to_string(),
        columns,
        rows,
    })
}

// ---------------------------------------------------------------------------
// Tests: parsing logic only, no AWS calls
// ---------------------------------------------------------------------------
