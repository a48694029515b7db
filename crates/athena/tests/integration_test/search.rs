//! Tests for OffenceSearch: the submit / poll / fetch lifecycle against a
//! scripted engine, with tokio time paused.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use offences_athena::*;
use offences_core::SearchParams;

/// Engine that replays a fixed status sequence, then reports RUNNING forever.
#[derive(Default)]
struct ScriptedEngine {
    submit_error: Mutex<Option<AthenaError>>,
    statuses: Mutex<VecDeque<Result<ExecutionStatus, AthenaError>>>,
    results: Mutex<Option<Result<AthenaQueryResult, AthenaError>>>,
    submitted: Mutex<Vec<SearchQuery>>,
    cancelled: Mutex<Vec<String>>,
    polls: AtomicUsize,
    fetches: AtomicUsize,
}

impl ScriptedEngine {
    fn new(statuses: Vec<Result<ExecutionStatus, AthenaError>>) -> Arc<Self> {
        Arc::new(Self {
            statuses: Mutex::new(statuses.into()),
            ..Self::default()
        })
    }

    fn with_results(self: Arc<Self>, results: Result<AthenaQueryResult, AthenaError>) -> Arc<Self> {
        *self.results.lock().unwrap() = Some(results);
        self
    }

    fn rejecting_submission(error: AthenaError) -> Arc<Self> {
        Arc::new(Self {
            submit_error: Mutex::new(Some(error)),
            ..Self::default()
        })
    }
}

#[async_trait]
impl QueryEngine for ScriptedEngine {
    async fn start_query(&self, query: &SearchQuery) -> Result<String, AthenaError> {
        self.submitted.lock().unwrap().push(query.clone());
        match self.submit_error.lock().unwrap().take() {
            Some(e) => Err(e),
            None => Ok("qe-42".to_string()),
        }
    }

    async fn query_status(&self, _query_id: &str) -> Result<ExecutionStatus, AthenaError> {
        self.polls.fetch_add(1, Ordering::SeqCst);
        self.statuses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(ExecutionStatus::new(ExecutionState::Running)))
    }

    async fn fetch_results(&self, _query_id: &str) -> Result<AthenaQueryResult, AthenaError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.results
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Err(AthenaError::ParseError("no scripted result".into())))
    }

    async fn cancel_query(&self, query_id: &str) -> Result<(), AthenaError> {
        self.cancelled.lock().unwrap().push(query_id.to_string());
        Ok(())
    }
}

fn status(state: ExecutionState) -> Result<ExecutionStatus, AthenaError> {
    Ok(ExecutionStatus::new(state))
}

fn two_rows() -> AthenaQueryResult {
    AthenaQueryResult {
        query_id: "qe-42".to_string(),
        columns: vec![
            AthenaColumn::new("camera_location_code", "integer"),
            AthenaColumn::new("sum_inf_count", "bigint"),
        ],
        rows: vec![
            vec![Some("camera_location_code".into()), Some("sum_inf_count".into())],
            vec![Some("7001".into()), Some("14".into())],
            vec![Some("7002".into()), Some("3".into())],
        ],
    }
}

fn params() -> SearchParams {
    SearchParams {
        year: "2022".into(),
        month: "jan".into(),
        state: "wa".into(),
    }
}

fn policy(timeout: Option<Duration>) -> PollPolicy {
    PollPolicy {
        interval: Duration::from_millis(500),
        timeout,
    }
}

#[tokio::test(start_paused = true)]
async fn test_success_after_polling() {
    let engine = ScriptedEngine::new(vec![
        status(ExecutionState::Queued),
        status(ExecutionState::Running),
        status(ExecutionState::Succeeded),
    ])
    .with_results(Ok(two_rows()));

    let search = OffenceSearch::new(engine.clone(), policy(Some(Duration::from_secs(60))));
    let start = tokio::time::Instant::now();
    let records = search.run(&params()).await.expect("search succeeds");

    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["camera_location_code"], "7001");
    assert_eq!(records[1]["sum_inf_count"], "3");

    assert_eq!(engine.polls.load(Ordering::SeqCst), 3);
    assert_eq!(engine.fetches.load(Ordering::SeqCst), 1);
    // Two sleeps between three polls.
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(1000) && elapsed < Duration::from_millis(1100));

    let submitted = engine.submitted.lock().unwrap();
    assert_eq!(submitted.len(), 1);
    assert_eq!(submitted[0].sql, OFFENCES_SQL);
    assert_eq!(submitted[0].parameters, ["'2022'", "'wa'"]);
}

#[tokio::test(start_paused = true)]
async fn test_failed_query_is_an_error_not_empty_rows() {
    let engine = ScriptedEngine::new(vec![
        status(ExecutionState::Running),
        Ok(ExecutionStatus::with_reason(
            ExecutionState::Failed,
            "TYPE_MISMATCH: line 1:1",
        )),
    ]);

    let search = OffenceSearch::new(engine.clone(), policy(None));
    let err = search.run(&params()).await.unwrap_err();

    match err {
        AthenaError::QueryFailed { query_id, reason } => {
            assert_eq!(query_id, "qe-42");
            assert!(reason.contains("TYPE_MISMATCH"));
        }
        other => panic!("expected QueryFailed, got {other:?}"),
    }
    assert_eq!(engine.fetches.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_query() {
    let engine = ScriptedEngine::new(vec![status(ExecutionState::Cancelled)]);
    let search = OffenceSearch::new(engine.clone(), policy(None));

    let err = search.run(&params()).await.unwrap_err();
    assert!(matches!(err, AthenaError::QueryCancelled { .. }));
    assert!(engine.cancelled.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_timeout_cancels_query() {
    let engine = ScriptedEngine::new(Vec::new());
    let search = OffenceSearch::new(engine.clone(), policy(Some(Duration::from_secs(2))));

    let start = tokio::time::Instant::now();
    let err = search.run(&params()).await.unwrap_err();

    assert!(matches!(err, AthenaError::QueryTimeout { seconds: 2, .. }));
    assert!(start.elapsed() >= Duration::from_secs(2));
    assert!(engine.polls.load(Ordering::SeqCst) >= 4);
    assert_eq!(*engine.cancelled.lock().unwrap(), vec!["qe-42".to_string()]);
    assert_eq!(engine.fetches.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn test_unbounded_policy_keeps_polling() {
    let mut statuses: Vec<_> = (0..10).map(|_| status(ExecutionState::Running)).collect();
    statuses.push(status(ExecutionState::Succeeded));
    let engine = ScriptedEngine::new(statuses).with_results(Ok(two_rows()));

    let search = OffenceSearch::new(engine.clone(), policy(None));
    let start = tokio::time::Instant::now();
    let records = search.run(&params()).await.expect("search succeeds");

    assert_eq!(records.len(), 2);
    assert_eq!(engine.polls.load(Ordering::SeqCst), 11);
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_secs(5) && elapsed < Duration::from_millis(5100));
    assert!(engine.cancelled.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_fetch_error_is_returned() {
    let engine = ScriptedEngine::new(vec![status(ExecutionState::Succeeded)])
        .with_results(Err(AthenaError::AwsSdk("ThrottlingException".into())));

    let search = OffenceSearch::new(engine, policy(None));
    let err = search.run(&params()).await.unwrap_err();

    assert_eq!(err.to_string(), "AWS SDK error: ThrottlingException");
}

#[tokio::test(start_paused = true)]
async fn test_submission_error_skips_polling() {
    let engine = ScriptedEngine::rejecting_submission(AthenaError::AwsSdk(
        "InvalidRequestException: WorkGroup is disabled".into(),
    ));

    let search = OffenceSearch::new(engine.clone(), policy(Some(Duration::from_secs(60))));
    let err = search.run(&params()).await.unwrap_err();

    match err {
        AthenaError::AwsSdk(message) => assert!(message.contains("WorkGroup is disabled")),
        other => panic!("expected AwsSdk, got {other:?}"),
    }
    assert_eq!(engine.submitted.lock().unwrap().len(), 1);
    assert_eq!(engine.polls.load(Ordering::SeqCst), 0);
    assert_eq!(engine.fetches.load(Ordering::SeqCst), 0);
    assert!(engine.cancelled.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_status_error_stops_polling() {
    let engine = ScriptedEngine::new(vec![
        status(ExecutionState::Running),
        Err(AthenaError::AwsSdk("InvalidRequestException".into())),
    ]);

    let search = OffenceSearch::new(engine.clone(), policy(None));
    let err = search.run(&params()).await.unwrap_err();

    assert!(matches!(err, AthenaError::AwsSdk(_)));
    assert_eq!(engine.polls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn test_header_only_result_is_empty() {
    let mut header_only = two_rows();
    header_only.rows.truncate(1);

    let engine = ScriptedEngine::new(vec![status(ExecutionState::Succeeded)])
        .with_results(Ok(header_only));

    let search = OffenceSearch::new(engine, policy(None));
    let records = search.run(&params()).await.expect("search succeeds");
    assert!(records.is_empty());
}

/// Requires AWS credentials, network access and the `traffic_camera` database.
///
/// Run with: `cargo test test_real_offence_search -- --ignored`
///
/// Set `S3_LOCATION` (and optionally `AWS_REGION`) before running.
#[tokio::test]
#[ignore]
async fn test_real_offence_search() {
    let config = AthenaConfig::from_env().expect("S3_LOCATION must be set");
    let policy = config.poll_policy();
    let client = AthenaClient::new(config).await;

    let search = OffenceSearch::new(client, policy);
    let records = search.run(&params()).await.expect("query succeeds");

    for record in &records {
        assert_eq!(record.len(), 6);
    }
    println!("Real Athena search returned {} rows", records.len());
}
