use std::sync::Arc;

use offences_athena::{AthenaClient, AthenaConfig, OffenceSearch, PollPolicy, QueryEngine};

pub type SharedEngine = Arc<dyn QueryEngine>;

/// Shared across all requests; holds no per-request state.
pub struct AppState {
    pub search: OffenceSearch<SharedEngine>,
}

impl AppState {
    pub fn new(engine: SharedEngine, policy: PollPolicy) -> Self {
        Self {
            search: OffenceSearch::new(engine, policy),
        }
    }

    /// State backed by a real Athena client.
    pub async fn from_athena_config(config: AthenaConfig) -> Arc<Self> {
        let policy = config.poll_policy();
        let client = AthenaClient::new(config).await;
        Arc::new(Self::new(Arc::new(client), policy))
    }
}
