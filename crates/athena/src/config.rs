use std::time::Duration;

use serde::{Deserialize, Serialize};

use offences_core::config::{active_profile, profiled_env_opt, profiled_env_or, profiled_env_parse, profiled_env_required};
use offences_core::ConfigError;

use crate::search::PollPolicy;

/// Glue database holding `offences_view`.
pub const DEFAULT_DATABASE: &str = "traffic_camera";

const DEFAULT_WORKGROUP: &str = "primary";
const DEFAULT_POLL_INTERVAL_MS: u64 = 500;
const DEFAULT_TIMEOUT_SECONDS: u32 = 300;
const DEFAULT_RESULT_REUSE_MINUTES: i32 = 60;

// ── AthenaConfig ─────────────────────────────────────────────────

/// Configuration for the Athena search backend.
///
/// Reads from environment variables with optional profile prefix.
/// When `OFFENCES_PROFILE=PROD`, checks `PROD_ATHENA_DATABASE` before `ATHENA_DATABASE`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AthenaConfig {
    /// Region override. `None` leaves region resolution to the SDK default chain.
    pub region: Option<String>,
    /// Athena database name.
    pub database: String,
    /// Athena workgroup.
    pub workgroup: String,
    /// Bucket receiving query output (from `S3_LOCATION`).
    pub s3_location: String,
    /// Delay between status polls.
    pub poll_interval_ms: u64,
    /// Cancel and give up after this many seconds. 0 polls until Athena
    /// reports a terminal state.
    pub timeout_seconds: u32,
    /// Max age of a cached result Athena may reuse (0 = no reuse).
    pub result_reuse_minutes: i32,
}

impl AthenaConfig {
    /// Build config from environment variables.
    ///
    /// `S3_LOCATION` is required. `ATHENA_REGION` falls back to `AWS_REGION`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_profiled(&active_profile())
    }

    /// Build config for a specific named profile.
    pub fn from_env_profiled(profile: &str) -> Result<Self, ConfigError> {
        let s3_location = profiled_env_required(profile, "S3_LOCATION")?;

        let region = profiled_env_opt(profile, "ATHENA_REGION")
            .or_else(|| profiled_env_opt(profile, "AWS_REGION"));

        Ok(Self {
            region,
            database: profiled_env_or(profile, "ATHENA_DATABASE", DEFAULT_DATABASE),
            workgroup: profiled_env_or(profile, "ATHENA_WORKGROUP", DEFAULT_WORKGROUP),
            s3_location,
            poll_interval_ms: profiled_env_parse(
                profile,
                "ATHENA_POLL_INTERVAL_MS",
                DEFAULT_POLL_INTERVAL_MS,
            ),
            timeout_seconds: profiled_env_parse(
                profile,
                "ATHENA_TIMEOUT_SECONDS",
                DEFAULT_TIMEOUT_SECONDS,
            ),
            result_reuse_minutes: profiled_env_parse(
                profile,
                "ATHENA_RESULT_REUSE_MINUTES",
                DEFAULT_RESULT_REUSE_MINUTES,
            ),
        })
    }

    /// S3 URI Athena writes results to.
    pub fn output_location(&self) -> String {
        format!("s3://{}/Athena/", self.s3_location)
    }

    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy {
            interval: Duration::from_millis(self.poll_interval_ms),
            timeout: (self.timeout_seconds > 0)
                .then(|| Duration::from_secs(u64::from(self.timeout_seconds))),
        }
    }

    pub fn log_summary(&self) {
        tracing::info!(
            "  athena:      database={}, workgroup={}, output={}, region={}",
            self.database,
            self.workgroup,
            self.output_location(),
            self.region.as_deref().unwrap_or("(sdk default)"),
        );
    }
}

// ── Tests ────────────────────────────────────────────────────────
