pub mod config;
pub mod client;
pub mod engine;
pub mod result;
pub mod search;

pub use config::AthenaConfig;
pub use client::{AthenaClient, AthenaError};
pub use engine::{ExecutionState, ExecutionStatus, QueryEngine};
pub use result::{reshape, AthenaColumn, AthenaQueryResult};
pub use search::{OffenceSearch, PollPolicy, SearchQuery, OFFENCES_SQL};
