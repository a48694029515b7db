pub mod config;
pub mod error;
pub mod filters;
pub mod search;

pub use config::Config;
pub use error::*;
pub use filters::{filter_options, FilterOptions, Filters};
pub use search::{Record, SearchParams, SearchResult};
