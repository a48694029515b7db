//! API endpoint modules.
//!
//! Each sub-module owns a single endpoint; re-exports keep the flat
//! `api::foo` paths used by the router.

mod filters;
mod health;
mod search;


pub use filters::filters;
pub use health::health;
pub use search::search;
