//! Integration tests for offences-athena crate.
//!
//! These tests drive the search flow through scripted engines and never touch AWS.
//! Tests marked with `#[ignore]` require AWS credentials and must be run explicitly.

mod result;
mod search;
