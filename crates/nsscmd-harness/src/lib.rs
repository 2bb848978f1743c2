//! Developer tooling for command-backed host resolution.
//!
//! This crate provides:
//! - Lookup drivers: run the full resolution path (trust gate included)
//!   against a resolver executable and decode the result buffer back into a
//!   reportable view
//! - Report shapes: serde-serializable views of records, lookup outcomes,
//!   and trust verdicts for the `nsscmd` binary's JSON output
//! - Trust inspection: explain why an executable does or does not satisfy
//!   the production gate

#![forbid(unsafe_code)]

pub mod lookup;
pub mod report;

pub use lookup::{
    HarnessError, check_executable, lookup_by_addr, lookup_by_name, lookup_by_name_tuples,
    parse_text, read_stdin,
};
pub use report::{LookupReport, RecordView, TrustReport, outcome_name};
