//! Serde-serializable shapes for the `nsscmd` binary's JSON output.

use serde::Serialize;

use nsscmd_core::record::HostRecord;
use nsscmd_core::status::{Outcome, Resolution};

use crate::lookup::HarnessError;

/// Stable lower-case name of an outcome, as reports and exit messages
/// spell it.
#[must_use]
pub fn outcome_name(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Success => "success",
        Outcome::TryAgain => "try-again",
        Outcome::NotFound => "not-found",
        Outcome::NoData => "no-data",
        Outcome::Unavailable => "unavailable",
    }
}

/// A parsed record, addresses rendered as dotted quads.
#[derive(Debug, Clone, Serialize)]
pub struct RecordView {
    pub name: String,
    pub aliases: Vec<String>,
    pub addresses: Vec<String>,
}

impl RecordView {
    #[must_use]
    pub fn new(record: &HostRecord) -> Self {
        Self {
            name: record.name.clone(),
            aliases: record.aliases.clone(),
            addresses: record.addresses.iter().map(|a| a.to_string()).collect(),
        }
    }
}

/// One lookup's result: the outcome and code pair always, the decoded
/// record and its exact space requirement on success only.
#[derive(Debug, Clone, Serialize)]
pub struct LookupReport {
    pub outcome: String,
    pub errno: i32,
    pub h_errno: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_size: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<RecordView>,
}

impl LookupReport {
    #[must_use]
    pub fn success(resolution: Resolution, record: &HostRecord, required_size: usize) -> Self {
        Self {
            outcome: outcome_name(resolution.outcome).to_string(),
            errno: resolution.errno,
            h_errno: resolution.h_errno,
            required_size: Some(required_size),
            record: Some(RecordView::new(record)),
        }
    }

    #[must_use]
    pub fn failure(resolution: Resolution) -> Self {
        Self {
            outcome: outcome_name(resolution.outcome).to_string(),
            errno: resolution.errno,
            h_errno: resolution.h_errno,
            required_size: None,
            record: None,
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.record.is_some()
    }

    /// Converts a non-success report into the error the binary exits with.
    pub fn into_result(self) -> Result<Self, HarnessError> {
        if self.is_success() {
            return Ok(self);
        }
        Err(HarnessError::Lookup {
            outcome: self.outcome,
            errno: self.errno,
            h_errno: self.h_errno,
        })
    }
}

/// Trust gate verdict for one executable, with enough detail to explain a
/// failure. `owner_uid` and `mode` are absent when the file cannot be
/// stat'ed; `error` carries the reason.
#[derive(Debug, Clone, Serialize)]
pub struct TrustReport {
    pub path: String,
    pub trusted: bool,
    pub required_owner_uid: u32,
    pub required_mode: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_uid: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Octal rendering of a raw `st_mode`, file-type bits included, the way
/// the gate compares it.
#[must_use]
pub fn octal_mode(mode: u32) -> String {
    format!("0{mode:o}")
}
