//! Lookup drivers behind the `nsscmd` binary.
//!
//! Each driver runs the same resolution path the NSS module runs, trust
//! gate included, then decodes the result buffer through the core walkers
//! into a [`LookupReport`]. There is no way to relax the gate from here;
//! `check` exists to explain its verdicts.

use std::io::{self, Read};
use std::net::IpAddr;
use std::os::unix::fs::MetadataExt;
use std::path::Path;

use thiserror::Error;

use nsscmd_core::encode::{classic, read_cstr, tuples};
use nsscmd_core::parse;
use nsscmd_core::record::HostRecord;
use nsscmd_core::resolve::CommandResolver;
use nsscmd_core::runner::SystemCommandRunner;
use nsscmd_core::status::{Outcome, Resolution};
use nsscmd_core::trust::{self, TrustRequirements};

use crate::report::{LookupReport, RecordView, TrustReport, octal_mode};

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("io: {0}")]
    Io(#[from] io::Error),
    #[error("lookup failed: {outcome} (errno {errno}, h_errno {h_errno})")]
    Lookup { outcome: String, errno: i32, h_errno: i32 },
    #[error("untrusted executable: {path}")]
    Untrusted { path: String },
}

fn resolver(command: &Path) -> CommandResolver<SystemCommandRunner> {
    CommandResolver::new(SystemCommandRunner, command, command)
}

/// Forward lookup through `command`, classic layout.
#[must_use]
pub fn lookup_by_name(command: &Path, host: &str, buffer_size: usize) -> LookupReport {
    let mut buf = vec![0u8; buffer_size];
    let resolution = resolver(command).by_name(host, &mut buf);
    classic_report(resolution, &buf)
}

/// Forward lookup through `command`, tuple-list layout. The tuple layout
/// carries no aliases, so the reported record has none.
#[must_use]
pub fn lookup_by_name_tuples(command: &Path, host: &str, buffer_size: usize) -> LookupReport {
    let mut buf = vec![0u8; buffer_size];
    let resolution = resolver(command).by_name_tuples(host, &mut buf);
    if resolution.outcome != Outcome::Success {
        return LookupReport::failure(resolution);
    }
    let chain = tuples::walk(&buf);
    let record = HostRecord {
        name: chain.first().map(|t| read_cstr(&buf, t.name_at)).unwrap_or_default(),
        aliases: Vec::new(),
        addresses: chain.iter().map(|t| t.address).collect(),
    };
    let required = tuples::required_size(&record);
    LookupReport::success(resolution, &record, required)
}

/// Reverse lookup through `command`, classic layout.
#[must_use]
pub fn lookup_by_addr(command: &Path, address: IpAddr, buffer_size: usize) -> LookupReport {
    let mut buf = vec![0u8; buffer_size];
    let resolution = resolver(command).by_addr(address, &mut buf);
    classic_report(resolution, &buf)
}

fn classic_report(resolution: Resolution, buf: &[u8]) -> LookupReport {
    if resolution.outcome != Outcome::Success {
        return LookupReport::failure(resolution);
    }
    let record = classic::decode(buf);
    let required = classic::required_size(&record);
    LookupReport::success(resolution, &record, required)
}

/// Parses directive text into a record view without running anything.
#[must_use]
pub fn parse_text(text: &str) -> RecordView {
    RecordView::new(&parse::parse(text))
}

/// Trust gate verdict for `path` under the production rules, with the
/// observed owner and mode so a failure explains itself.
#[must_use]
pub fn check_executable(path: &Path) -> TrustReport {
    let requirements = TrustRequirements::PRODUCTION;
    let trusted = trust::executable_is_trusted(path, requirements);
    let mut report = TrustReport {
        path: path.display().to_string(),
        trusted,
        required_owner_uid: requirements.owner_uid,
        required_mode: octal_mode(requirements.mode),
        owner_uid: None,
        mode: None,
        error: None,
    };
    match std::fs::metadata(path) {
        Ok(metadata) => {
            report.owner_uid = Some(metadata.uid());
            report.mode = Some(octal_mode(metadata.mode()));
        }
        Err(err) => report.error = Some(err.to_string()),
    }
    report
}

/// Reads all of stdin for `parse`.
pub fn read_stdin() -> Result<String, HarnessError> {
    let mut text = String::new();
    io::stdin().read_to_string(&mut text)?;
    Ok(text)
}
