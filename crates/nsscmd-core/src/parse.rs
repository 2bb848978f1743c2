//! Directive parser for resolver command output.
//!
//! The external command speaks a three-directive line protocol:
//!
//! ```text
//! name: myhost.local.
//! alias: myhost
//! ip4: 127.0.0.1
//! ```
//!
//! Parsing is deliberately permissive. Lines matching no directive are
//! skipped without diagnostics, and a dotted quad the pattern accepts but
//! the address parser rejects (out-of-range octet, leading zeros) is dropped
//! the same way. The resolver, not this module, decides whether the
//! surviving fields amount to a usable result.

use std::net::Ipv4Addr;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::record::HostRecord;

static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^name:\s*([a-zA-Z0-9\-\.]+)$").expect("pattern compiles"));
static ALIAS_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^alias:\s*([a-zA-Z0-9\-\.]+)$").expect("pattern compiles"));
static IP4_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^ip4:\s*([0-9]+\.[0-9]+\.[0-9]+\.[0-9]+)$").expect("pattern compiles")
});

/// Parses one command's stdout into a record.
///
/// A later `name:` directive overwrites an earlier one (last wins); aliases
/// and addresses accumulate in order of appearance.
#[must_use]
pub fn parse(text: &str) -> HostRecord {
    let mut record = HostRecord::default();
    for line in text.lines() {
        if let Some(captures) = NAME_PATTERN.captures(line) {
            record.name = captures[1].to_string();
        } else if let Some(captures) = ALIAS_PATTERN.captures(line) {
            record.aliases.push(captures[1].to_string());
        } else if let Some(captures) = IP4_PATTERN.captures(line)
            && let Ok(address) = Ipv4Addr::from_str(&captures[1])
        {
            record.addresses.push(address);
        }
    }
    record
}
