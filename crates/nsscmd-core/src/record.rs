//! Canonical resolved-host record.

use std::net::Ipv4Addr;

/// A resolved host (analogous to the data carried by `struct hostent`).
///
/// Built once per resolution call by the parser and consumed once by a size
/// calculator plus an encoder; nothing retains it across calls. Equality is
/// structural, with alias and address order significant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostRecord {
    /// Authoritative hostname. Empty when the source text never named one;
    /// forward lookups tolerate that, the reverse direction reports it as
    /// no-data.
    pub name: String,
    /// Alternate names, in order of appearance. Duplicates are kept.
    pub aliases: Vec<String>,
    /// IPv4 addresses, in order of appearance.
    pub addresses: Vec<Ipv4Addr>,
}

impl HostRecord {
    /// True when at least one address survived parsing. A record without
    /// addresses is "no data" for every forward lookup.
    #[must_use]
    pub fn has_addresses(&self) -> bool {
        !self.addresses.is_empty()
    }

    /// True when a hostname survived parsing. A record without a name is
    /// "no data" for the reverse-lookup direction.
    #[must_use]
    pub fn has_name(&self) -> bool {
        !self.name.is_empty()
    }
}
