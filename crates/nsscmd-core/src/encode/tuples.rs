//! Tuple-list layout, shaped like glibc's `gaih_addrtuple` chain.
//!
//! The buffer front is a contiguous run of fixed-size tuples, one per
//! address, followed by a single shared copy of the name:
//!
//! ```text
//! [tuple 0][tuple 1]...[tuple n-1][name NUL]
//! ```
//!
//! Each tuple's next slot holds the offset of its successor; the last one
//! holds the 0 sentinel. Every tuple's name slot holds the offset of the one
//! shared name. Aliases have no representation here and are dropped.

use std::net::Ipv4Addr;

use super::{
    ADDR_LEN, AF_INET, NULL_REF, REF_SIZE, put_bytes, put_i32, put_ref, put_u32, read_i32,
    read_ref, read_u32,
};
use crate::record::HostRecord;

/// Byte size of one tuple: two reference slots, the family tag, sixteen
/// address bytes, and the scope id, in `gaih_addrtuple` declaration order.
pub const TUPLE_SIZE: usize = 2 * REF_SIZE + 24;

/// Tuple field offsets.
pub const TUPLE_NEXT: usize = 0;
pub const TUPLE_NAME: usize = REF_SIZE;
pub const TUPLE_FAMILY: usize = 2 * REF_SIZE;
pub const TUPLE_ADDR: usize = 2 * REF_SIZE + 4;
pub const TUPLE_SCOPEID: usize = 2 * REF_SIZE + 20;

/// Bytes a buffer must hold for the tuple-list encoding of `record`.
#[must_use]
pub fn required_size(record: &HostRecord) -> usize {
    record.name.len() + 1 + record.addresses.len() * TUPLE_SIZE
}

/// Encodes `record` as a chain of address tuples sharing one name copy.
///
/// Preconditions: the caller has verified
/// `buf.len() >= required_size(record)` and that `record.addresses` is
/// non-empty. Terminating the chain writes through index `len - 1`, so an
/// empty address list has no encodable form; resolution rejects it as
/// "no data" long before this point.
pub fn encode(record: &HostRecord, buf: &mut [u8]) {
    debug_assert!(!record.addresses.is_empty());
    debug_assert!(buf.len() >= required_size(record));
    buf.fill(0);

    let name_at = record.addresses.len() * TUPLE_SIZE;
    put_bytes(buf, name_at, record.name.as_bytes());
    for (i, address) in record.addresses.iter().enumerate() {
        let tuple = i * TUPLE_SIZE;
        put_ref(buf, tuple + TUPLE_NEXT, tuple + TUPLE_SIZE);
        put_ref(buf, tuple + TUPLE_NAME, name_at);
        put_i32(buf, tuple + TUPLE_FAMILY, AF_INET);
        put_bytes(buf, tuple + TUPLE_ADDR, &address.octets());
        put_u32(buf, tuple + TUPLE_SCOPEID, 0);
    }
    put_ref(buf, (record.addresses.len() - 1) * TUPLE_SIZE + TUPLE_NEXT, NULL_REF);
}

/// One decoded tuple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tuple {
    /// Offset of the shared name this tuple references.
    pub name_at: usize,
    pub family: i32,
    pub address: Ipv4Addr,
    pub scope_id: u32,
}

/// Walks the chain from the first tuple, in order.
///
/// Same precondition as [`encode`]: the buffer holds at least one tuple.
#[must_use]
pub fn walk(buf: &[u8]) -> Vec<Tuple> {
    let mut tuples = Vec::new();
    let mut at = 0;
    loop {
        let mut octets = [0u8; ADDR_LEN];
        octets.copy_from_slice(&buf[at + TUPLE_ADDR..at + TUPLE_ADDR + ADDR_LEN]);
        tuples.push(Tuple {
            name_at: read_ref(buf, at + TUPLE_NAME),
            family: read_i32(buf, at + TUPLE_FAMILY),
            address: Ipv4Addr::from(octets),
            scope_id: read_u32(buf, at + TUPLE_SCOPEID),
        });
        let next = read_ref(buf, at + TUPLE_NEXT);
        if next == NULL_REF {
            break;
        }
        at = next;
    }
    tuples
}
