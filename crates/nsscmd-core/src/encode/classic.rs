//! Classic `hostent`-shaped layout.
//!
//! Region order, back to back with no gaps:
//!
//! ```text
//! [header][alias ref array, n+1][address ref array, n+1][name NUL]
//! [alias bytes NUL, each][raw 4-byte addresses, each]
//! ```
//!
//! Both reference arrays are 0-terminated. The header mirrors the C
//! `hostent` field order slot for slot, so the ABI layer can rebase it in
//! place and hand the caller a `hostent` whose pointers land inside the same
//! buffer.

use std::net::Ipv4Addr;

use super::{
    ADDR_LEN, AF_INET, NULL_REF, REF_SIZE, put_bytes, put_i32, put_ref, read_cstr, read_ref,
};
use crate::record::HostRecord;

/// Byte size of the in-buffer header: three reference slots plus the two
/// `i32` fields, laid out exactly like `hostent`.
pub const HEADER_SIZE: usize = 3 * REF_SIZE + 8;

/// Header field offsets, in `hostent` declaration order.
pub const HEADER_NAME: usize = 0;
pub const HEADER_ALIASES: usize = REF_SIZE;
pub const HEADER_ADDRTYPE: usize = 2 * REF_SIZE;
pub const HEADER_LENGTH: usize = 2 * REF_SIZE + 4;
pub const HEADER_ADDR_LIST: usize = 2 * REF_SIZE + 8;

/// Exact payload bytes for `record`, excluding [`HEADER_SIZE`].
#[must_use]
pub fn payload_size(record: &HostRecord) -> usize {
    let mut total = record.name.len() + 1;
    for alias in &record.aliases {
        total += alias.len() + 1;
    }
    total += record.addresses.len() * ADDR_LEN;
    total += (record.aliases.len() + 1) * REF_SIZE;
    total += (record.addresses.len() + 1) * REF_SIZE;
    total
}

/// Bytes a buffer must hold for the full classic encoding of `record`,
/// header included. The admission check compares against this before any
/// write happens.
#[must_use]
pub fn required_size(record: &HostRecord) -> usize {
    HEADER_SIZE + payload_size(record)
}

/// Encodes `record` into `buf`.
///
/// Precondition: the caller has verified `buf.len() >= required_size(record)`.
/// The whole buffer is zeroed first, so unused tail bytes and the array
/// terminators never carry stale data from an earlier call reusing the same
/// buffer.
pub fn encode(record: &HostRecord, buf: &mut [u8]) {
    debug_assert!(buf.len() >= required_size(record));
    buf.fill(0);

    let alias_array = HEADER_SIZE;
    let addr_array = alias_array + (record.aliases.len() + 1) * REF_SIZE;
    let name_at = addr_array + (record.addresses.len() + 1) * REF_SIZE;

    put_ref(buf, HEADER_NAME, name_at);
    put_ref(buf, HEADER_ALIASES, alias_array);
    put_i32(buf, HEADER_ADDRTYPE, AF_INET);
    put_i32(buf, HEADER_LENGTH, ADDR_LEN as i32);
    put_ref(buf, HEADER_ADDR_LIST, addr_array);

    put_bytes(buf, name_at, record.name.as_bytes());
    let mut cursor = name_at + record.name.len() + 1;
    for (i, alias) in record.aliases.iter().enumerate() {
        put_bytes(buf, cursor, alias.as_bytes());
        put_ref(buf, alias_array + i * REF_SIZE, cursor);
        cursor += alias.len() + 1;
    }
    for (i, address) in record.addresses.iter().enumerate() {
        put_bytes(buf, cursor, &address.octets());
        put_ref(buf, addr_array + i * REF_SIZE, cursor);
        cursor += ADDR_LEN;
    }
}

/// Walks a classic-encoded buffer back into a record.
///
/// Follows the same offsets [`encode`] wrote; meant for tests and tooling,
/// and only valid on a buffer that holds a fresh classic encoding.
#[must_use]
pub fn decode(buf: &[u8]) -> HostRecord {
    let mut record = HostRecord {
        name: read_cstr(buf, read_ref(buf, HEADER_NAME)),
        ..HostRecord::default()
    };
    let mut slot = read_ref(buf, HEADER_ALIASES);
    loop {
        let target = read_ref(buf, slot);
        if target == NULL_REF {
            break;
        }
        record.aliases.push(read_cstr(buf, target));
        slot += REF_SIZE;
    }
    let mut slot = read_ref(buf, HEADER_ADDR_LIST);
    loop {
        let target = read_ref(buf, slot);
        if target == NULL_REF {
            break;
        }
        let mut octets = [0u8; ADDR_LEN];
        octets.copy_from_slice(&buf[target..target + ADDR_LEN]);
        record.addresses.push(Ipv4Addr::from(octets));
        slot += REF_SIZE;
    }
    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::read_i32;

    fn sample_record() -> HostRecord {
        HostRecord {
            name: "myhost.local.".to_string(),
            aliases: vec!["myhost".to_string(), "myalias.local.".to_string()],
            addresses: vec![Ipv4Addr::new(127, 0, 0, 1), Ipv4Addr::new(127, 0, 0, 2)],
        }
    }

    #[test]
    fn size_accounts_for_every_region() {
        let record = sample_record();
        // name 13+1, aliases 6+1 and 14+1, two addresses, two ref arrays of
        // three slots each.
        let payload = 14 + 7 + 15 + 2 * ADDR_LEN + 3 * REF_SIZE + 3 * REF_SIZE;
        assert_eq!(payload_size(&record), payload);
        assert_eq!(required_size(&record), HEADER_SIZE + payload);
    }

    #[test]
    fn round_trip_preserves_fields_and_order() {
        let record = sample_record();
        let mut buf = vec![0u8; required_size(&record)];
        encode(&record, &mut buf);
        assert_eq!(decode(&buf), record);
    }

    #[test]
    fn an_exactly_sized_buffer_is_filled_to_the_last_byte() {
        let record = sample_record();
        let mut buf = vec![0u8; required_size(&record)];
        encode(&record, &mut buf);
        // The final region is the raw addresses; 127.0.0.2 ends the buffer.
        assert_eq!(buf[buf.len() - 1], 2);
        assert_eq!(&buf[buf.len() - ADDR_LEN..], &[127, 0, 0, 2]);
    }

    #[test]
    fn header_mirrors_hostent_fields() {
        let record = sample_record();
        let mut buf = vec![0u8; required_size(&record)];
        encode(&record, &mut buf);

        assert_eq!(read_ref(&buf, HEADER_ALIASES), HEADER_SIZE);
        assert_eq!(read_i32(&buf, HEADER_ADDRTYPE), AF_INET);
        assert_eq!(read_i32(&buf, HEADER_LENGTH), ADDR_LEN as i32);
        let addr_array = read_ref(&buf, HEADER_ADDR_LIST);
        assert_eq!(addr_array, HEADER_SIZE + 3 * REF_SIZE);
        assert_eq!(read_ref(&buf, HEADER_NAME), addr_array + 3 * REF_SIZE);
    }

    #[test]
    fn arrays_are_null_terminated() {
        let record = sample_record();
        let mut buf = vec![0u8; required_size(&record)];
        encode(&record, &mut buf);

        let alias_array = read_ref(&buf, HEADER_ALIASES);
        assert_ne!(read_ref(&buf, alias_array), NULL_REF);
        assert_ne!(read_ref(&buf, alias_array + REF_SIZE), NULL_REF);
        assert_eq!(read_ref(&buf, alias_array + 2 * REF_SIZE), NULL_REF);

        let addr_array = read_ref(&buf, HEADER_ADDR_LIST);
        assert_eq!(read_ref(&buf, addr_array + 2 * REF_SIZE), NULL_REF);
    }

    #[test]
    fn every_reference_lands_inside_the_buffer() {
        let record = sample_record();
        let mut buf = vec![0u8; required_size(&record)];
        encode(&record, &mut buf);

        let mut refs = vec![read_ref(&buf, HEADER_NAME)];
        for array_slot in [HEADER_ALIASES, HEADER_ADDR_LIST] {
            let mut slot = read_ref(&buf, array_slot);
            refs.push(slot);
            loop {
                let target = read_ref(&buf, slot);
                if target == NULL_REF {
                    break;
                }
                refs.push(target);
                slot += REF_SIZE;
            }
        }
        for reference in refs {
            assert!(reference >= HEADER_SIZE && reference < buf.len());
        }
    }

    #[test]
    fn stale_buffer_contents_are_cleared() {
        let record = HostRecord {
            name: "h".to_string(),
            aliases: vec![],
            addresses: vec![Ipv4Addr::new(1, 2, 3, 4)],
        };
        let mut buf = vec![0xAAu8; required_size(&record) + 13];
        encode(&record, &mut buf);
        // The tail past the encoding is zero, not 0xAA.
        assert!(buf[required_size(&record)..].iter().all(|&b| b == 0));
        assert_eq!(decode(&buf), record);
    }

    #[test]
    fn a_record_without_addresses_still_encodes() {
        // The reverse-lookup direction admits name-only records.
        let record = HostRecord {
            name: "reverse.example.".to_string(),
            aliases: vec!["r".to_string()],
            addresses: vec![],
        };
        let mut buf = vec![0u8; required_size(&record)];
        encode(&record, &mut buf);
        let decoded = decode(&buf);
        assert_eq!(decoded, record);
        let addr_array = read_ref(&buf, HEADER_ADDR_LIST);
        assert_eq!(read_ref(&buf, addr_array), NULL_REF);
    }

    #[test]
    fn a_record_without_aliases_still_encodes() {
        let record = HostRecord {
            name: "plain.example.".to_string(),
            aliases: vec![],
            addresses: vec![Ipv4Addr::new(192, 0, 2, 7)],
        };
        let mut buf = vec![0u8; required_size(&record)];
        encode(&record, &mut buf);
        assert_eq!(decode(&buf), record);
    }
}
