//! Offset-arena encoding shared by both buffer layouts.
//!
//! An encoded buffer is a self-contained arena: every cross-reference inside
//! it is a byte offset from the buffer's own start, stored native-endian in
//! a pointer-sized slot. Offset 0 is the arena origin (the header, or the
//! first tuple), never a legitimate reference target, so 0 doubles as the
//! null / end-of-chain sentinel. The ABI layer rewrites slots into real
//! pointers at the process boundary; nothing in this crate holds an address.
//!
//! All slot access goes through byte copies, so caller buffers need no
//! particular alignment.

pub mod classic;
pub mod tuples;

/// Size of one reference slot.
pub const REF_SIZE: usize = size_of::<usize>();

/// The null reference / chain terminator.
pub const NULL_REF: usize = 0;

/// Bytes of one encoded IPv4 address.
pub const ADDR_LEN: usize = 4;

/// IPv4 address family tag, as both layouts encode it.
pub const AF_INET: i32 = 2;

/// Writes a reference slot at `at`.
pub fn put_ref(buf: &mut [u8], at: usize, target: usize) {
    buf[at..at + REF_SIZE].copy_from_slice(&target.to_ne_bytes());
}

/// Reads the reference slot at `at`.
#[must_use]
pub fn read_ref(buf: &[u8], at: usize) -> usize {
    let mut raw = [0u8; REF_SIZE];
    raw.copy_from_slice(&buf[at..at + REF_SIZE]);
    usize::from_ne_bytes(raw)
}

pub fn put_i32(buf: &mut [u8], at: usize, value: i32) {
    buf[at..at + 4].copy_from_slice(&value.to_ne_bytes());
}

#[must_use]
pub fn read_i32(buf: &[u8], at: usize) -> i32 {
    let mut raw = [0u8; 4];
    raw.copy_from_slice(&buf[at..at + 4]);
    i32::from_ne_bytes(raw)
}

pub fn put_u32(buf: &mut [u8], at: usize, value: u32) {
    buf[at..at + 4].copy_from_slice(&value.to_ne_bytes());
}

#[must_use]
pub fn read_u32(buf: &[u8], at: usize) -> u32 {
    let mut raw = [0u8; 4];
    raw.copy_from_slice(&buf[at..at + 4]);
    u32::from_ne_bytes(raw)
}

pub fn put_bytes(buf: &mut [u8], at: usize, bytes: &[u8]) {
    buf[at..at + bytes.len()].copy_from_slice(bytes);
}

/// Reads the NUL-terminated string starting at `at`. Decoding is lossy; the
/// walkers feed tests and tooling, not resolution itself.
#[must_use]
pub fn read_cstr(buf: &[u8], at: usize) -> String {
    let tail = &buf[at..];
    let len = tail.iter().position(|&b| b == 0).unwrap_or(tail.len());
    String::from_utf8_lossy(&tail[..len]).into_owned()
}
