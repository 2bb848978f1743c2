//! `_nss_command_*` entry points for the hosts database.
//!
//! Thin adapters over `nsscmd-core`: convert the C arguments, run the lookup
//! against the compiled-in command paths, then rebase the core's
//! offset-encoded buffer into real pointers for the caller. Status travels
//! as the return value; the error code pair travels through `errnop` and
//! `h_errnop`.
//!
//! Every entry point tolerates null pointers (returning `NSS_STATUS_UNAVAIL`
//! without writing through them) and never unwinds across the C boundary:
//! the core has no panicking paths for any input, and the rebase walks only
//! offsets the core itself wrote.

use std::ffi::{CStr, c_char, c_int, c_void};
use std::net::{IpAddr, Ipv4Addr};
use std::slice;

use nsscmd_core::encode::{
    ADDR_LEN, NULL_REF, REF_SIZE, classic, put_ref, read_i32, read_ref, tuples,
};
use nsscmd_core::resolve::CommandResolver;
use nsscmd_core::runner::SystemCommandRunner;
use nsscmd_core::status::{Outcome, Resolution};

pub use nsscmd_core::resolve::{DEFAULT_BY_ADDR_COMMAND, DEFAULT_BY_NAME_COMMAND};

use crate::netdb::{GaihAddrtuple, NSS_STATUS_UNAVAIL, status_code};

/// The production resolver: system spawner, compiled-in command paths,
/// production trust rule. Built fresh per call; it holds no state.
fn resolver() -> CommandResolver<SystemCommandRunner> {
    CommandResolver::new(SystemCommandRunner, DEFAULT_BY_NAME_COMMAND, DEFAULT_BY_ADDR_COMMAND)
}

/// Writes the code pair and returns the NSS status.
///
/// # Safety
///
/// `errnop` and `h_errnop` must be valid for writes; every entry point
/// checks them before anything else.
unsafe fn finish(resolution: Resolution, errnop: *mut c_int, h_errnop: *mut c_int) -> c_int {
    // SAFETY: non-null per the caller's check, valid per the NSS contract.
    unsafe {
        *errnop = resolution.errno;
        *h_errnop = resolution.h_errno;
    }
    status_code(resolution)
}

/// Rewrites the reference slot at `at` from offset to absolute address,
/// leaving the null sentinel alone.
fn rebase_slot(buf: &mut [u8], at: usize, base: usize) {
    let offset = read_ref(buf, at);
    if offset != NULL_REF {
        put_ref(buf, at, base + offset);
    }
}

/// Rebases the 0-terminated reference array named by `header_slot`, then
/// the header slot itself.
fn rebase_array(buf: &mut [u8], header_slot: usize, base: usize) {
    let mut slot = read_ref(buf, header_slot);
    while read_ref(buf, slot) != NULL_REF {
        rebase_slot(buf, slot, base);
        slot += REF_SIZE;
    }
    rebase_slot(buf, header_slot, base);
}

/// Rebases a freshly classic-encoded buffer in place and returns the
/// `hostent` image of its header, pointers and all.
fn rebase_classic(buf: &mut [u8], base: usize) -> libc::hostent {
    rebase_slot(buf, classic::HEADER_NAME, base);
    rebase_array(buf, classic::HEADER_ALIASES, base);
    rebase_array(buf, classic::HEADER_ADDR_LIST, base);
    libc::hostent {
        h_name: read_ref(buf, classic::HEADER_NAME) as *mut c_char,
        h_aliases: read_ref(buf, classic::HEADER_ALIASES) as *mut *mut c_char,
        h_addrtype: read_i32(buf, classic::HEADER_ADDRTYPE),
        h_length: read_i32(buf, classic::HEADER_LENGTH),
        h_addr_list: read_ref(buf, classic::HEADER_ADDR_LIST) as *mut *mut c_char,
    }
}

/// Rebases a freshly tuple-encoded buffer in place. The head tuple sits at
/// the buffer start.
fn rebase_tuples(buf: &mut [u8], base: usize) {
    let mut at = 0;
    loop {
        rebase_slot(buf, at + tuples::TUPLE_NAME, base);
        let next = read_ref(buf, at + tuples::TUPLE_NEXT);
        if next == NULL_REF {
            break;
        }
        rebase_slot(buf, at + tuples::TUPLE_NEXT, base);
        at = next;
    }
}

/// Shared by-name path: resolve, rebase, store, report.
///
/// # Safety
///
/// Pointer contract of [`_nss_command_gethostbyname_r`], with `errnop` and
/// `h_errnop` already checked non-null by the caller.
unsafe fn run_gethostbyname(
    name: *const c_char,
    result: *mut libc::hostent,
    buffer: *mut c_char,
    buffer_len: usize,
    errnop: *mut c_int,
    h_errnop: *mut c_int,
) -> c_int {
    if name.is_null() || result.is_null() || buffer.is_null() {
        // SAFETY: errnop/h_errnop checked by the caller.
        return unsafe { finish(Resolution::unavailable(), errnop, h_errnop) };
    }
    // SAFETY: name is a valid NUL-terminated string per the NSS contract;
    // errnop/h_errnop were checked by the caller.
    let Ok(name) = unsafe { CStr::from_ptr(name) }.to_str() else {
        return unsafe { finish(Resolution::not_found(), errnop, h_errnop) };
    };
    // SAFETY: buffer spans buffer_len writable bytes per the NSS contract.
    let buf = unsafe { slice::from_raw_parts_mut(buffer.cast::<u8>(), buffer_len) };
    let resolution = resolver().by_name(name, buf);
    if resolution.outcome == Outcome::Success {
        let header = rebase_classic(buf, buffer as usize);
        // SAFETY: result checked non-null above.
        unsafe { result.write(header) };
    }
    // SAFETY: errnop/h_errnop checked by the caller.
    unsafe { finish(resolution, errnop, h_errnop) }
}

/// `gethostbyname` backend: forward lookup into a caller-owned `hostent`
/// plus string buffer.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn _nss_command_gethostbyname_r(
    name: *const c_char,
    result: *mut libc::hostent,
    buffer: *mut c_char,
    buffer_len: usize,
    errnop: *mut c_int,
    h_errnop: *mut c_int,
) -> c_int {
    if errnop.is_null() || h_errnop.is_null() {
        return NSS_STATUS_UNAVAIL;
    }
    // SAFETY: forwarded under the entry point's own contract.
    unsafe { run_gethostbyname(name, result, buffer, buffer_len, errnop, h_errnop) }
}

/// `gethostbyname2` backend: like `gethostbyname_r` plus an address-family
/// filter. Only `AF_INET` proceeds; everything else is NotFound before the
/// trust gate runs.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn _nss_command_gethostbyname2_r(
    name: *const c_char,
    address_family: c_int,
    result: *mut libc::hostent,
    buffer: *mut c_char,
    buffer_len: usize,
    errnop: *mut c_int,
    h_errnop: *mut c_int,
) -> c_int {
    if errnop.is_null() || h_errnop.is_null() {
        return NSS_STATUS_UNAVAIL;
    }
    if address_family != libc::AF_INET {
        // SAFETY: both out-pointers checked above.
        return unsafe { finish(Resolution::not_found(), errnop, h_errnop) };
    }
    // SAFETY: forwarded under the entry point's own contract.
    unsafe { run_gethostbyname(name, result, buffer, buffer_len, errnop, h_errnop) }
}

/// `gethostbyname3` backend: `gethostbyname2_r` semantics plus the
/// canonical-name echo. `ttlp` is accepted and ignored (the delegate
/// protocol carries no TTL); `canonp` receives `h_name` on success only.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn _nss_command_gethostbyname3_r(
    name: *const c_char,
    address_family: c_int,
    result: *mut libc::hostent,
    buffer: *mut c_char,
    buffer_len: usize,
    errnop: *mut c_int,
    h_errnop: *mut c_int,
    _ttlp: *mut i32,
    canonp: *mut *mut c_char,
) -> c_int {
    if errnop.is_null() || h_errnop.is_null() {
        return NSS_STATUS_UNAVAIL;
    }
    if address_family != libc::AF_INET {
        // SAFETY: both out-pointers checked above.
        return unsafe { finish(Resolution::not_found(), errnop, h_errnop) };
    }
    // SAFETY: forwarded under the entry point's own contract.
    let status =
        unsafe { run_gethostbyname(name, result, buffer, buffer_len, errnop, h_errnop) };
    if status == crate::netdb::NSS_STATUS_SUCCESS && !canonp.is_null() {
        // SAFETY: result was filled by the successful lookup; canonp is
        // valid for writes per the NSS contract.
        unsafe { *canonp = (*result).h_name };
    }
    status
}

/// `gethostbyname4` backend: forward lookup into a `gaih_addrtuple` chain
/// carved out of the caller's buffer. `ttlp` is accepted and ignored.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn _nss_command_gethostbyname4_r(
    name: *const c_char,
    pat: *mut *mut GaihAddrtuple,
    buffer: *mut c_char,
    buffer_len: usize,
    errnop: *mut c_int,
    h_errnop: *mut c_int,
    _ttlp: *mut i32,
) -> c_int {
    if errnop.is_null() || h_errnop.is_null() {
        return NSS_STATUS_UNAVAIL;
    }
    if name.is_null() || pat.is_null() || buffer.is_null() {
        // SAFETY: both out-pointers checked above.
        return unsafe { finish(Resolution::unavailable(), errnop, h_errnop) };
    }
    // SAFETY: name is a valid NUL-terminated string per the NSS contract;
    // errnop/h_errnop were checked above.
    let Ok(name) = unsafe { CStr::from_ptr(name) }.to_str() else {
        return unsafe { finish(Resolution::not_found(), errnop, h_errnop) };
    };
    // SAFETY: buffer spans buffer_len writable bytes per the NSS contract.
    let buf = unsafe { slice::from_raw_parts_mut(buffer.cast::<u8>(), buffer_len) };
    let resolution = resolver().by_name_tuples(name, buf);
    if resolution.outcome == Outcome::Success {
        rebase_tuples(buf, buffer as usize);
        // SAFETY: pat checked non-null above; the head tuple sits at the
        // buffer start.
        unsafe { *pat = buffer.cast::<GaihAddrtuple>() };
    }
    // SAFETY: both out-pointers checked above.
    unsafe { finish(resolution, errnop, h_errnop) }
}

/// `gethostbyaddr` backend: reverse lookup. Only `AF_INET` with at least
/// four address bytes proceeds; everything else is NotFound without a
/// subprocess.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn _nss_command_gethostbyaddr_r(
    address: *const c_void,
    address_len: libc::socklen_t,
    address_family: c_int,
    result: *mut libc::hostent,
    buffer: *mut c_char,
    buffer_len: usize,
    errnop: *mut c_int,
    h_errnop: *mut c_int,
) -> c_int {
    if errnop.is_null() || h_errnop.is_null() {
        return NSS_STATUS_UNAVAIL;
    }
    if result.is_null() || buffer.is_null() {
        // SAFETY: both out-pointers checked above.
        return unsafe { finish(Resolution::unavailable(), errnop, h_errnop) };
    }
    if address_family != libc::AF_INET || (address_len as usize) < ADDR_LEN || address.is_null() {
        // SAFETY: both out-pointers checked above.
        return unsafe { finish(Resolution::not_found(), errnop, h_errnop) };
    }
    let mut octets = [0u8; ADDR_LEN];
    // SAFETY: address points at address_len (>= 4) readable bytes.
    unsafe {
        std::ptr::copy_nonoverlapping(address.cast::<u8>(), octets.as_mut_ptr(), ADDR_LEN);
    }
    // SAFETY: buffer spans buffer_len writable bytes per the NSS contract.
    let buf = unsafe { slice::from_raw_parts_mut(buffer.cast::<u8>(), buffer_len) };
    let resolution = resolver().by_addr(IpAddr::V4(Ipv4Addr::from(octets)), buf);
    if resolution.outcome == Outcome::Success {
        let header = rebase_classic(buf, buffer as usize);
        // SAFETY: result checked non-null above.
        unsafe { result.write(header) };
    }
    // SAFETY: both out-pointers checked above.
    unsafe { finish(resolution, errnop, h_errnop) }
}
