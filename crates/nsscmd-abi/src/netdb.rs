//! NSS status codes and resolver structures shared with glibc.

use std::ffi::{c_char, c_int};

use nsscmd_core::status::{Outcome, Resolution};

/// `enum nss_status` values, as glibc's `<nss.h>` defines them.
pub const NSS_STATUS_TRYAGAIN: c_int = -2;
pub const NSS_STATUS_UNAVAIL: c_int = -1;
pub const NSS_STATUS_NOTFOUND: c_int = 0;
pub const NSS_STATUS_SUCCESS: c_int = 1;

/// Maps a core resolution to the status code NSS callers expect.
///
/// "No data" travels as `NSS_STATUS_UNAVAIL` and is distinguished from a
/// plain unavailability by the `NO_DATA` value left in `h_errno`.
#[must_use]
pub fn status_code(resolution: Resolution) -> c_int {
    match resolution.outcome {
        Outcome::Success => NSS_STATUS_SUCCESS,
        Outcome::TryAgain => NSS_STATUS_TRYAGAIN,
        Outcome::NotFound => NSS_STATUS_NOTFOUND,
        Outcome::NoData | Outcome::Unavailable => NSS_STATUS_UNAVAIL,
    }
}

/// glibc's `struct gaih_addrtuple`, which the `libc` crate does not expose.
///
/// Field order and sizes must match glibc bit for bit; the tests pin this
/// struct against the core's tuple layout constants, which is what makes the
/// in-place rebase of an encoded buffer legitimate.
#[repr(C)]
#[derive(Debug)]
pub struct GaihAddrtuple {
    pub next: *mut GaihAddrtuple,
    pub name: *mut c_char,
    pub family: c_int,
    pub addr: [u32; 4],
    pub scopeid: u32,
}
