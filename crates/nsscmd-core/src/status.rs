//! Resolution outcomes and their wire-level error codes.
//!
//! Every resolution attempt collapses into a [`Resolution`]: an [`Outcome`]
//! class plus the two orthogonal integer codes C callers expect, one
//! `errno`-compatible and one `h_errno`-compatible. The pairings are fixed;
//! one constructor per exit path keeps call sites from mixing them.

/// Primary error reported for an undersized caller buffer.
pub const ERANGE: i32 = 34;

/// `h_errno` value: see errno instead (used for the undersized-buffer case).
pub const NETDB_INTERNAL: i32 = -1;
/// `h_errno` value: no problem.
pub const NETDB_SUCCESS: i32 = 0;
/// `h_errno` value: authoritative answer, host not found.
pub const HOST_NOT_FOUND: i32 = 1;
/// `h_errno` value: non-authoritative, try again later.
pub const TRY_AGAIN: i32 = 2;
/// `h_errno` value: non-recoverable error.
pub const NO_RECOVERY: i32 = 3;
/// `h_errno` value: valid name, no data record of requested type.
pub const NO_DATA: i32 = 4;

/// Outcome classes of one resolution attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The caller's buffer holds a complete encoding.
    Success,
    /// Retryable; with the `ERANGE` primary code, retrying with a larger
    /// buffer and unchanged input succeeds deterministically.
    TryAgain,
    /// The delegate answered authoritatively that the host does not exist.
    NotFound,
    /// The delegate answered, but with nothing usable for this direction.
    NoData,
    /// The delegate is missing, untrusted, or failed in a way a retry will
    /// not fix.
    Unavailable,
}

/// Final classification of one resolution attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub outcome: Outcome,
    /// Primary, `errno`-compatible code: 0 or [`ERANGE`].
    pub errno: i32,
    /// Secondary, `h_errno`-compatible code.
    pub h_errno: i32,
}

impl Resolution {
    #[must_use]
    pub fn success() -> Self {
        Self { outcome: Outcome::Success, errno: 0, h_errno: NETDB_SUCCESS }
    }

    /// The caller's buffer cannot hold the encoding. The only path that sets
    /// a non-zero primary code.
    #[must_use]
    pub fn buffer_too_small() -> Self {
        Self { outcome: Outcome::TryAgain, errno: ERANGE, h_errno: NETDB_INTERNAL }
    }

    #[must_use]
    pub fn not_found() -> Self {
        Self { outcome: Outcome::NotFound, errno: 0, h_errno: HOST_NOT_FOUND }
    }

    #[must_use]
    pub fn try_again() -> Self {
        Self { outcome: Outcome::TryAgain, errno: 0, h_errno: TRY_AGAIN }
    }

    #[must_use]
    pub fn no_data() -> Self {
        Self { outcome: Outcome::NoData, errno: 0, h_errno: NO_DATA }
    }

    #[must_use]
    pub fn unavailable() -> Self {
        Self { outcome: Outcome::Unavailable, errno: 0, h_errno: NO_RECOVERY }
    }

    /// Classifies a failing command exit code. Callers handle 0 (success or
    /// "no data", depending on the parsed record) before coming here.
    ///
    /// `1` means host not found, `2` try again later, `4` no data; every
    /// other value, `3` and signal terminations included, means the service
    /// is unavailable.
    #[must_use]
    pub fn from_command_exit(code: i32) -> Self {
        match code {
            1 => Self::not_found(),
            2 => Self::try_again(),
            4 => Self::no_data(),
            _ => Self::unavailable(),
        }
    }
}
