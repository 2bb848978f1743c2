//! Admission check on the configured resolver executable.
//!
//! The library side of this crate loads into arbitrary processes, privileged
//! ones included, so the executable it is about to spawn must already be
//! trusted: owned by the expected account and carrying exactly the expected
//! mode, file-type bits included. Anything else, a failed stat included,
//! fails closed. There is deliberately no environment override of the
//! requirements or of the command paths.

use std::os::unix::fs::MetadataExt;
use std::path::Path;

/// Owner and exact mode an executable must present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrustRequirements {
    pub owner_uid: u32,
    /// Full `st_mode`, file-type bits included.
    pub mode: u32,
}

impl TrustRequirements {
    /// Production rule: a root-owned regular file, mode `rwxr-xr-x`.
    pub const PRODUCTION: Self = Self { owner_uid: 0, mode: 0o100_755 };
}

impl Default for TrustRequirements {
    fn default() -> Self {
        Self::PRODUCTION
    }
}

/// True when `path` satisfies `requirements`.
///
/// The mode comparison is exact, not a mask: a group-writable, setuid, or
/// non-regular file fails even when it is merely "more permissive than
/// needed". Symlinks are followed; the target is what gets executed and what
/// must pass.
#[must_use]
pub fn executable_is_trusted(path: &Path, requirements: TrustRequirements) -> bool {
    match std::fs::metadata(path) {
        Ok(metadata) => {
            metadata.uid() == requirements.owner_uid && metadata.mode() == requirements.mode
        }
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicU64, Ordering};

    static TEST_SEQ: AtomicU64 = AtomicU64::new(0);

    fn temp_path(prefix: &str) -> PathBuf {
        let seq = TEST_SEQ.fetch_add(1, Ordering::Relaxed);
        std::env::temp_dir().join(format!("nsscmd-{prefix}-{}-{seq}", std::process::id()))
    }

    fn requirements_for(path: &Path) -> TrustRequirements {
        let metadata = fs::metadata(path).expect("test file should stat");
        TrustRequirements { owner_uid: metadata.uid(), mode: metadata.mode() }
    }

    #[test]
    fn a_missing_file_is_never_trusted() {
        let path = temp_path("trust-missing");
        assert!(!executable_is_trusted(&path, TrustRequirements::PRODUCTION));
    }

    #[test]
    fn a_file_matching_its_own_metadata_is_trusted() {
        let path = temp_path("trust-self");
        fs::write(&path, b"#!/bin/sh\n").expect("test file should be writable");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
            .expect("chmod should succeed");

        assert!(executable_is_trusted(&path, requirements_for(&path)));
        fs::remove_file(&path).expect("cleanup");
    }

    #[test]
    fn the_mode_comparison_is_exact() {
        let path = temp_path("trust-mode");
        fs::write(&path, b"#!/bin/sh\n").expect("test file should be writable");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o700))
            .expect("chmod should succeed");

        let matching = requirements_for(&path);
        assert!(executable_is_trusted(&path, matching));

        let stricter = TrustRequirements { mode: matching.mode & !0o100, ..matching };
        assert!(!executable_is_trusted(&path, stricter));
        let looser = TrustRequirements { mode: matching.mode | 0o055, ..matching };
        assert!(!executable_is_trusted(&path, looser));
        fs::remove_file(&path).expect("cleanup");
    }

    #[test]
    fn the_owner_must_match() {
        let path = temp_path("trust-owner");
        fs::write(&path, b"#!/bin/sh\n").expect("test file should be writable");

        let matching = requirements_for(&path);
        let wrong_owner =
            TrustRequirements { owner_uid: matching.owner_uid.wrapping_add(1), ..matching };
        assert!(!executable_is_trusted(&path, wrong_owner));
        fs::remove_file(&path).expect("cleanup");
    }

    #[test]
    fn a_directory_never_passes_a_regular_file_requirement() {
        // Directory modes carry 0o040000, so the exact compare rejects them.
        assert!(!executable_is_trusted(&std::env::temp_dir(), TrustRequirements::PRODUCTION));
    }

    #[test]
    fn a_non_executable_file_fails_the_production_rule() {
        let path = temp_path("trust-plain");
        fs::write(&path, b"data").expect("test file should be writable");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644))
            .expect("chmod should succeed");

        // Wrong mode regardless of who owns it, root included.
        assert!(!executable_is_trusted(&path, TrustRequirements::PRODUCTION));
        fs::remove_file(&path).expect("cleanup");
    }
}
