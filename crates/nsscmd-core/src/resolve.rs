//! End-to-end resolution flows.
//!
//! Per lookup, in order: trust gate, command run, parse, usability check,
//! buffer admission check, encode. The caller's buffer is written exactly
//! once, after the admission check passes; every earlier exit leaves it
//! untouched, so a caller retrying a `buffer_too_small` result with a larger
//! buffer and the same input succeeds deterministically.

use std::net::IpAddr;
use std::path::{Path, PathBuf};

use crate::encode::{classic, tuples};
use crate::parse;
use crate::record::HostRecord;
use crate::runner::CommandRunner;
use crate::status::Resolution;
use crate::trust::{self, TrustRequirements};

/// Production forward-lookup executable.
pub const DEFAULT_BY_NAME_COMMAND: &str = "/usr/local/sbin/nsscommand_gethostbyname";
/// Production reverse-lookup executable.
pub const DEFAULT_BY_ADDR_COMMAND: &str = "/usr/local/sbin/nsscommand_gethostbyaddr";

/// A configured resolver: one executable per lookup direction, one trust
/// rule for both.
#[derive(Debug, Clone)]
pub struct CommandResolver<R> {
    runner: R,
    by_name_command: PathBuf,
    by_addr_command: PathBuf,
    requirements: TrustRequirements,
}

impl<R: CommandRunner> CommandResolver<R> {
    pub fn new(
        runner: R,
        by_name_command: impl Into<PathBuf>,
        by_addr_command: impl Into<PathBuf>,
    ) -> Self {
        Self {
            runner,
            by_name_command: by_name_command.into(),
            by_addr_command: by_addr_command.into(),
            requirements: TrustRequirements::PRODUCTION,
        }
    }

    /// Replaces the trust rule. Tests gate on files they own; production
    /// callers keep [`TrustRequirements::PRODUCTION`].
    #[must_use]
    pub fn with_requirements(mut self, requirements: TrustRequirements) -> Self {
        self.requirements = requirements;
        self
    }

    /// Forward lookup into the classic layout.
    pub fn by_name(&self, name: &str, buf: &mut [u8]) -> Resolution {
        let record = match self.run_direction(&self.by_name_command, name) {
            Ok(record) => record,
            Err(early) => return early,
        };
        if !record.has_addresses() {
            return Resolution::no_data();
        }
        if classic::required_size(&record) > buf.len() {
            return Resolution::buffer_too_small();
        }
        classic::encode(&record, buf);
        Resolution::success()
    }

    /// Forward lookup into the tuple-list layout.
    pub fn by_name_tuples(&self, name: &str, buf: &mut [u8]) -> Resolution {
        let record = match self.run_direction(&self.by_name_command, name) {
            Ok(record) => record,
            Err(early) => return early,
        };
        if !record.has_addresses() {
            return Resolution::no_data();
        }
        if tuples::required_size(&record) > buf.len() {
            return Resolution::buffer_too_small();
        }
        tuples::encode(&record, buf);
        Resolution::success()
    }

    /// Reverse lookup into the classic layout. Non-IPv4 families come back
    /// NotFound before any gate or subprocess work.
    pub fn by_addr(&self, address: IpAddr, buf: &mut [u8]) -> Resolution {
        let IpAddr::V4(v4) = address else {
            return Resolution::not_found();
        };
        let record = match self.run_direction(&self.by_addr_command, &v4.to_string()) {
            Ok(record) => record,
            Err(early) => return early,
        };
        if !record.has_name() {
            return Resolution::no_data();
        }
        if classic::required_size(&record) > buf.len() {
            return Resolution::buffer_too_small();
        }
        classic::encode(&record, buf);
        Resolution::success()
    }

    /// Gate, run, and parse one direction. `Err` carries the early exit.
    fn run_direction(&self, program: &Path, argument: &str) -> Result<HostRecord, Resolution> {
        if !trust::executable_is_trusted(program, self.requirements) {
            return Err(Resolution::unavailable());
        }
        let output =
            self.runner.run(program, argument).map_err(|_| Resolution::unavailable())?;
        if output.exit_code != 0 {
            return Err(Resolution::from_command_exit(output.exit_code));
        }
        Ok(parse::parse(&output.stdout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::read_cstr;
    use crate::record::HostRecord;
    use crate::runner::CommandOutput;
    use crate::status::{
        ERANGE, HOST_NOT_FOUND, NETDB_INTERNAL, NETDB_SUCCESS, NO_DATA, NO_RECOVERY, Outcome,
        TRY_AGAIN,
    };
    use std::cell::{Cell, RefCell};
    use std::fs;
    use std::io;
    use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
    use std::os::unix::fs::{MetadataExt, PermissionsExt};
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicU64, Ordering};

    const SCENARIO: &str =
        "name: myhost.local.\nalias: myhost\nalias: myalias.local.\nip4:127.0.0.1\nip4:127.0.0.2\n";

    static TEST_SEQ: AtomicU64 = AtomicU64::new(0);

    fn temp_path(prefix: &str) -> PathBuf {
        let seq = TEST_SEQ.fetch_add(1, Ordering::Relaxed);
        std::env::temp_dir().join(format!("nsscmd-{prefix}-{}-{seq}", std::process::id()))
    }

    /// Replays a canned exit code and stdout without spawning anything.
    struct ScriptedRunner {
        exit_code: i32,
        stdout: String,
        fail_io: bool,
        calls: Cell<u32>,
        last_argument: RefCell<Option<String>>,
    }

    impl ScriptedRunner {
        fn new(exit_code: i32, stdout: &str) -> Self {
            Self {
                exit_code,
                stdout: stdout.to_string(),
                fail_io: false,
                calls: Cell::new(0),
                last_argument: RefCell::new(None),
            }
        }

        fn failing_io() -> Self {
            Self { fail_io: true, ..Self::new(0, "") }
        }
    }

    impl CommandRunner for ScriptedRunner {
        fn run(&self, _program: &Path, argument: &str) -> io::Result<CommandOutput> {
            self.calls.set(self.calls.get() + 1);
            *self.last_argument.borrow_mut() = Some(argument.to_string());
            if self.fail_io {
                return Err(io::Error::from(io::ErrorKind::NotFound));
            }
            Ok(CommandOutput { exit_code: self.exit_code, stdout: self.stdout.clone() })
        }
    }

    struct Fixture {
        resolver: CommandResolver<ScriptedRunner>,
        gate_file: PathBuf,
    }

    impl Drop for Fixture {
        fn drop(&mut self) {
            let _ = fs::remove_file(&self.gate_file);
        }
    }

    /// A resolver whose gate passes against a file this test owns.
    fn scripted(runner: ScriptedRunner) -> Fixture {
        let gate_file = temp_path("resolve-gate");
        fs::write(&gate_file, b"#!/bin/sh\n").expect("gate file should be writable");
        let metadata = fs::metadata(&gate_file).expect("gate file should stat");
        let requirements =
            TrustRequirements { owner_uid: metadata.uid(), mode: metadata.mode() };
        let resolver = CommandResolver::new(runner, &gate_file, &gate_file)
            .with_requirements(requirements);
        Fixture { resolver, gate_file }
    }

    fn scenario_record() -> HostRecord {
        HostRecord {
            name: "myhost.local.".to_string(),
            aliases: vec!["myhost".to_string(), "myalias.local.".to_string()],
            addresses: vec![Ipv4Addr::new(127, 0, 0, 1), Ipv4Addr::new(127, 0, 0, 2)],
        }
    }

    #[test]
    fn by_name_success_fills_the_buffer_and_reports_success_codes() {
        let fixture = scripted(ScriptedRunner::new(0, SCENARIO));
        let mut buf = vec![0u8; 1024];

        let resolution = fixture.resolver.by_name("myhost", &mut buf);
        assert_eq!(resolution, Resolution::success());
        assert_eq!((resolution.errno, resolution.h_errno), (0, NETDB_SUCCESS));
        assert_eq!(classic::decode(&buf), scenario_record());
    }

    #[test]
    fn by_name_passes_the_name_through_verbatim() {
        let fixture = scripted(ScriptedRunner::new(0, SCENARIO));
        let mut buf = vec![0u8; 1024];
        fixture.resolver.by_name("myhost.local.", &mut buf);
        assert_eq!(
            fixture.resolver.runner.last_argument.borrow().as_deref(),
            Some("myhost.local.")
        );
    }

    #[test]
    fn an_undersized_buffer_is_try_again_and_stays_untouched() {
        let fixture = scripted(ScriptedRunner::new(0, SCENARIO));
        let mut buf = vec![0xAAu8; 16];

        let resolution = fixture.resolver.by_name("myhost", &mut buf);
        assert_eq!(resolution.outcome, Outcome::TryAgain);
        assert_eq!(resolution.errno, ERANGE);
        assert_eq!(resolution.h_errno, NETDB_INTERNAL);
        assert!(buf.iter().all(|&b| b == 0xAA));
    }

    #[test]
    fn a_retry_with_a_big_enough_buffer_succeeds_on_the_same_output() {
        let fixture = scripted(ScriptedRunner::new(0, SCENARIO));
        let needed = classic::required_size(&scenario_record());

        let mut small = vec![0u8; needed - 1];
        assert_eq!(
            fixture.resolver.by_name("myhost", &mut small),
            Resolution::buffer_too_small()
        );

        let mut exact = vec![0u8; needed];
        assert_eq!(fixture.resolver.by_name("myhost", &mut exact), Resolution::success());
        assert_eq!(classic::decode(&exact), scenario_record());
    }

    #[test]
    fn command_exit_codes_become_their_documented_outcomes() {
        for (exit_code, expected, h_errno) in [
            (1, Outcome::NotFound, HOST_NOT_FOUND),
            (2, Outcome::TryAgain, TRY_AGAIN),
            (4, Outcome::NoData, NO_DATA),
            (3, Outcome::Unavailable, NO_RECOVERY),
            (77, Outcome::Unavailable, NO_RECOVERY),
        ] {
            let fixture = scripted(ScriptedRunner::new(exit_code, SCENARIO));
            let mut buf = vec![0u8; 1024];
            let resolution = fixture.resolver.by_name("myhost", &mut buf);
            assert_eq!(resolution.outcome, expected, "exit code {exit_code}");
            assert_eq!(resolution.h_errno, h_errno, "exit code {exit_code}");
            assert_eq!(resolution.errno, 0);
        }
    }

    #[test]
    fn a_record_without_addresses_is_no_data_for_forward_lookups() {
        let fixture = scripted(ScriptedRunner::new(0, "name: myhost.local.\n"));
        let mut buf = vec![0u8; 1024];
        assert_eq!(fixture.resolver.by_name("myhost", &mut buf), Resolution::no_data());
        assert_eq!(
            fixture.resolver.by_name_tuples("myhost", &mut buf),
            Resolution::no_data()
        );
    }

    #[test]
    fn by_name_tuples_encodes_a_walkable_chain() {
        let fixture = scripted(ScriptedRunner::new(0, SCENARIO));
        let mut buf = vec![0u8; 1024];

        assert_eq!(
            fixture.resolver.by_name_tuples("myhost", &mut buf),
            Resolution::success()
        );
        let chain = tuples::walk(&buf);
        assert_eq!(chain.len(), 2);
        assert_eq!(chain[0].address, Ipv4Addr::new(127, 0, 0, 1));
        assert_eq!(chain[1].address, Ipv4Addr::new(127, 0, 0, 2));
        assert_eq!(read_cstr(&buf, chain[0].name_at), "myhost.local.");
    }

    #[test]
    fn by_addr_formats_the_address_as_a_dotted_quad_argument() {
        let fixture = scripted(ScriptedRunner::new(0, "name: myhost.local.\n"));
        let mut buf = vec![0u8; 1024];

        let resolution = fixture
            .resolver
            .by_addr(IpAddr::V4(Ipv4Addr::new(192, 0, 2, 33)), &mut buf);
        assert_eq!(resolution, Resolution::success());
        assert_eq!(
            fixture.resolver.runner.last_argument.borrow().as_deref(),
            Some("192.0.2.33")
        );
        assert_eq!(classic::decode(&buf).name, "myhost.local.");
    }

    #[test]
    fn by_addr_without_a_name_is_no_data() {
        let fixture = scripted(ScriptedRunner::new(0, "ip4: 127.0.0.1\n"));
        let mut buf = vec![0u8; 1024];
        let resolution = fixture
            .resolver
            .by_addr(IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)), &mut buf);
        assert_eq!(resolution, Resolution::no_data());
    }

    #[test]
    fn by_addr_rejects_ipv6_before_gate_and_subprocess() {
        // No gate file exists for this resolver; NotFound must come first.
        let resolver = CommandResolver::new(
            ScriptedRunner::new(0, SCENARIO),
            "/nonexistent/by-name",
            "/nonexistent/by-addr",
        );
        let mut buf = vec![0u8; 1024];

        let resolution = resolver.by_addr(IpAddr::V6(Ipv6Addr::LOCALHOST), &mut buf);
        assert_eq!(resolution, Resolution::not_found());
        assert_eq!(resolver.runner.calls.get(), 0);
    }

    #[test]
    fn an_untrusted_command_is_unavailable_without_spawning() {
        let gate_file = temp_path("resolve-untrusted");
        fs::write(&gate_file, b"#!/bin/sh\n").expect("gate file should be writable");
        fs::set_permissions(&gate_file, fs::Permissions::from_mode(0o644))
            .expect("chmod should succeed");

        // Production rule: mode 0644 never matches, whoever owns the file.
        let resolver = CommandResolver::new(
            ScriptedRunner::new(0, SCENARIO),
            &gate_file,
            &gate_file,
        );
        let mut buf = vec![0u8; 1024];

        let resolution = resolver.by_name("myhost", &mut buf);
        assert_eq!(resolution, Resolution::unavailable());
        assert_eq!(resolver.runner.calls.get(), 0);
        fs::remove_file(&gate_file).expect("cleanup");
    }

    #[test]
    fn a_runner_io_failure_is_unavailable() {
        let fixture = scripted(ScriptedRunner::failing_io());
        let mut buf = vec![0u8; 1024];
        let resolution = fixture.resolver.by_name("myhost", &mut buf);
        assert_eq!(resolution, Resolution::unavailable());
        assert_eq!(resolution.h_errno, NO_RECOVERY);
    }
}
