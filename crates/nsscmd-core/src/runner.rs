//! Subprocess execution seam.
//!
//! Resolution calls into an injected [`CommandRunner`] rather than spawning
//! directly, so the whole pipeline above it stays testable without touching
//! the process table.

use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

/// Captured result of one resolver-command run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Process exit code; negative when the process died to a signal.
    pub exit_code: i32,
    /// Captured stdout, decoded lossily. Mojibake fails the per-line
    /// directive patterns and degrades to an empty field, never an error.
    pub stdout: String,
}

/// Runs a resolver executable with a single argument.
///
/// Implementations must tolerate concurrent calls; the production one spawns
/// a fresh process each time and holds no state.
pub trait CommandRunner {
    fn run(&self, program: &Path, argument: &str) -> io::Result<CommandOutput>;
}

/// Direct spawn: `argv = [program, argument]`, no shell in between, stderr
/// discarded, blocking until the child exits.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn run(&self, program: &Path, argument: &str) -> io::Result<CommandOutput> {
        let output = Command::new(program).arg(argument).stderr(Stdio::null()).output()?;
        Ok(CommandOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        })
    }
}
