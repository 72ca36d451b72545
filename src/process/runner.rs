// ABOUTME: Buffered command execution behind a trait so runtime logic can be tested.
// ABOUTME: SystemRunner shells out with tokio::process and captures both streams.

use super::error::{ProcessError, Result};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;

/// Output from a buffered command execution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code of the command (-1 when terminated by a signal).
    pub exit_code: i32,
    /// Standard output.
    pub stdout: String,
    /// Standard error.
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Turn a non-zero exit into an error carrying stderr.
    pub fn check(self, program: &str) -> Result<Self> {
        if self.success() {
            Ok(self)
        } else {
            Err(ProcessError::NonZeroExit {
                program: program.to_string(),
                code: self.exit_code,
                stderr: self.stderr,
            })
        }
    }
}

/// Runs short-lived helper commands (`podman info`, `systemctl`, `git`, `where`).
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args` to completion and capture its output.
    ///
    /// A non-zero exit is not an error at this level; callers decide.
    async fn output(&self, program: &str, args: &[&str]) -> Result<CommandOutput>;
}

/// Runs commands on the local machine.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn output(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        tracing::debug!(program, ?args, "running command");

        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|source| ProcessError::Spawn {
                program: program.to_string(),
                source,
            })?;

        let result = CommandOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        };

        tracing::debug!(program, exit_code = result.exit_code, "command finished");
        Ok(result)
    }
}
