// ABOUTME: Streaming subprocess runner for the delegated pack binary.
// ABOUTME: Forwards stdout chunk by chunk while buffering stderr until the child exits.

use super::LogSink;
use super::error::{ProcessError, Result};
use std::collections::HashMap;
use std::path::Path;
use std::process::Stdio;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;

const CHUNK_SIZE: usize = 8192;

/// Result of a streamed process run.
///
/// Stdout is not retained: it has already been forwarded to the sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutcome {
    /// Exit code of the child (-1 when terminated by a signal).
    pub exit_code: i32,
    /// Everything the child wrote to stderr.
    pub stderr: String,
}

impl ProcessOutcome {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Turn a non-zero exit into an error carrying the buffered stderr.
    pub fn into_result(self, program: &str) -> Result<Self> {
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

/// Run `executable` with `args`, overlaying `envs` on the inherited environment.
///
/// Resolves once the child has exited. No timeout is applied.
pub async fn run(
    executable: &Path,
    args: &[String],
    envs: &HashMap<String, String>,
    sink: &dyn LogSink,
) -> Result<ProcessOutcome> {
    let mut cmd = Command::new(executable);
    cmd.args(args).envs(envs);
    run_command(cmd, &executable.display().to_string(), sink).await
}

/// Run a prepared command, streaming stdout into `sink` and buffering stderr.
pub async fn run_command(
    mut cmd: Command,
    program: &str,
    sink: &dyn LogSink,
) -> Result<ProcessOutcome> {
    cmd.stdin(Stdio::inherit())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    tracing::debug!(program, "spawning process");

    let mut child = cmd.spawn().map_err(|source| ProcessError::Spawn {
        program: program.to_string(),
        source,
    })?;

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    let ((), stderr, status) = tokio::join!(
        forward_output(stdout, sink),
        collect_output(stderr),
        child.wait()
    );

    let status = status.map_err(|source| ProcessError::Wait {
        program: program.to_string(),
        source,
    })?;

    let outcome = ProcessOutcome {
        exit_code: status.code().unwrap_or(-1),
        stderr,
    };
    tracing::debug!(program, exit_code = outcome.exit_code, "process exited");
    Ok(outcome)
}

/// Forward a stream to the sink as chunks arrive.
async fn forward_output<R>(stream: Option<R>, sink: &dyn LogSink)
where
    R: AsyncRead + Unpin,
{
    let Some(mut reader) = stream else {
        return;
    };

    let mut tmp = [0u8; CHUNK_SIZE];
    let mut pending = Vec::new();
    loop {
        match reader.read(&mut tmp).await {
            Ok(0) => break,
            Ok(n) => {
                pending.extend_from_slice(&tmp[..n]);
                let text = take_complete_utf8(&mut pending);
                if !text.is_empty() {
                    sink.log(&text);
                }
            }
            Err(e) => {
                tracing::warn!("stopped reading process output: {}", e);
                break;
            }
        }
    }

    if !pending.is_empty() {
        sink.log(&String::from_utf8_lossy(&pending));
    }
}

/// Read a stream to the end.
async fn collect_output<R>(stream: Option<R>) -> String
where
    R: AsyncRead + Unpin,
{
    let mut buf = Vec::new();
    if let Some(mut reader) = stream
        && let Err(e) = reader.read_to_end(&mut buf).await
    {
        tracing::warn!("stopped reading process stderr: {}", e);
    }
    String::from_utf8_lossy(&buf).to_string()
}

/// Drain the longest valid UTF-8 prefix, keeping a split trailing sequence for later.
fn take_complete_utf8(pending: &mut Vec<u8>) -> String {
    let valid_up_to = match std::str::from_utf8(pending) {
        Ok(_) => pending.len(),
        // Incomplete sequence at the end: hold it back.
        Err(e) if e.error_len().is_none() => e.valid_up_to(),
        Err(_) => pending.len(),
    };
    let rest = pending.split_off(valid_up_to);
    let text = String::from_utf8_lossy(pending).to_string();
    *pending = rest;
    text
}
