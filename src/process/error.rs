// ABOUTME: Error types for spawning and supervising child processes.
// ABOUTME: A non-zero exit carries the buffered stderr alongside the exit code.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to wait for {program}: {source}")]
    Wait {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with code {code}: {stderr}")]
    NonZeroExit {
        program: String,
        code: i32,
        stderr: String,
    },
}

impl ProcessError {
    /// Exit code to propagate when this error ends the command.
    pub fn exit_code(&self) -> i32 {
        match self {
            ProcessError::NonZeroExit { code, .. } => *code,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, ProcessError>;
