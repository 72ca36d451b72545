// ABOUTME: External process execution for runtime queries and the delegated pack binary.
// ABOUTME: Provides the CommandRunner seam and the streaming runner used for long builds.

mod error;
mod runner;
mod stream;

pub use error::{ProcessError, Result};
pub use runner::{CommandOutput, CommandRunner, SystemRunner};
pub use stream::{ProcessOutcome, run, run_command};

/// Destination for incremental subprocess output.
pub trait LogSink: Send + Sync {
    /// Forward one chunk of output as it arrives.
    fn log(&self, chunk: &str);
}
