// ABOUTME: Application-wide error types for paicku.
// ABOUTME: Uses thiserror for ergonomic error handling and maps failures to exit codes.

use crate::git::SourceError;
use crate::pack::InstallError;
use crate::process::ProcessError;
use crate::runtime::{ConfigureError, RuntimeType};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("settings file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("could not determine a cache directory; set PAICKU_CACHE_DIR")]
    NoCacheDir,

    #[error("no available container runtime available in the system")]
    NoRuntimeInstalled,

    #[error("{0} is not installed")]
    RuntimeNotInstalled(RuntimeType),

    #[error(transparent)]
    Configure(#[from] ConfigureError),

    #[error(transparent)]
    Install(#[from] InstallError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Process(#[from] ProcessError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    /// Exit status for the paicku process when this error ends a command.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Process(e) => e.exit_code(),
            Error::Source(e) => e.exit_code(),
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
