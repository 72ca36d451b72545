// ABOUTME: Error types for resolving and cloning build sources.
// ABOUTME: A failed clone carries git's exit code so it can be propagated.

use crate::process::ProcessError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("{url} is not a git repository: {message}")]
    NotARepository { url: String, message: String },

    #[error(
        "git is not installed in the system, please install it to clone a remote repository"
    )]
    GitNotInstalled,

    #[error("error creating directory in cache {path}: {source}")]
    CacheDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("git clone of {url} failed with code {code}: {stderr}")]
    CloneFailed {
        url: String,
        code: i32,
        stderr: String,
    },

    #[error(transparent)]
    Process(#[from] ProcessError),
}

impl SourceError {
    pub fn exit_code(&self) -> i32 {
        match self {
            SourceError::CloneFailed { code, .. } => *code,
            SourceError::Process(e) => e.exit_code(),
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, SourceError>;
