// ABOUTME: Error types for provisioning the pack binary.
// ABOUTME: Every variant is fatal for the command that triggered provisioning.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InstallError {
    #[error("unsupported platform/architecture: {os}/{arch}")]
    UnsupportedPlatform { os: String, arch: String },

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("error downloading {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("error downloading {url}: HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("invalid checksum file: {0:?}")]
    InvalidChecksum(String),

    #[error("checksum mismatch expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    #[error("failed to extract {path}: {reason}")]
    Extract { path: PathBuf, reason: String },

    #[error("pack binary not found after extraction: {0}")]
    MissingBinary(PathBuf),

    #[error("failed to change permissions for {path}: {source}")]
    Permissions {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, InstallError>;
