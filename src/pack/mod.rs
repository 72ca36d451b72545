// ABOUTME: The delegated pack binary: argv rendering and on-demand provisioning.
// ABOUTME: Downloads a pinned pack release into the cache directory when it is missing.

mod archive;
mod args;
mod error;
mod install;

pub use archive::{ArchiveKind, extract};
pub use args::PackArgs;
pub use error::{InstallError, Result};
pub use install::{Installer, is_executable, naming_convention, release_url, verify_checksum};
