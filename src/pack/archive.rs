// ABOUTME: Extraction of pack release archives.
// ABOUTME: tgz on POSIX targets, zip on Windows.

use super::error::{InstallError, Result};
use crate::runtime::Os;
use flate2::read::GzDecoder;
use std::fs::File;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    Tgz,
    Zip,
}

impl ArchiveKind {
    pub fn for_os(os: Os) -> Self {
        match os {
            Os::Windows => ArchiveKind::Zip,
            _ => ArchiveKind::Tgz,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ArchiveKind::Tgz => "tgz",
            ArchiveKind::Zip => "zip",
        }
    }
}

/// Unpack `archive` into `dest`, which must already exist.
pub fn extract(archive: &Path, dest: &Path, kind: ArchiveKind) -> Result<()> {
    if !dest.is_dir() {
        return Err(InstallError::Extract {
            path: archive.to_path_buf(),
            reason: format!("destination directory does not exist: {}", dest.display()),
        });
    }

    let file = File::open(archive)?;
    let failed = |reason: String| InstallError::Extract {
        path: archive.to_path_buf(),
        reason,
    };

    match kind {
        ArchiveKind::Tgz => tar::Archive::new(GzDecoder::new(file))
            .unpack(dest)
            .map_err(|e| failed(e.to_string()))?,
        ArchiveKind::Zip => zip::ZipArchive::new(file)
            .and_then(|mut zip| zip.extract(dest))
            .map_err(|e| failed(e.to_string()))?,
    }

    tracing::debug!(archive = %archive.display(), dest = %dest.display(), "extracted archive");
    Ok(())
}
