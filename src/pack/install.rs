// ABOUTME: Downloads, verifies and unpacks the pinned pack release into the cache directory.
// ABOUTME: Skips everything when an executable pack binary is already present.

use super::archive::{self, ArchiveKind};
use super::error::{InstallError, Result};
use crate::config::Settings;
use crate::output::Output;
use crate::runtime::{Arch, Os, Target};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

const BINARY_NAME: &str = "pack";

/// Release asset suffix for a target, e.g. `linux-arm64` or `macos`.
pub fn naming_convention(target: &Target) -> Result<&'static str> {
    let name = match (target.os, target.arch) {
        (Os::Linux, Arch::X64) => "linux",
        (Os::Linux, Arch::Arm64) => "linux-arm64",
        (Os::Linux, Arch::Ppc64) => "linux-ppc64le",
        (Os::Linux, Arch::S390x) => "linux-s390x",
        (Os::Darwin, Arch::X64) => "macos",
        (Os::Darwin, Arch::Arm64) => "macos-arm64",
        (Os::Windows, Arch::X64) => "windows",
        (os, arch) => {
            return Err(InstallError::UnsupportedPlatform {
                os: os.to_string(),
                arch: arch.to_string(),
            });
        }
    };
    Ok(name)
}

/// Download URL of the pack release archive for `target`.
pub fn release_url(base_url: &str, version: &str, target: &Target) -> Result<String> {
    let naming = naming_convention(target)?;
    let extension = ArchiveKind::for_os(target.os).extension();
    Ok(format!(
        "{}/buildpacks/pack/releases/download/v{version}/pack-v{version}-{naming}.{extension}",
        base_url.trim_end_matches('/')
    ))
}

/// Compare the SHA-256 of `data` with the first token of a `.sha256` sidecar.
pub fn verify_checksum(data: &[u8], sidecar: &str) -> Result<()> {
    let expected = sidecar
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_lowercase();

    if expected.len() != 64 || !expected.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(InstallError::InvalidChecksum(sidecar.trim().to_string()));
    }

    let actual = format!("{:x}", Sha256::digest(data));
    if actual != expected {
        return Err(InstallError::ChecksumMismatch { expected, actual });
    }
    Ok(())
}

/// A regular file the current user may execute.
pub fn is_executable(path: &Path) -> bool {
    let Ok(metadata) = std::fs::metadata(path) else {
        return false;
    };
    if !metadata.is_file() {
        return false;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        metadata.permissions().mode() & 0o111 != 0
    }
    #[cfg(not(unix))]
    {
        true
    }
}

/// Provisions the pack binary for one target.
pub struct Installer {
    client: reqwest::Client,
    cache_dir: PathBuf,
    version: String,
    base_url: String,
    target: Target,
}

impl Installer {
    pub fn new(
        cache_dir: impl Into<PathBuf>,
        version: impl Into<String>,
        base_url: impl Into<String>,
        target: Target,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("paicku/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(InstallError::Client)?;

        Ok(Self {
            client,
            cache_dir: cache_dir.into(),
            version: version.into(),
            base_url: base_url.into(),
            target,
        })
    }

    pub fn from_settings(settings: &Settings, target: Target) -> Result<Self> {
        Self::new(
            &settings.cache_dir,
            &settings.pack_version,
            &settings.github_base_url,
            target,
        )
    }

    /// Where the pack executable lives once installed.
    pub fn binary_path(&self) -> PathBuf {
        self.cache_dir.join(BINARY_NAME)
    }

    pub fn release_url(&self) -> Result<String> {
        release_url(&self.base_url, &self.version, &self.target)
    }

    /// Make sure `<cache>/pack` exists and is executable.
    ///
    /// Returns the binary path. Downloads only when the binary is missing.
    pub async fn ensure_installed(&self, output: &Output) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.cache_dir).await?;

        let binary = self.binary_path();
        if is_executable(&binary) {
            tracing::debug!(path = %binary.display(), "pack already installed");
            return Ok(binary);
        }

        let url = self.release_url()?;
        let kind = ArchiveKind::for_os(self.target.os);
        let archive_path = self
            .cache_dir
            .join(format!("{BINARY_NAME}.{}", kind.extension()));
        let checksum_path = archive_path.with_extension(format!("{}.sha256", kind.extension()));

        output.progress(&format!(
            "Downloading pack binary with version {} for {} to {}",
            self.version,
            self.target.arch,
            self.cache_dir.display()
        ));
        let archive = self.download(&url).await?;
        tokio::fs::write(&archive_path, &archive).await?;

        output.progress("Downloading pack sha256 checksum");
        let sidecar = self.download(&format!("{url}.sha256")).await?;
        tokio::fs::write(&checksum_path, &sidecar).await?;

        verify_checksum(&archive, &String::from_utf8_lossy(&sidecar))?;
        tracing::debug!(url, "checksum verified");

        let dest = self.cache_dir.clone();
        let source = archive_path.clone();
        tokio::task::spawn_blocking(move || archive::extract(&source, &dest, kind))
            .await
            .map_err(|e| InstallError::Extract {
                path: archive_path.clone(),
                reason: e.to_string(),
            })??;

        self.finalize_binary(&binary).await?;

        tokio::fs::remove_file(&archive_path).await?;
        tokio::fs::remove_file(&checksum_path).await?;

        tracing::info!(path = %binary.display(), version = %self.version, "pack installed");
        Ok(binary)
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>> {
        tracing::debug!(url, "downloading");
        let download_error = |source| InstallError::Download {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(download_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(InstallError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await.map_err(download_error)?;
        Ok(bytes.to_vec())
    }

    /// Windows archives ship `pack.exe`; elsewhere the extracted file needs the exec bit.
    async fn finalize_binary(&self, binary: &Path) -> Result<()> {
        if self.target.os == Os::Windows {
            let exe = self.cache_dir.join(format!("{BINARY_NAME}.exe"));
            tokio::fs::rename(&exe, binary)
                .await
                .map_err(|_| InstallError::MissingBinary(exe))?;
            return Ok(());
        }

        let metadata = tokio::fs::metadata(binary)
            .await
            .map_err(|_| InstallError::MissingBinary(binary.to_path_buf()))?;
        if !metadata.is_file() {
            return Err(InstallError::MissingBinary(binary.to_path_buf()));
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tokio::fs::set_permissions(binary, std::fs::Permissions::from_mode(0o755))
                .await
                .map_err(|source| InstallError::Permissions {
                    path: binary.to_path_buf(),
                    source,
                })?;
            tracing::debug!(path = %binary.display(), "changed permissions to 755");
        }
        Ok(())
    }
}
