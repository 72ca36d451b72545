// ABOUTME: Settings for paicku: cache location, pinned pack version and download source.
// ABOUTME: Merges an optional YAML settings file with PAICKU_* environment overrides.

use crate::error::{Error, Result};
use crate::runtime::RuntimeType;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// pack release used when nothing overrides it.
pub const PACK_VERSION: &str = "0.36.4";
pub const DEFAULT_GITHUB_BASE_URL: &str = "https://github.com";

pub const CONFIG_ENV: &str = "PAICKU_CONFIG";
pub const CACHE_DIR_ENV: &str = "PAICKU_CACHE_DIR";
pub const PACK_VERSION_ENV: &str = "PAICKU_PACK_VERSION";
pub const GITHUB_BASE_URL_ENV: &str = "PAICKU_GITHUB_BASE_URL";

pub const CONFIG_FILENAME: &str = "config.yml";
pub const CLONED_REPOS_DIRNAME: &str = "tmp-cloned-repos";

const APP_DIRNAME: &str = "paicku";

/// Contents of the optional settings file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettingsFile {
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,

    #[serde(default)]
    pub pack_version: Option<String>,

    #[serde(default)]
    pub github_base_url: Option<String>,

    /// Runtime to use when `--container-runtime` is not given.
    #[serde(default)]
    pub container_runtime: Option<RuntimeType>,
}

impl SettingsFile {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty file deserializes to unit, not a map.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).map_err(Error::from)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }
}

/// Effective settings for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub cache_dir: PathBuf,
    pub pack_version: String,
    pub github_base_url: String,
    pub container_runtime: Option<RuntimeType>,
}

impl Settings {
    /// Load the settings file (if any) and apply environment overrides.
    pub fn load() -> Result<Self> {
        let file = match Self::settings_path()? {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading settings file");
                SettingsFile::load(&path)?
            }
            None => SettingsFile::default(),
        };

        Self::resolve(file, |key| std::env::var(key).ok(), dirs::cache_dir())
    }

    /// Combine file values, environment overrides and defaults.
    ///
    /// Precedence: environment, then file, then built-in default.
    pub fn resolve<F>(
        file: SettingsFile,
        env: F,
        default_cache_root: Option<PathBuf>,
    ) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        let cache_dir = match env(CACHE_DIR_ENV).map(PathBuf::from).or(file.cache_dir) {
            Some(dir) => dir,
            None => default_cache_root
                .map(|root| root.join(APP_DIRNAME))
                .ok_or(Error::NoCacheDir)?,
        };

        let pack_version = env(PACK_VERSION_ENV)
            .or(file.pack_version)
            .unwrap_or_else(|| PACK_VERSION.to_string());
        let pack_version = pack_version
            .strip_prefix('v')
            .unwrap_or(&pack_version)
            .to_string();

        let github_base_url = env(GITHUB_BASE_URL_ENV)
            .or(file.github_base_url)
            .unwrap_or_else(|| DEFAULT_GITHUB_BASE_URL.to_string());
        let github_base_url = github_base_url.trim_end_matches('/').to_string();

        Ok(Self {
            cache_dir,
            pack_version,
            github_base_url,
            container_runtime: file.container_runtime,
        })
    }

    /// `$PAICKU_CONFIG` if set (must exist), else the per-user file when present.
    fn settings_path() -> Result<Option<PathBuf>> {
        if let Ok(explicit) = std::env::var(CONFIG_ENV) {
            let path = PathBuf::from(explicit);
            if !path.is_file() {
                return Err(Error::ConfigNotFound(path));
            }
            return Ok(Some(path));
        }

        Ok(dirs::config_dir()
            .map(|dir| dir.join(APP_DIRNAME).join(CONFIG_FILENAME))
            .filter(|path| path.is_file()))
    }
}
