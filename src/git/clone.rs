// ABOUTME: Shallow clones of build sources into the cache and their removal afterwards.
// ABOUTME: git's stdout is streamed to the sink; its stderr is only shown on failure.

use super::error::{Result, SourceError};
use crate::config::CLONED_REPOS_DIRNAME;
use crate::diagnostics::{Diagnostics, Warning};
use crate::process::{self, CommandRunner, LogSink};
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Directory name stem for a clone of `url`: last path segment without `.git`.
pub fn repo_name(url: &str) -> String {
    let last = url
        .trim_end_matches(['/', '\\'])
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();
    let name = last.strip_suffix(".git").unwrap_or(last);
    if name.is_empty() {
        "repo".to_string()
    } else {
        name.to_string()
    }
}

/// Clone `url` with depth 1 into a fresh directory under `<cache>/tmp-cloned-repos`.
pub async fn clone_repo(
    url: &str,
    cache_dir: &Path,
    runner: &dyn CommandRunner,
    sink: &dyn LogSink,
) -> Result<PathBuf> {
    match runner.output("git", &["--version"]).await {
        Ok(output) if output.success() => {}
        _ => return Err(SourceError::GitNotInstalled),
    }

    let parent = cache_dir.join(CLONED_REPOS_DIRNAME);
    tokio::fs::create_dir_all(&parent)
        .await
        .map_err(cache_error(&parent))?;

    let target = tempfile::Builder::new()
        .prefix(&format!("{}-", repo_name(url)))
        .tempdir_in(&parent)
        .map_err(cache_error(&parent))?
        .keep();

    tracing::info!(url, path = %target.display(), "cloning repository");

    let mut cmd = Command::new("git");
    cmd.args(["clone", "--depth", "1", url]).arg(&target);
    let outcome = process::run_command(cmd, "git", sink).await?;

    if !outcome.success() {
        return Err(SourceError::CloneFailed {
            url: url.to_string(),
            code: outcome.exit_code,
            stderr: outcome.stderr,
        });
    }

    Ok(target)
}

fn cache_error(path: &Path) -> impl FnOnce(std::io::Error) -> SourceError + use<> {
    let path = path.to_path_buf();
    move |source| SourceError::CacheDir { path, source }
}

/// Remove every entry under `<cache>/tmp-cloned-repos`.
///
/// Failures are recorded as warnings; a missing directory is not an error.
pub async fn cleanup_cloned_repos(cache_dir: &Path, diag: &mut Diagnostics) {
    let parent = cache_dir.join(CLONED_REPOS_DIRNAME);
    let mut entries = match tokio::fs::read_dir(&parent).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return,
        Err(e) => {
            diag.warn(Warning::cleanup(format!(
                "Error reading {}: {e}",
                parent.display()
            )));
            return;
        }
    };

    loop {
        let entry = match entries.next_entry().await {
            Ok(Some(entry)) => entry,
            Ok(None) => break,
            Err(e) => {
                diag.warn(Warning::cleanup(format!(
                    "Error reading {}: {e}",
                    parent.display()
                )));
                break;
            }
        };

        let path = entry.path();
        let removed = match entry.file_type().await {
            Ok(kind) if kind.is_dir() => tokio::fs::remove_dir_all(&path).await,
            _ => tokio::fs::remove_file(&path).await,
        };

        match removed {
            Ok(()) => tracing::debug!(path = %path.display(), "removed cloned repository"),
            Err(e) => diag.warn(Warning::cleanup(format!(
                "Error deleting {}: {e}",
                path.display()
            ))),
        }
    }
}
