// ABOUTME: Discovery of installed container runtimes and priority-based selection.
// ABOUTME: POSIX hosts probe PATH per runtime; Windows issues one batch `where` lookup.

use super::target::Os;
use super::types::RuntimeType;
use crate::process::CommandRunner;
use futures::future::join_all;
use std::ffi::OsString;

/// Return the candidates that are installed, preserving input order.
///
/// Never fails: a runtime that cannot be found is left out. Callers treat an
/// empty result as fatal.
pub async fn discover_installed(
    candidates: &[RuntimeType],
    os: Os,
    runner: &dyn CommandRunner,
) -> Vec<RuntimeType> {
    discover_installed_in(candidates, os, None, runner).await
}

/// Like [`discover_installed`], searching `search_path` instead of `PATH` on POSIX hosts.
pub async fn discover_installed_in(
    candidates: &[RuntimeType],
    os: Os,
    search_path: Option<OsString>,
    runner: &dyn CommandRunner,
) -> Vec<RuntimeType> {
    let installed = match os {
        os if os.is_posix() => probe_path(candidates, search_path).await,
        Os::Windows => batch_where(candidates, runner).await,
        _ => {
            tracing::debug!("runtime discovery is not supported on {}", os);
            Vec::new()
        }
    };

    tracing::debug!(?candidates, ?installed, "runtime discovery finished");
    installed
}

/// Probe each candidate independently; one failing probe never hides the others.
async fn probe_path(candidates: &[RuntimeType], search_path: Option<OsString>) -> Vec<RuntimeType> {
    let probes = candidates.iter().map(|&runtime| {
        let search_path = search_path.clone();
        async move {
            let name = runtime.binary_name();
            let found = tokio::task::spawn_blocking(move || lookup(name, search_path))
                .await
                .unwrap_or_else(|e| {
                    tracing::debug!(runtime = name, "probe task failed: {}", e);
                    false
                });
            found.then_some(runtime)
        }
    });

    join_all(probes).await.into_iter().flatten().collect()
}

fn lookup(name: &str, search_path: Option<OsString>) -> bool {
    let result = match search_path {
        Some(paths) => std::env::current_dir()
            .map_err(|e| e.to_string())
            .and_then(|cwd| which::which_in(name, Some(paths), cwd).map_err(|e| e.to_string())),
        None => which::which(name).map_err(|e| e.to_string()),
    };

    match result {
        Ok(path) => {
            tracing::debug!(runtime = name, path = %path.display(), "found runtime");
            true
        }
        Err(e) => {
            tracing::debug!(runtime = name, "runtime not found: {}", e);
            false
        }
    }
}

/// Single `where` call for every candidate. Any failure yields no runtimes at all.
async fn batch_where(candidates: &[RuntimeType], runner: &dyn CommandRunner) -> Vec<RuntimeType> {
    let names: Vec<&str> = candidates.iter().map(|r| r.binary_name()).collect();

    let output = match runner.output("where", &names).await {
        Ok(output) if output.success() => output,
        Ok(output) => {
            tracing::debug!(exit_code = output.exit_code, "`where` lookup failed");
            return Vec::new();
        }
        Err(e) => {
            tracing::debug!("`where` lookup failed: {}", e);
            return Vec::new();
        }
    };

    let found: Vec<String> = output
        .stdout
        .lines()
        .filter_map(executable_stem)
        .collect();

    candidates
        .iter()
        .copied()
        .filter(|r| found.iter().any(|stem| stem == r.binary_name()))
        .collect()
}

/// `C:\Program Files\Docker\docker.exe` -> `docker`
fn executable_stem(line: &str) -> Option<String> {
    let line = line.trim();
    let file = line.rsplit(['\\', '/']).next()?;
    let stem = file.split('.').next()?;
    (!stem.is_empty()).then(|| stem.to_ascii_lowercase())
}

/// Order `installed` by each entry's position in `priority`.
///
/// The sort is stable; entries missing from `priority` keep their relative
/// order and go after every prioritised entry.
pub fn select_preferred<T>(installed: &[T], priority: &[T]) -> Vec<T>
where
    T: PartialEq + Clone,
{
    let mut ordered = installed.to_vec();
    ordered.sort_by_key(|item| {
        priority
            .iter()
            .position(|p| p == item)
            .unwrap_or(usize::MAX)
    });
    ordered
}
