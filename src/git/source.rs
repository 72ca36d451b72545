// ABOUTME: Classifies the `--path` argument of a build.
// ABOUTME: `<url-or-path>[:<context dir>]`, where `://` never acts as the separator.

use super::error::{Result, SourceError};
use crate::process::CommandRunner;
use std::path::Path;
use url::Url;

/// What pack should build from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Handed to pack unchanged.
    PassThrough(String),
    /// A repository to clone first; `context` is the directory inside the clone.
    Clone { url: String, context: String },
}

/// Split `path` into location and context directory.
///
/// The separator is the first `:` not followed by `//`. A missing context is `.`;
/// anything after a second separator is dropped.
pub fn split_source(path: &str) -> (&str, &str) {
    let separators: Vec<usize> = path
        .match_indices(':')
        .map(|(i, _)| i)
        .filter(|&i| !path[i + 1..].starts_with("//"))
        .collect();

    match separators.as_slice() {
        [] => (path, "."),
        [first] => (&path[..*first], &path[first + 1..]),
        [first, second, ..] => (&path[..*first], &path[first + 1..*second]),
    }
}

/// Decide how to feed `path` to pack.
pub async fn parse_source(path: &str, runner: &dyn CommandRunner) -> Result<Source> {
    let (location, context) = split_source(path);

    if let Ok(url) = Url::parse(location) {
        let output = runner
            .output("git", &["ls-remote", "--heads", location, "HEAD"])
            .await?;
        if !output.success() {
            return Err(SourceError::NotARepository {
                url: location.to_string(),
                message: output.stderr.trim().to_string(),
            });
        }
        tracing::debug!(%url, context, "remote git repository");
        return Ok(Source::Clone {
            url: url.to_string(),
            context: context.to_string(),
        });
    }

    // Archives and invalid paths are left for pack to report.
    if !Path::new(location).is_dir() {
        return Ok(Source::PassThrough(path.to_string()));
    }

    let remotes = match runner.output("git", &["-C", location, "remote", "-v"]).await {
        Ok(output) if output.success() => output.stdout,
        Ok(output) => {
            tracing::debug!(location, stderr = %output.stderr.trim(), "not a git working copy");
            return Ok(Source::PassThrough(path.to_string()));
        }
        Err(e) => {
            tracing::debug!(location, error = %e, "could not inspect git remotes");
            return Ok(Source::PassThrough(path.to_string()));
        }
    };

    // A working copy with remotes is the user's own checkout; one without is cloned.
    if !remotes.trim().is_empty() {
        return Ok(Source::PassThrough(path.to_string()));
    }

    tracing::debug!(location, context, "local repository without remotes");
    Ok(Source::Clone {
        url: location.to_string(),
        context: context.to_string(),
    })
}
