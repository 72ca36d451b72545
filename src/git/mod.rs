// ABOUTME: Resolution of the build source: local paths, local repositories and remote git URLs.
// ABOUTME: Remote sources are shallow-cloned into the cache and removed after the build.

mod clone;
mod error;
mod source;

pub use clone::{cleanup_cloned_repos, clone_repo, repo_name};
pub use error::{Result, SourceError};
pub use source::{Source, parse_source, split_source};
