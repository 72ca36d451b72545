// ABOUTME: Command module aggregator for the paicku CLI.
// ABOUTME: Re-exports the build, inspect, sbom and builder command handlers.

mod build;
mod passthrough;
mod runtime_setup;

pub use build::build;
pub use passthrough::{builder_suggest, inspect, sbom_download};

use paicku::config::Settings;
use paicku::diagnostics::Diagnostics;
use paicku::error::Result;
use paicku::output::Output;
use paicku::pack::Installer;
use paicku::runtime::Target;
use std::path::PathBuf;

/// Download pack into the cache unless it is already there.
pub async fn provision(settings: &Settings, target: Target, output: &Output) -> Result<PathBuf> {
    let installer = Installer::from_settings(settings, target)?;
    Ok(installer.ensure_installed(output).await?)
}

/// Print collected warnings.
fn report_warnings(diag: &Diagnostics, output: &Output) {
    for warning in diag.warnings() {
        output.warning(&warning.message);
    }
}
