// ABOUTME: Commands that forward straight to pack without a runtime connection.
// ABOUTME: inspect, sbom download and builder suggest.

use crate::cli::{BuilderSuggestArgs, InspectArgs, SbomDownloadArgs};
use paicku::error::Result;
use paicku::output::Output;
use paicku::pack::PackArgs;
use paicku::process;
use std::collections::HashMap;
use std::path::Path;

pub async fn inspect(pack: &Path, args: &InspectArgs, output: &Output) -> Result<()> {
    run_pack(pack, args.to_pack_args(), output).await
}

pub async fn sbom_download(pack: &Path, args: &SbomDownloadArgs, output: &Output) -> Result<()> {
    run_pack(pack, args.to_pack_args(), output).await
}

pub async fn builder_suggest(
    pack: &Path,
    args: &BuilderSuggestArgs,
    output: &Output,
) -> Result<()> {
    run_pack(pack, args.to_pack_args(), output).await
}

async fn run_pack(pack: &Path, args: PackArgs, output: &Output) -> Result<()> {
    tracing::debug!(argv = ?args.as_slice(), "running pack");
    process::run(pack, args.as_slice(), &HashMap::new(), output)
        .await?
        .into_result("pack")?;
    Ok(())
}
