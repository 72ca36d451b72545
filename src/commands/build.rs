// ABOUTME: Build command implementation.
// ABOUTME: Picks and configures a runtime, resolves the source, then runs pack build.

use super::report_warnings;
use super::runtime_setup::prepare_runtime;
use crate::cli::{BuildArgs, DEFAULT_BUILDER};
use paicku::config::Settings;
use paicku::diagnostics::Diagnostics;
use paicku::error::Result;
use paicku::git::{self, Source};
use paicku::output::Output;
use paicku::process::{self, SystemRunner};
use paicku::runtime::Target;
use paicku::ssh::SshTrust;
use std::path::Path;

pub async fn build(
    pack: &Path,
    args: &BuildArgs,
    settings: &Settings,
    target: Target,
    mut output: Output,
) -> Result<()> {
    output.start_timer();
    let mut diag = Diagnostics::default();

    let result = run_build(pack, args, settings, target, &output, &mut diag).await;

    // Clones are removed whether or not the build succeeded.
    git::cleanup_cloned_repos(&settings.cache_dir, &mut diag).await;
    report_warnings(&diag, &output);

    result
}

async fn run_build(
    pack: &Path,
    args: &BuildArgs,
    settings: &Settings,
    target: Target,
    output: &Output,
    diag: &mut Diagnostics,
) -> Result<()> {
    let runner = SystemRunner;
    let trust = SshTrust::new();

    let requested = args.container_runtime.or(settings.container_runtime);
    let (_, configuration) =
        prepare_runtime(requested, &target, &runner, &trust, output, diag).await?;

    let image = match &args.image_name {
        Some(image) => image.clone(),
        None => {
            let image = format!("image-paicku-{}", uuid::Uuid::new_v4());
            output.warning(&format!(
                "You haven't specified an image name, using a random one: {image}"
            ));
            image
        }
    };

    let builder = match &args.builder {
        Some(builder) => builder.clone(),
        None => {
            output.warning(&format!(
                "You haven't specified a builder, using the default one: {DEFAULT_BUILDER}"
            ));
            DEFAULT_BUILDER.to_string()
        }
    };

    let path = match git::parse_source(&args.path, &runner).await? {
        Source::PassThrough(path) => path,
        Source::Clone { url, context } => {
            let clone = git::clone_repo(&url, &settings.cache_dir, &runner, output).await?;
            output.progress(&format!("Repository cloned into {}", clone.display()));
            clone.join(context).display().to_string()
        }
    };

    let argv = args
        .to_pack_args(&image, &builder, &path)
        .extend(configuration.flags())
        .into_vec();

    output.progress(&format!("Building image {image} with builder {builder}"));
    tracing::debug!(?argv, envs = ?configuration.envs(), "running pack");

    process::run(pack, &argv, &configuration.envs(), output)
        .await?
        .into_result("pack")?;

    output.success(&format!("Built image {image}"));
    Ok(())
}
