// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines the pack-backed subcommands and renders their flags into pack argv.

use clap::{Args, Parser, Subcommand};
use paicku::pack::PackArgs;
use paicku::runtime::RuntimeType;

pub const DEFAULT_BUILDER: &str = "paketocommunity/builder-ubi8-base";

#[derive(Parser)]
#[command(name = "paicku")]
#[command(about = "Build container images with Cloud Native Buildpacks on Docker or Podman")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn global(&self) -> &GlobalArgs {
        match &self.command {
            Commands::Build(args) => &args.global,
            Commands::Inspect(args) => &args.global,
            Commands::Sbom {
                command: SbomCommands::Download(args),
            } => &args.global,
            Commands::Builder {
                command: BuilderCommands::Suggest(args),
            } => &args.global,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build an image
    Build(BuildArgs),

    /// Show information about a built app image
    #[command(alias = "inspect-image")]
    Inspect(InspectArgs),

    /// Interact with SBoM
    Sbom {
        #[command(subcommand)]
        command: SbomCommands,
    },

    /// Interact with builders
    Builder {
        #[command(subcommand)]
        command: BuilderCommands,
    },
}

#[derive(Subcommand)]
pub enum SbomCommands {
    /// Download SBoM from an image
    Download(SbomDownloadArgs),
}

#[derive(Subcommand)]
pub enum BuilderCommands {
    /// List the recommended builders
    Suggest(BuilderSuggestArgs),
}

/// Flags accepted by every subcommand and forwarded to pack.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Force color output
    #[arg(long, help_heading = "Global")]
    pub force_color: bool,

    /// Disable color output
    #[arg(long, help_heading = "Global")]
    pub no_color: bool,

    /// Show less output
    #[arg(short, long, help_heading = "Global")]
    pub quiet: bool,

    /// Enable timestamps in output
    #[arg(long, help_heading = "Global")]
    pub timestamps: bool,

    /// Show more output
    #[arg(short, long, help_heading = "Global")]
    pub verbose: bool,

    /// Print wrapper messages as JSON lines (not forwarded to pack)
    #[arg(long, help_heading = "Global")]
    pub json: bool,
}

impl GlobalArgs {
    pub fn render(&self, args: PackArgs) -> PackArgs {
        args.flag("force-color", self.force_color)
            .flag("no-color", self.no_color)
            .flag("quiet", self.quiet)
            .flag("timestamps", self.timestamps)
            .flag("verbose", self.verbose)
    }
}

#[derive(Args, Debug, Clone)]
pub struct BuildArgs {
    /// Name of the output image
    pub image_name: Option<String>,

    /// Builder image
    #[arg(short = 'B', long)]
    pub builder: Option<String>,

    /// Buildpack to use (repeat for each buildpack in order)
    #[arg(short = 'b', long)]
    pub buildpack: Vec<String>,

    /// Buildpack Registry by name
    #[arg(short = 'r', long)]
    pub buildpack_registry: Option<String>,

    /// Cache options used to define cache techniques for the build process
    #[arg(long)]
    pub cache: Option<String>,

    /// Cache build layers in remote registry. Requires --publish
    #[arg(long)]
    pub cache_image: Option<String>,

    /// Clear image's associated cache before building
    #[arg(long)]
    pub clear_cache: bool,

    /// Container runtime to build and push your image with
    #[arg(long, value_enum)]
    pub container_runtime: Option<RuntimeType>,

    /// Desired create time in the output image config (Unix timestamp or 'now')
    #[arg(long)]
    pub creation_time: Option<String>,

    /// Set the default process type
    #[arg(short = 'D', long, default_value = "web")]
    pub default_process: String,

    /// Path to the project descriptor file
    #[arg(short = 'd', long)]
    pub descriptor: Option<String>,

    /// Address to docker daemon that will be exposed to the build container
    #[arg(long)]
    pub docker_host: Option<String>,

    /// Build-time environment variable, in the form 'VAR=VALUE' or 'VAR'
    #[arg(short = 'e', long)]
    pub env: Vec<String>,

    /// Build-time environment variables file
    #[arg(long)]
    pub env_file: Vec<String>,

    /// Extension to use (repeat for each extension in order)
    #[arg(long)]
    pub extension: Vec<String>,

    /// Override GID of user's group in the stack's build and run images
    #[arg(long)]
    pub gid: Option<u32>,

    /// Launch a terminal UI to depict the build process
    #[arg(long)]
    pub interactive: bool,

    /// Custom lifecycle image to use when the builder is untrusted
    #[arg(long)]
    pub lifecycle_image: Option<String>,

    /// Connect detect and build containers to network
    #[arg(long)]
    pub network: Option<String>,

    /// Path to app dir, zip file or git URL, optionally suffixed with ':<context dir>'
    #[arg(short = 'p', long, default_value = ".")]
    pub path: String,

    /// Platform to build on (e.g., "linux/amd64")
    #[arg(long)]
    pub platform: Option<String>,

    /// Buildpacks to append to the groups in the builder's order
    #[arg(long)]
    pub post_buildpack: Vec<String>,

    /// Buildpacks to prepend to the groups in the builder's order
    #[arg(long)]
    pub pre_buildpack: Vec<String>,

    /// Set previous image to a particular tag reference, digest reference, or image ID
    #[arg(long)]
    pub previous_image: Option<String>,

    /// Publish the application image directly to the container registry
    #[arg(long)]
    pub publish: bool,

    /// Pull policy to use
    #[arg(long, default_value = "always", value_parser = ["always", "never", "if-not-present"])]
    pub pull_policy: String,

    /// Path to export build report.toml
    #[arg(long)]
    pub report_output_dir: Option<String>,

    /// Run image (defaults to default stack's run image)
    #[arg(long)]
    pub run_image: Option<String>,

    /// Path to export SBoM contents
    #[arg(long)]
    pub sbom_output_dir: Option<String>,

    /// Avoid saving run-image layers on disk when exporting to OCI layout format
    #[arg(long)]
    pub sparse: bool,

    /// Additional tags to push the output image to
    #[arg(short = 't', long)]
    pub tag: Vec<String>,

    /// Trust the provided builder
    #[arg(long)]
    pub trust_builder: bool,

    /// Trust buildpacks provided in addition to the buildpacks on the builder
    #[arg(long)]
    pub trust_extra_buildpacks: bool,

    /// Override UID of user in the stack's build and run images
    #[arg(long)]
    pub uid: Option<u32>,

    /// Mount host volume into the build container
    #[arg(long)]
    pub volume: Vec<String>,

    /// Location at which to mount the app dir in the build image
    #[arg(long)]
    pub workspace: Option<String>,

    #[command(flatten)]
    pub global: GlobalArgs,
}

impl BuildArgs {
    /// Render `pack build` argv. `--container-runtime` is a wrapper-only flag.
    pub fn to_pack_args(&self, image: &str, builder: &str, path: &str) -> PackArgs {
        let args = PackArgs::command(["build"])
            .arg(image)
            .opt("builder", Some(builder))
            .multi("buildpack", &self.buildpack)
            .opt("buildpack-registry", self.buildpack_registry.as_deref())
            .opt("cache", self.cache.as_deref())
            .opt("cache-image", self.cache_image.as_deref())
            .flag("clear-cache", self.clear_cache)
            .opt("creation-time", self.creation_time.as_deref())
            .opt("default-process", Some(&self.default_process))
            .opt("descriptor", self.descriptor.as_deref())
            .opt("docker-host", self.docker_host.as_deref())
            .multi("env", &self.env)
            .multi("env-file", &self.env_file)
            .multi("extension", &self.extension)
            .opt("gid", self.gid)
            .flag("interactive", self.interactive)
            .opt("lifecycle-image", self.lifecycle_image.as_deref())
            .opt("network", self.network.as_deref())
            .opt("path", Some(path))
            .opt("platform", self.platform.as_deref())
            .multi("post-buildpack", &self.post_buildpack)
            .multi("pre-buildpack", &self.pre_buildpack)
            .opt("previous-image", self.previous_image.as_deref())
            .flag("publish", self.publish)
            .opt("pull-policy", Some(&self.pull_policy))
            .opt("report-output-dir", self.report_output_dir.as_deref())
            .opt("run-image", self.run_image.as_deref())
            .opt("sbom-output-dir", self.sbom_output_dir.as_deref())
            .flag("sparse", self.sparse)
            .multi("tag", &self.tag)
            .flag("trust-builder", self.trust_builder)
            .flag("trust-extra-buildpacks", self.trust_extra_buildpacks)
            .opt("uid", self.uid)
            .multi("volume", &self.volume)
            .opt("workspace", self.workspace.as_deref());
        self.global.render(args)
    }
}

#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    /// Name of the image to inspect
    pub image_name: String,

    /// Print bill of materials
    #[arg(long)]
    pub bom: bool,

    /// Output format to display builder detail
    #[arg(
        short,
        long,
        default_value = "human-readable",
        value_parser = ["json", "yaml", "toml", "human-readable"]
    )]
    pub output: String,

    #[command(flatten)]
    pub global: GlobalArgs,
}

impl InspectArgs {
    pub fn to_pack_args(&self) -> PackArgs {
        let args = PackArgs::command(["inspect"])
            .arg(&self.image_name)
            .flag("bom", self.bom)
            .opt("output", Some(&self.output));
        self.global.render(args)
    }
}

#[derive(Args, Debug, Clone)]
pub struct SbomDownloadArgs {
    /// Download SBoM from specified image
    pub image_name: String,

    /// Path to export SBoM contents
    #[arg(short, long, default_value = ".")]
    pub output_dir: String,

    /// Download SBoM of image in remote registry (without pulling image)
    #[arg(long)]
    pub remote: Option<String>,

    #[command(flatten)]
    pub global: GlobalArgs,
}

impl SbomDownloadArgs {
    pub fn to_pack_args(&self) -> PackArgs {
        let args = PackArgs::command(["sbom", "download"])
            .arg(&self.image_name)
            .opt("output-dir", Some(&self.output_dir))
            .opt("remote", self.remote.as_deref());
        self.global.render(args)
    }
}

#[derive(Args, Debug, Clone)]
pub struct BuilderSuggestArgs {
    #[command(flatten)]
    pub global: GlobalArgs,
}

impl BuilderSuggestArgs {
    pub fn to_pack_args(&self) -> PackArgs {
        self.global.render(PackArgs::command(["builder", "suggest"]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("paicku").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn build_defaults_render_into_pack_argv() {
        let Commands::Build(args) = parse(&["build"]).command else {
            panic!("expected build");
        };
        assert!(args.image_name.is_none());
        assert!(args.container_runtime.is_none());

        let argv = args.to_pack_args("img", DEFAULT_BUILDER, ".").into_vec();
        assert_eq!(
            argv,
            vec![
                "build",
                "img",
                "--builder",
                DEFAULT_BUILDER,
                "--default-process",
                "web",
                "--path",
                ".",
                "--pull-policy",
                "always",
            ]
        );
    }

    #[test]
    fn build_container_runtime_is_not_forwarded() {
        let Commands::Build(args) =
            parse(&["build", "app", "--container-runtime", "podman", "-t", "a", "-t", "b", "--publish"])
                .command
        else {
            panic!("expected build");
        };
        assert_eq!(args.container_runtime, Some(RuntimeType::Podman));

        let argv = args.to_pack_args("app", "b", ".").into_vec();
        assert!(!argv.iter().any(|a| a.contains("container-runtime")));
        assert!(argv.windows(4).any(|w| w == ["--tag", "a", "--tag", "b"]));
        assert!(argv.contains(&"--publish".to_string()));
    }

    #[test]
    fn unknown_runtime_is_rejected() {
        let result = Cli::try_parse_from(["paicku", "build", "--container-runtime", "lxc"]);
        assert!(result.is_err());
    }

    #[test]
    fn inspect_alias_and_output_default() {
        let cli = parse(&["inspect-image", "buildpacksio/pack", "--bom", "-q"]);
        let Commands::Inspect(args) = &cli.command else {
            panic!("expected inspect");
        };
        assert_eq!(
            args.to_pack_args().into_vec(),
            vec![
                "inspect",
                "buildpacksio/pack",
                "--bom",
                "--output",
                "human-readable",
                "--quiet"
            ]
        );
        assert!(cli.global().quiet);
    }

    #[test]
    fn sbom_download_defaults_output_dir() {
        let cli = parse(&["sbom", "download", "img", "--remote", "reg/img"]);
        let Commands::Sbom {
            command: SbomCommands::Download(args),
        } = &cli.command
        else {
            panic!("expected sbom download");
        };
        assert_eq!(
            args.to_pack_args().into_vec(),
            vec!["sbom", "download", "img", "--output-dir", ".", "--remote", "reg/img"]
        );
    }

    #[test]
    fn json_flag_is_wrapper_only() {
        let cli = parse(&["builder", "suggest", "--json", "--verbose"]);
        let Commands::Builder {
            command: BuilderCommands::Suggest(args),
        } = &cli.command
        else {
            panic!("expected builder suggest");
        };
        assert!(args.global.json);
        assert_eq!(
            args.to_pack_args().into_vec(),
            vec!["builder", "suggest", "--verbose"]
        );
    }
}
