// ABOUTME: Entry point for the paicku CLI application.
// ABOUTME: Parses arguments, provisions pack and dispatches to command handlers.

mod cli;
mod commands;

use clap::Parser;
use cli::{BuilderCommands, Cli, Commands, SbomCommands};
use paicku::config::Settings;
use paicku::error::{Error, Result};
use paicku::output::{Output, OutputMode};
use paicku::process::ProcessError;
use paicku::runtime::Target;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let global = cli.global().clone();

    // RUST_LOG wins; otherwise --verbose raises the level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if global.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("warn")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let mode = OutputMode::from_flags(global.json, global.quiet);

    if let Err(e) = run(cli, mode).await {
        let output = Output::new(mode);
        match &e {
            // pack already explained itself on stderr
            Error::Process(ProcessError::NonZeroExit { stderr, .. }) => eprint!("{stderr}"),
            _ => output.error(&e.to_string()),
        }
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli, mode: OutputMode) -> Result<()> {
    let settings = Settings::load()?;
    let target = Target::host();
    let output = Output::new(mode);

    let pack = commands::provision(&settings, target, &output).await?;

    match &cli.command {
        Commands::Build(args) => commands::build(&pack, args, &settings, target, output).await,
        Commands::Inspect(args) => commands::inspect(&pack, args, &output).await,
        Commands::Sbom {
            command: SbomCommands::Download(args),
        } => commands::sbom_download(&pack, args, &output).await,
        Commands::Builder {
            command: BuilderCommands::Suggest(args),
        } => commands::builder_suggest(&pack, args, &output).await,
    }
}
