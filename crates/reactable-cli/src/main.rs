#![forbid(unsafe_code)]

mod cmd;
mod output;

use clap::{Parser, Subcommand};
use output::{CliError, OutputMode, Reported, render_error, resolve_output_mode};
use reactable_core::config::load_user_config;
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "rx: inspect reaction groups and the actors behind them",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (defaults to pretty on a TTY, text when piped).
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Shorthand for `--format json`.
    #[arg(long, global = true, hide = true)]
    json: bool,

    /// Use this database instead of the configured store path.
    #[arg(long, global = true, value_name = "PATH")]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Derive the output mode from flags, environment and user config.
    fn output_mode(&self) -> OutputMode {
        // A broken user config must not block output; it only sets a default.
        let user_output = load_user_config().ok().and_then(|cfg| cfg.output);
        resolve_output_mode(self.format, self.json, user_output.as_deref())
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Initialize a reactable project",
        long_about = "Create .reactable/ with a default config and an empty, migrated store.",
        after_help = "EXAMPLES:\n    # Initialize in the current directory\n    rx init\n\n    # Keep the database elsewhere\n    rx init --db /var/lib/reactable/reactions.db"
    )]
    Init(cmd::init::InitArgs),

    #[command(
        about = "Load a JSON dataset",
        long_about = "Load actors, custom emoji, subjects and reaction records into the store.",
        after_help = "EXAMPLES:\n    # Import a snapshot\n    rx import reactions.json"
    )]
    Import(cmd::import::ImportArgs),

    #[command(
        about = "Show a subject's reaction groups",
        long_about = "Group a subject's cached reaction counts by emoji or custom emoji.",
        after_help = "EXAMPLES:\n    # All groups\n    rx groups 3f2b0c3e-0d7a-4c1e-9a53-2b6f0f1d9e11\n\n    # With the first three reactors of each group\n    rx groups 3f2b0c3e-0d7a-4c1e-9a53-2b6f0f1d9e11 --reactors 3\n\n    # Custom emoji groups only, as JSON\n    rx groups 3f2b0c3e-0d7a-4c1e-9a53-2b6f0f1d9e11 --type custom_emoji --json"
    )]
    Groups(cmd::groups::GroupsArgs),

    #[command(
        about = "Page through the actors in one group",
        long_about = "List who reacted to a subject with one emoji or custom emoji, one page at a time.",
        after_help = "EXAMPLES:\n    # First page\n    rx reactors <subject> 👍 --first 10\n\n    # Next page\n    rx reactors <subject> 👍 --first 10 --after <cursor>\n\n    # Newest reactors\n    rx reactors <subject> 👍 --last 5"
    )]
    Reactors(cmd::reactors::ReactorsArgs),

    #[command(
        about = "Show a custom emoji",
        long_about = "Look up a registered custom emoji by UUID or global node id.",
        after_help = "EXAMPLES:\n    rx emoji 0d6b5f8e-3c1a-4b7e-9f2d-8a4c6e1b3f50"
    )]
    Emoji(cmd::emoji::EmojiArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("REACTABLE_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "reactable=debug,rx=debug,info"
        } else {
            "reactable=info,rx=info,warn"
        })
    });

    let format = env::var("REACTABLE_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    // Logs go to stderr so stdout stays parseable.
    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let output = cli.output_mode();

    match run(&cli, output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if e.downcast_ref::<Reported>().is_none() {
                let _ = render_error(output, &CliError::new(format!("{e:#}")));
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, output: OutputMode) -> anyhow::Result<()> {
    let project_root = env::current_dir()?;
    debug!(root = %project_root.display(), ?output, "starting");

    let project = cmd::Project::load(&project_root, cli.db.as_deref(), output)?;
    match &cli.command {
        Commands::Init(args) => cmd::init::run_init(args, &project_root, &project, output),
        Commands::Import(args) => cmd::import::run_import(args, &project, output),
        Commands::Groups(args) => cmd::groups::run_groups(args, &project, output),
        Commands::Reactors(args) => cmd::reactors::run_reactors(args, &project, output),
        Commands::Emoji(args) => cmd::emoji::run_emoji(args, &project, output),
    }
}
