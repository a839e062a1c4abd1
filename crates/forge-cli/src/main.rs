mod cmd;
mod output;
mod prompt;
mod root;

use clap::{Parser, Subcommand};
use forge_core::config::Destination;
use std::path::PathBuf;

/// Version of the forge binary embedded at compile time.
pub const FORGE_BINARY_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(
    name = "forge",
    about = "Droid Forge: install and maintain AI droid templates",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .factory/ or .git/)
    #[arg(long, global = true, env = "FORGE_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    /// Running `forge` with no subcommand performs a full install.
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Install or refresh droid templates (the default command)
    Install {
        /// Directory holding the droid templates (default: <root>/droids)
        #[arg(long)]
        source: Option<PathBuf>,

        /// Install into <root>/.factory/droids
        #[arg(long, conflicts_with = "user")]
        project: bool,

        /// Install into ~/.factory/droids
        #[arg(long)]
        user: bool,

        /// Answer yes to confirmation prompts
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Remove installed droid templates
    Uninstall {
        /// Remove from <root>/.factory/droids
        #[arg(long)]
        project: bool,

        /// Remove from ~/.factory/droids
        #[arg(long)]
        user: bool,
    },

    /// Report on install locations without modifying anything
    Check,

    /// Inspect droid definitions for size and metadata problems
    Doctor {
        /// Inspect this directory instead of an install location
        #[arg(long)]
        source: Option<PathBuf>,

        /// Inspect the user-global install (~/.factory/droids)
        #[arg(long, conflicts_with = "source")]
        user: bool,
    },

    /// Summarize the audit event log
    Logs {
        /// Read the user-global log (~/.factory/logs)
        #[arg(long)]
        user: bool,

        /// Number of recent events to show
        #[arg(long, default_value = "10")]
        tail: usize,
    },
}

fn destination_from_flags(project: bool, user: bool) -> Option<Destination> {
    match (project, user) {
        (true, _) => Some(Destination::Project),
        (_, true) => Some(Destination::User),
        _ => None,
    }
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let command = cli.command.unwrap_or(Commands::Install {
        source: None,
        project: false,
        user: false,
        yes: false,
    });

    let result = match command {
        Commands::Install {
            source,
            project,
            user,
            yes,
        } => cmd::install::run(
            &root,
            cmd::install::InstallArgs {
                source,
                destination: destination_from_flags(project, user),
                assume_yes: yes,
            },
            cli.json,
        ),
        Commands::Uninstall { project, user } => {
            cmd::uninstall::run(&root, project, user, cli.json)
        }
        Commands::Check => cmd::check::run(&root, cli.json),
        Commands::Doctor { source, user } => cmd::doctor::run(&root, source, user, cli.json),
        Commands::Logs { user, tail } => cmd::logs::run(&root, user, tail, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
