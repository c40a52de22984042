//! Convoy — git-driven container deployment reconciler.
//!
//! # Usage
//!
//! ```text
//! convoy run [--repo <path>] [--user] [--json]
//! convoy changes <from> [<to>] [--repo <path>]
//! convoy status [--repo <path>] [--user] [--json]
//! ```
//!
//! `run` executes one reconciliation cycle: pull the repository, classify
//! what changed, prefetch images, restart/stop the affected services.
//! Invoke it from a timer (cron, systemd timer); cycles must not overlap.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{changes::ChangesArgs, run::RunArgs, status::StatusArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "convoy",
    version,
    about = "Reconcile running container services against a git repository",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run one reconciliation cycle against the repository.
    Run(RunArgs),

    /// Resolve and print the change set between two revisions (no side effects).
    Changes(ChangesArgs),

    /// Show the declared units and their active/enabled state.
    Status(StatusArgs),
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run(args) => args.run(),
        Commands::Changes(args) => args.run(),
        Commands::Status(args) => args.run(),
    }
}
