//! Deckhand: self-updating fleet deployment agent.
//!
//! # Usage
//!
//! ```text
//! deckhand deploy <fleet_root> [engine] [--sops <path>] [--remote <name>] [--branch <name>]
//! deckhand plan <fleet_root> --from <rev> [--to <rev>] [--json]
//! deckhand encrypt <app> [--fleet-root <dir>]
//! deckhand install-sops [--fleet-root <dir>]
//! ```

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{
    deploy::DeployArgs, encrypt::EncryptArgs, install_sops::InstallSopsArgs, plan::PlanArgs,
};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "deckhand",
    version,
    about = "Pull a fleet repository and reconcile every compose application in it",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Update the checkout and reconcile every application that changed.
    Deploy(DeployArgs),

    /// Show what a deploy between two revisions would do, without doing it.
    Plan(PlanArgs),

    /// Encrypt an application's `.env` to `.env.enc` if it changed.
    Encrypt(EncryptArgs),

    /// Download the pinned sops release into the tools directory.
    InstallSops(InstallSopsArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Commands::Deploy(args) => args.run(),
        Commands::Plan(args) => args.run(),
        Commands::Encrypt(args) => args.run(),
        Commands::InstallSops(args) => args.run(),
    }
}

/// Progress to stdout, warnings and errors to stderr.
fn init_tracing() {
    use tracing_subscriber::fmt::writer::MakeWriterExt;
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let writer = std::io::stderr
        .with_max_level(tracing::Level::WARN)
        .or_else(std::io::stdout);
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(writer)
        .try_init();
}
