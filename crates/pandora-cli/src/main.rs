//! # pandora CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use pandora_cli::generate::{run_generate, GenerateArgs};
use pandora_cli::prune::{run_prune, PruneArgs};
use pandora_cli::resolve::{run_resolve, ResolveArgs};

/// Pandora operator CLI.
///
/// Maintains cache directories and previews what the decoy server would
/// serve for a given path.
#[derive(Parser, Debug)]
#[command(name = "pandora", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run one janitor pass over cache roots.
    Prune(PruneArgs),

    /// Show how a request path is routed and cached.
    Resolve(ResolveArgs),

    /// Write synthetic content for a request path.
    Generate(GenerateArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Prune(args) => run_prune(&args),
        Commands::Resolve(args) => run_resolve(&args),
        Commands::Generate(args) => run_generate(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
