//! # Prune Subcommand
//!
//! One janitor pass, run in the foreground: age purge, then size trim, over
//! each `--root`. Prints one summary line per root.

use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use anyhow::Result;
use clap::Args;
use pandora_store::{prune_root, JanitorRoot, PruneSummary, DEFAULT_MAX_BYTES, DEFAULT_MIN_AGE};

/// Arguments for `pandora prune`.
#[derive(Args, Debug)]
pub struct PruneArgs {
    /// Directory to prune. Repeat for several roots.
    #[arg(long = "root", value_name = "DIR", required = true)]
    pub roots: Vec<PathBuf>,

    /// Byte budget per root.
    #[arg(long, default_value_t = DEFAULT_MAX_BYTES)]
    pub max_bytes: u64,

    /// Files untouched for longer than this are always deleted.
    #[arg(long, default_value_t = DEFAULT_MIN_AGE.as_secs())]
    pub min_age_secs: u64,

    /// Print summaries as JSON lines.
    #[arg(long)]
    pub json: bool,
}

/// Execute the prune subcommand. Exit code 1 if any root was skipped.
pub fn run_prune(args: &PruneArgs) -> Result<u8> {
    let min_age = Duration::from_secs(args.min_age_secs);
    let now = SystemTime::now();
    let mut code = 0;

    for path in &args.roots {
        let root = JanitorRoot::new(path, args.max_bytes, min_age);
        match prune_root(&root, now) {
            Ok(summary) => print_summary(&summary, args.json)?,
            Err(e) => {
                tracing::error!(root = %path.display(), "{e}");
                code = 1;
            }
        }
    }
    Ok(code)
}

fn print_summary(summary: &PruneSummary, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(summary)?);
    } else {
        println!("{summary}");
    }
    Ok(())
}
