//! # pandora-cli — Operator Command-Line Interface
//!
//! ## Subcommands
//!
//! - `prune`: one janitor pass over one or more roots
//! - `resolve`: show how a request path is routed and where it is cached
//! - `generate`: run the synthetic tier offline and write the file
//!
//! Handlers return a process exit code; argument parsing lives in `main.rs`.

pub mod generate;
pub mod prune;
pub mod resolve;

use pandora_synth::{ChainSettings, ContentRegistry};

/// The built-in registry with synthetic-only chains.
pub(crate) fn offline_registry() -> anyhow::Result<ContentRegistry> {
    ContentRegistry::builtin(&ChainSettings::default(), Vec::new())
        .map_err(|e| anyhow::anyhow!("content registry: {e}"))
}
