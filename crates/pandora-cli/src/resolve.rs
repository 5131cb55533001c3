//! # Resolve Subcommand
//!
//! Shows where a request path is routed and which cache file it maps to,
//! without generating anything.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use pandora_core::{media_type_or_default, ContentIdentity};
use pandora_synth::Route;
use serde_json::{json, Value};

/// Arguments for `pandora resolve`.
#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Request path, as it would appear in the URL.
    #[arg(value_name = "PATH")]
    pub path: String,

    /// Cache directory the identity is anchored under.
    #[arg(long, default_value = "./cache")]
    pub cache_dir: PathBuf,
}

/// Execute the resolve subcommand.
pub fn run_resolve(args: &ResolveArgs) -> Result<u8> {
    let report = describe(&args.path, &args.cache_dir)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(0)
}

fn describe(path: &str, cache_dir: &std::path::Path) -> Result<Value> {
    let registry = crate::offline_registry()?;
    let report = match registry.route(path) {
        Route::Typed { entry, descriptor } => {
            let kind = entry.kind();
            let identity =
                ContentIdentity::resolve(cache_dir.join(kind.as_str()), path, &descriptor);
            json!({
                "route": "typed",
                "kind": kind,
                "relative_path": identity.relative_path,
                "file_name": identity.file_name,
                "extension": identity.extension,
                "cache_file": identity.full_path(),
                "media_type": media_type_or_default(&identity.extension, Some(entry.content_type.media_type)),
                "tiers": entry.chain.tiers(),
                "random_eligible": entry.is_random_eligible(),
            })
        }
        Route::Payload(payload) => json!({
            "route": "payload",
            "file": payload.file,
            "media_type": payload.media_type,
        }),
        Route::Unknown => json!({
            "route": "unknown",
            "eligible": registry.eligible().iter().map(|t| t.kind()).collect::<Vec<_>>(),
        }),
    };
    Ok(report)
}
