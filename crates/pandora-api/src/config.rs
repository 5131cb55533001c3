//! # Process Configuration
//!
//! Read once at boot from environment variables. Invalid values fail the
//! boot; nothing is hot-reloaded.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `PANDORA_PORT` | `80` |
//! | `PANDORA_SERVER_HEADER` | `Apache` |
//! | `PANDORA_CACHE_ENABLED` | `true` |
//! | `PANDORA_CACHE_DIR` | `./cache` |
//! | `PANDORA_STATIC_DIR` | `./static` |
//! | `PANDORA_PAYLOADS` | unset |
//! | `PANDORA_JANITOR_ROOTS` | unset (comma list) |
//! | `PANDORA_JANITOR_MAX_BYTES` | 8 GiB |
//! | `PANDORA_JANITOR_MIN_AGE_SECS` | `3600` |
//! | `PANDORA_JANITOR_INTERVAL_SECS` | `900` |
//! | `PANDORA_NON_200_PERCENT` | `5` |
//! | `PANDORA_NON_200_REDIRECT_PERCENT` | `50` |
//! | `PANDORA_LOG_JSON` | `false` |
//!
//! Text-generation variables are documented on
//! [`TextGenConfig`](pandora_textgen::TextGenConfig).

use std::path::{Path, PathBuf};
use std::time::Duration;

use pandora_core::env::{
    env_bool, env_list, env_opt, env_percent, env_port, env_string, env_u64, Lookup, ProcessEnv,
};
use pandora_core::ConfigError;
use pandora_store::{
    JanitorConfig, JanitorRoot, StoreConfig, DEFAULT_INTERVAL, DEFAULT_MAX_BYTES, DEFAULT_MIN_AGE,
};
use pandora_synth::DecoyErrors;
use pandora_textgen::TextGenConfig;

/// Model-cache directories of a co-located inference stack. Swept by the
/// janitor when they exist.
pub const MODEL_CACHE_VARS: &[&str] = &[
    "TORCH_HOME",
    "HF_HOME",
    "TRANSFORMERS_CACHE",
    "HF_DATASETS_CACHE",
    "TORCHINDUCTOR_CACHE_DIR",
    "TRITON_CACHE_DIR",
    "CUDA_CACHE_PATH",
];

#[derive(Debug, Clone)]
pub struct PandoraConfig {
    pub port: u16,
    /// Value of the `Server` response header.
    pub server_header: String,
    pub store: StoreConfig,
    /// Directory of static fixtures for the tertiary tier.
    pub static_dir: PathBuf,
    /// YAML file of payload-replay routes.
    pub payloads: Option<PathBuf>,
    pub janitor: JanitorConfig,
    pub textgen: TextGenConfig,
    /// Share of root and unknown-path reads answered with a 302 or 404.
    pub decoy_errors: DecoyErrors,
    pub log_json: bool,
}

impl PandoraConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&ProcessEnv)
    }

    pub fn from_lookup(env: &impl Lookup) -> Result<Self, ConfigError> {
        let store = StoreConfig::new(
            env_bool(env, "PANDORA_CACHE_ENABLED", true)?,
            env_string(env, "PANDORA_CACHE_DIR", "./cache"),
        );
        let janitor = janitor_config(env, &store, |p| p.is_dir())?;
        let defaults = DecoyErrors::default();
        let decoy_errors = DecoyErrors {
            percent: env_percent(env, "PANDORA_NON_200_PERCENT", defaults.percent)?,
            redirect_percent: env_percent(
                env,
                "PANDORA_NON_200_REDIRECT_PERCENT",
                defaults.redirect_percent,
            )?,
        };

        Ok(Self {
            port: env_port(env, "PANDORA_PORT", 80)?,
            server_header: env_string(env, "PANDORA_SERVER_HEADER", "Apache"),
            store,
            static_dir: PathBuf::from(env_string(env, "PANDORA_STATIC_DIR", "./static")),
            payloads: env_opt(env, "PANDORA_PAYLOADS").map(PathBuf::from),
            janitor,
            textgen: TextGenConfig::from_lookup(env)?,
            decoy_errors,
            log_json: env_bool(env, "PANDORA_LOG_JSON", false)?,
        })
    }
}

/// Janitor roots: the cache dir (when caching is on), explicit roots, then
/// model-cache directories that pass `exists`.
fn janitor_config(
    env: &impl Lookup,
    store: &StoreConfig,
    exists: impl Fn(&Path) -> bool,
) -> Result<JanitorConfig, ConfigError> {
    let max_bytes = env_u64(env, "PANDORA_JANITOR_MAX_BYTES", DEFAULT_MAX_BYTES)?;
    let min_age = Duration::from_secs(env_u64(
        env,
        "PANDORA_JANITOR_MIN_AGE_SECS",
        DEFAULT_MIN_AGE.as_secs(),
    )?);
    let interval = Duration::from_secs(env_u64(
        env,
        "PANDORA_JANITOR_INTERVAL_SECS",
        DEFAULT_INTERVAL.as_secs(),
    )?);

    let mut paths: Vec<PathBuf> = Vec::new();
    if store.enabled {
        paths.push(store.cache_dir.clone());
    }
    paths.extend(env_list(env, "PANDORA_JANITOR_ROOTS").into_iter().map(PathBuf::from));
    for var in MODEL_CACHE_VARS {
        if let Some(dir) = env_opt(env, var).map(PathBuf::from) {
            if exists(&dir) {
                paths.push(dir);
            }
        }
    }

    Ok(JanitorConfig::new(
        paths
            .into_iter()
            .map(|p| JanitorRoot::new(p, max_bytes, min_age)),
        interval,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&'static str, &'static str)]) -> HashMap<&'static str, &'static str> {
        pairs.iter().copied().collect()
    }

    #[test]
    fn defaults_apply_to_an_empty_environment() {
        let cfg = PandoraConfig::from_lookup(&env(&[])).unwrap();
        assert_eq!(cfg.port, 80);
        assert_eq!(cfg.server_header, "Apache");
        assert!(cfg.store.enabled);
        assert_eq!(cfg.store.cache_dir, PathBuf::from("./cache"));
        assert_eq!(cfg.static_dir, PathBuf::from("./static"));
        assert!(cfg.payloads.is_none());
        assert!(!cfg.log_json);
        assert_eq!(cfg.janitor.interval, DEFAULT_INTERVAL);
        assert_eq!(cfg.janitor.roots.len(), 1);
        assert_eq!(cfg.janitor.roots[0].max_bytes, DEFAULT_MAX_BYTES);
        assert!(cfg.textgen.enabled);
        assert_eq!(cfg.decoy_errors, DecoyErrors::default());
    }

    #[test]
    fn explicit_values_override_defaults() {
        let cfg = PandoraConfig::from_lookup(&env(&[
            ("PANDORA_PORT", "8080"),
            ("PANDORA_SERVER_HEADER", "nginx/1.18.0"),
            ("PANDORA_CACHE_ENABLED", "no"),
            ("PANDORA_PAYLOADS", "/etc/pandora/payloads.yaml"),
            ("PANDORA_TEXTGEN_ENABLED", "false"),
            ("PANDORA_LOG_JSON", "1"),
            ("PANDORA_NON_200_PERCENT", "0"),
            ("PANDORA_NON_200_REDIRECT_PERCENT", "100"),
        ]))
        .unwrap();
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.server_header, "nginx/1.18.0");
        assert!(!cfg.store.enabled);
        assert_eq!(cfg.payloads, Some(PathBuf::from("/etc/pandora/payloads.yaml")));
        assert!(!cfg.textgen.enabled);
        assert!(cfg.log_json);
        assert!(cfg.janitor.roots.is_empty());
        assert_eq!(cfg.decoy_errors.percent, 0);
        assert_eq!(cfg.decoy_errors.redirect_percent, 100);
    }

    #[test]
    fn invalid_values_fail_fast() {
        assert!(PandoraConfig::from_lookup(&env(&[("PANDORA_PORT", "http")])).is_err());
        assert!(PandoraConfig::from_lookup(&env(&[("PANDORA_CACHE_ENABLED", "maybe")])).is_err());
        assert!(
            PandoraConfig::from_lookup(&env(&[("PANDORA_JANITOR_MAX_BYTES", "-1")])).is_err()
        );
        assert!(PandoraConfig::from_lookup(&env(&[("PANDORA_NON_200_PERCENT", "120")])).is_err());
    }

    #[test]
    fn janitor_roots_are_merged_and_deduplicated() {
        let e = env(&[
            ("PANDORA_CACHE_DIR", "/srv/cache"),
            ("PANDORA_JANITOR_ROOTS", "/srv/cache, /tmp/extra"),
            ("PANDORA_JANITOR_MAX_BYTES", "1024"),
            ("PANDORA_JANITOR_MIN_AGE_SECS", "60"),
            ("HF_HOME", "/models/hf"),
            ("TORCH_HOME", "/models/missing"),
        ]);
        let store = StoreConfig::new(true, "/srv/cache");
        let cfg = janitor_config(&e, &store, |p| p == Path::new("/models/hf")).unwrap();

        let paths: Vec<&Path> = cfg.roots.iter().map(|r| r.path.as_path()).collect();
        assert_eq!(
            paths,
            vec![
                Path::new("/srv/cache"),
                Path::new("/tmp/extra"),
                Path::new("/models/hf")
            ]
        );
        assert!(cfg.roots.iter().all(|r| r.max_bytes == 1024));
        assert!(cfg.roots.iter().all(|r| r.min_age == Duration::from_secs(60)));
    }
}
