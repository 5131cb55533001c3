//! Text-generation client configuration.
//!
//! Defaults target an Ollama instance reachable as `ollama` on the
//! deployment network. Override via environment variables or explicit
//! construction for tests.

use pandora_core::env::{env_bool, env_string, env_u64, Lookup, ProcessEnv};
use pandora_core::ConfigError;
use url::Url;

/// Default service base URL.
pub const DEFAULT_URL: &str = "http://ollama:11434";
/// Default model for everything except HTML pages.
pub const DEFAULT_MODEL: &str = "llama3.2";
/// Default model for HTML pages.
pub const DEFAULT_HTML_MODEL: &str = "web_content";
/// Default per-call timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Configuration for the text-generation service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextGenConfig {
    /// When false the primary tier is skipped entirely.
    pub enabled: bool,
    /// Service base URL; `api/generate` is resolved against it.
    pub base_url: Url,
    /// Model used for documents, data and code.
    pub model: String,
    /// Model used for HTML pages.
    pub html_model: String,
    /// Upper bound on one generation call, in seconds.
    pub timeout_secs: u64,
}

impl TextGenConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `PANDORA_TEXTGEN_ENABLED` (default: `true`)
    /// - `PANDORA_TEXTGEN_URL` (default: `http://ollama:11434`)
    /// - `PANDORA_TEXTGEN_MODEL` (default: `llama3.2`)
    /// - `PANDORA_HTML_MODEL` (default: `web_content`)
    /// - `PANDORA_TEXTGEN_TIMEOUT_SECS` (default: 60)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&ProcessEnv)
    }

    pub fn from_lookup(env: &impl Lookup) -> Result<Self, ConfigError> {
        Ok(Self {
            enabled: env_bool(env, "PANDORA_TEXTGEN_ENABLED", true)?,
            base_url: env_url(env, "PANDORA_TEXTGEN_URL", DEFAULT_URL)?,
            model: env_string(env, "PANDORA_TEXTGEN_MODEL", DEFAULT_MODEL),
            html_model: env_string(env, "PANDORA_HTML_MODEL", DEFAULT_HTML_MODEL),
            timeout_secs: env_u64(env, "PANDORA_TEXTGEN_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?,
        })
    }

    /// Configuration pointing at a local mock server (for testing).
    pub fn local_mock(base: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            enabled: true,
            base_url: parse_base("local_mock", base)?,
            model: DEFAULT_MODEL.to_string(),
            html_model: DEFAULT_HTML_MODEL.to_string(),
            timeout_secs: 5,
        })
    }
}

fn env_url(env: &impl Lookup, var: &str, default: &str) -> Result<Url, ConfigError> {
    parse_base(var, &env_string(env, var, default))
}

/// Parse a base URL, forcing a trailing slash so `join` appends instead of
/// replacing the last path segment.
fn parse_base(var: &str, raw: &str) -> Result<Url, ConfigError> {
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    };
    Url::parse(&normalized).map_err(|e| ConfigError::InvalidUrl(var.to_string(), e.to_string()))
}
