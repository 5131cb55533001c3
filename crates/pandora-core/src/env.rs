//! # Environment Configuration Helpers
//!
//! Typed readers over a variable lookup. Every `from_env()` in the
//! workspace is a thin wrapper around a `from_lookup(...)` that takes one of
//! these lookups, so tests can feed a map instead of mutating the process
//! environment.
//!
//! Unset and blank variables fall back to the default. A variable that is
//! set but does not parse is an error; configuration fails at boot rather
//! than silently running with a default the operator did not ask for.

use std::collections::HashMap;

use thiserror::Error;

/// A source of configuration variables.
pub trait Lookup {
    fn get(&self, var: &str) -> Option<String>;
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl Lookup for ProcessEnv {
    fn get(&self, var: &str) -> Option<String> {
        std::env::var(var).ok()
    }
}

impl Lookup for HashMap<String, String> {
    fn get(&self, var: &str) -> Option<String> {
        HashMap::get(self, var).cloned()
    }
}

impl Lookup for HashMap<&str, &str> {
    fn get(&self, var: &str) -> Option<String> {
        HashMap::get(self, var).map(|v| v.to_string())
    }
}

/// Configuration errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {var}: expected {expected}")]
    Invalid {
        var: String,
        value: String,
        expected: &'static str,
    },
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
}

fn non_blank(lookup: &impl Lookup, var: &str) -> Option<String> {
    lookup
        .get(var)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// A string variable, or `default` when unset.
pub fn env_string(lookup: &impl Lookup, var: &str, default: &str) -> String {
    non_blank(lookup, var).unwrap_or_else(|| default.to_string())
}

/// An optional string variable.
pub fn env_opt(lookup: &impl Lookup, var: &str) -> Option<String> {
    non_blank(lookup, var)
}

/// A boolean variable. Accepts `1/0`, `true/false`, `yes/no`, `on/off`.
pub fn env_bool(lookup: &impl Lookup, var: &str, default: bool) -> Result<bool, ConfigError> {
    let Some(raw) = non_blank(lookup, var) else {
        return Ok(default);
    };
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            var: var.to_string(),
            value: raw,
            expected: "a boolean",
        }),
    }
}

/// An unsigned integer variable.
pub fn env_u64(lookup: &impl Lookup, var: &str, default: u64) -> Result<u64, ConfigError> {
    let Some(raw) = non_blank(lookup, var) else {
        return Ok(default);
    };
    raw.parse().map_err(|_| ConfigError::Invalid {
        var: var.to_string(),
        value: raw,
        expected: "an unsigned integer",
    })
}

/// A port number.
pub fn env_port(lookup: &impl Lookup, var: &str, default: u16) -> Result<u16, ConfigError> {
    let Some(raw) = non_blank(lookup, var) else {
        return Ok(default);
    };
    raw.parse().map_err(|_| ConfigError::Invalid {
        var: var.to_string(),
        value: raw,
        expected: "a port number",
    })
}

/// A percentage in `0..=100`.
pub fn env_percent(lookup: &impl Lookup, var: &str, default: u8) -> Result<u8, ConfigError> {
    let Some(raw) = non_blank(lookup, var) else {
        return Ok(default);
    };
    match raw.parse::<u8>() {
        Ok(p) if p <= 100 => Ok(p),
        _ => Err(ConfigError::Invalid {
            var: var.to_string(),
            value: raw,
            expected: "a percentage from 0 to 100",
        }),
    }
}

/// A comma-separated list; blank items are dropped.
pub fn env_list(lookup: &impl Lookup, var: &str) -> Vec<String> {
    non_blank(lookup, var)
        .map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&'static str, &'static str)]) -> HashMap<&'static str, &'static str> {
        pairs.iter().copied().collect()
    }

    #[test]
    fn unset_and_blank_use_default() {
        let env = vars(&[("BLANK", "  ")]);
        assert_eq!(env_string(&env, "MISSING", "x"), "x");
        assert_eq!(env_string(&env, "BLANK", "x"), "x");
        assert_eq!(env_u64(&env, "BLANK", 7), Ok(7));
        assert_eq!(env_bool(&env, "MISSING", true), Ok(true));
    }

    #[test]
    fn booleans_accept_common_spellings() {
        let env = vars(&[("A", "Yes"), ("B", "0"), ("C", "off"), ("D", "maybe")]);
        assert_eq!(env_bool(&env, "A", false), Ok(true));
        assert_eq!(env_bool(&env, "B", true), Ok(false));
        assert_eq!(env_bool(&env, "C", true), Ok(false));
        assert!(matches!(
            env_bool(&env, "D", true),
            Err(ConfigError::Invalid { var, .. }) if var == "D"
        ));
    }

    #[test]
    fn numbers_fail_fast() {
        let env = vars(&[("N", "12"), ("BAD", "12s"), ("PORT", "70000")]);
        assert_eq!(env_u64(&env, "N", 0), Ok(12));
        assert!(env_u64(&env, "BAD", 0).is_err());
        assert!(env_port(&env, "PORT", 80).is_err());
    }

    #[test]
    fn percentages_are_bounded() {
        let env = vars(&[("P", "5"), ("FULL", "100"), ("OVER", "101"), ("NEG", "-1")]);
        assert_eq!(env_percent(&env, "P", 0), Ok(5));
        assert_eq!(env_percent(&env, "FULL", 0), Ok(100));
        assert_eq!(env_percent(&env, "MISSING", 50), Ok(50));
        assert!(env_percent(&env, "OVER", 0).is_err());
        assert!(env_percent(&env, "NEG", 0).is_err());
    }

    #[test]
    fn lists_split_on_commas() {
        let env = vars(&[("L", " /a, ,/b ,/c")]);
        assert_eq!(env_list(&env, "L"), vec!["/a", "/b", "/c"]);
        assert!(env_list(&env, "NONE").is_empty());
    }
}
