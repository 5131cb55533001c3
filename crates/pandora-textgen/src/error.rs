//! Text-generation client error types.

use std::time::Duration;

/// Errors from text-generation calls.
///
/// Every variant is a soft failure from the caller's point of view: the
/// primary tier logs it and falls through to the next tier.
#[derive(Debug, thiserror::Error)]
pub enum TextGenError {
    /// HTTP transport error.
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },
    /// The call did not finish within the configured timeout.
    #[error("{endpoint} timed out after {after:?}")]
    Timeout { endpoint: String, after: Duration },
    /// The service returned a non-2xx status.
    #[error("{endpoint} returned {status}: {body}")]
    ApiError {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// Response deserialization failed.
    #[error("failed to deserialize response from {endpoint}: {source}")]
    Deserialization {
        endpoint: String,
        source: reqwest::Error,
    },
    /// The service answered with nothing usable.
    #[error("model {model} returned an empty response")]
    Empty { model: String },
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] pandora_core::ConfigError),
}
