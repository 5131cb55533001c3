//! # pandora-textgen -- Client for the text-generation service
//!
//! Pandora's primary content tier asks a language model to write the body
//! of a decoy file. This crate is the only place that talks to that model.
//!
//! ## Contract
//!
//! Request `{model, prompt}`; response `{response}`. Any transport error,
//! non-2xx status, timeout, or blank response is an `Err`. There is no retry
//! here: a failed call simply hands the request to the next tier.
//!
//! ## Seam
//!
//! Callers depend on the [`TextGenerator`] trait, not on [`OllamaClient`],
//! so tests and offline tools can substitute a stub.

pub mod config;
pub mod error;

pub use config::TextGenConfig;
pub use error::TextGenError;

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

// -- Wire types ---------------------------------------------------------------

/// Body of `POST {base}/api/generate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    /// Always false; the whole completion is returned in one body.
    pub stream: bool,
}

impl GenerateRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            stream: false,
        }
    }
}

/// Successful response from the generation endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateResponse {
    #[serde(rename = "response", default)]
    pub response_text: String,
}

// -- Seam ---------------------------------------------------------------------

/// Anything that can turn a prompt into text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a completion. Returns the trimmed, non-empty text.
    async fn generate(&self, req: &GenerateRequest) -> Result<String, TextGenError>;
}

// -- Client -------------------------------------------------------------------

/// HTTP client for an Ollama-compatible `/api/generate` endpoint.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    http: reqwest::Client,
    endpoint_url: url::Url,
    timeout: Duration,
}

impl OllamaClient {
    /// Create a client from configuration.
    pub fn new(config: &TextGenConfig) -> Result<Self, TextGenError> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TextGenError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;
        let endpoint_url = config.base_url.join("api/generate").map_err(|e| {
            pandora_core::ConfigError::InvalidUrl(config.base_url.to_string(), e.to_string())
        })?;
        Ok(Self {
            http,
            endpoint_url,
            timeout,
        })
    }

    /// The full URL generation requests are sent to.
    pub fn endpoint_url(&self) -> &url::Url {
        &self.endpoint_url
    }
}

#[async_trait]
impl TextGenerator for OllamaClient {
    async fn generate(&self, req: &GenerateRequest) -> Result<String, TextGenError> {
        let endpoint = "POST /api/generate";

        let resp = self
            .http
            .post(self.endpoint_url.clone())
            .json(req)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TextGenError::Timeout {
                        endpoint: endpoint.into(),
                        after: self.timeout,
                    }
                } else {
                    TextGenError::Http {
                        endpoint: endpoint.into(),
                        source: e,
                    }
                }
            })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(TextGenError::ApiError {
                endpoint: endpoint.into(),
                status,
                body,
            });
        }

        let parsed: GenerateResponse =
            resp.json().await.map_err(|e| TextGenError::Deserialization {
                endpoint: endpoint.into(),
                source: e,
            })?;

        let text = parsed.response_text.trim();
        if text.is_empty() {
            return Err(TextGenError::Empty {
                model: req.model.clone(),
            });
        }
        tracing::debug!(model = %req.model, chars = text.len(), "text generated");
        Ok(text.to_string())
    }
}
