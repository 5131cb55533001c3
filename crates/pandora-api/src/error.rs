//! # API Error Types
//!
//! [`AppError`] is the only error a handler returns. Content generation
//! failures other than chain exhaustion never get this far; they are
//! absorbed inside the dispatcher.
//!
//! [`BootError`] covers everything that can stop the process from starting.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use pandora_core::{ConfigError, CoreError};
use pandora_synth::{DispatchError, PayloadError};
use pandora_textgen::TextGenError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable error code, e.g. `GENERATION_FAILED`.
    pub code: String,
    pub message: String,
}

#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Every generation tier failed (500).
    #[error("content generation failed: {0}")]
    GenerationFailed(String),

    /// Internal server error (500). Message is logged but not returned to client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::GenerationFailed(_) => (StatusCode::INTERNAL_SERVER_ERROR, "GENERATION_FAILED"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        // The path and failing kind stay in the logs.
        let message = match &self {
            Self::NotFound(_) => "The requested resource was not found".to_string(),
            Self::GenerationFailed(_) => "The requested content could not be produced".to_string(),
            Self::Internal(_) => "An internal error occurred".to_string(),
        };
        if matches!(&self, Self::Internal(_)) {
            tracing::error!(error = %self, "internal server error");
        }

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };
        (status, Json(body)).into_response()
    }
}

impl From<DispatchError> for AppError {
    fn from(err: DispatchError) -> Self {
        Self::GenerationFailed(err.to_string())
    }
}

/// Startup failures.
#[derive(Error, Debug)]
pub enum BootError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("text generation client: {0}")]
    TextGen(#[from] TextGenError),

    #[error("payloads: {0}")]
    Payload(#[from] PayloadError),

    #[error("content registry: {0}")]
    Registry(#[from] CoreError),
}
