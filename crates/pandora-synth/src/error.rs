//! Error types for generation, dispatch and payload loading.

use std::path::PathBuf;
use std::time::Duration;

use pandora_core::BodyKind;
use pandora_textgen::TextGenError;
use thiserror::Error;

use crate::builders::BuildError;

/// Why one tier of a chain produced nothing.
///
/// Never surfaced to a client; the chain logs it and moves on.
#[derive(Debug, Error)]
pub enum TierFailure {
    #[error("text generation failed: {0}")]
    TextGen(#[from] TextGenError),

    #[error("text generation timed out after {0:?}")]
    Timeout(Duration),

    #[error("tier produced empty output")]
    Empty,

    #[error("no prompt for {0}")]
    NoPrompt(BodyKind),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error("fixture {path} unreadable: {source}")]
    Fixture {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The one failure the dispatcher lets through.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Every tier in the chain failed, or the chain is empty.
    #[error("every tier failed for {kind} at {path} ({attempts} attempted)")]
    Exhausted {
        path: String,
        kind: BodyKind,
        attempts: usize,
    },
}

/// Errors loading payload-replay routes.
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("cannot read payload config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid payload config {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("payload prefix {0:?} must start with '/'")]
    BadPrefix(String),
}
