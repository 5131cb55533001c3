//! Store and janitor error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from [`ContentStore`](crate::ContentStore) reads and writes.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Filesystem failure on a cached artifact.
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors that abort a janitor pass for one root.
///
/// Per-file failures never surface here; they are logged and skipped.
#[derive(Error, Debug)]
pub enum JanitorError {
    /// The root exists but cannot be listed.
    #[error("cannot read janitor root {path}: {source}")]
    RootUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The root path exists but is not a directory.
    #[error("janitor root {0} is not a directory")]
    NotADirectory(PathBuf),
}
