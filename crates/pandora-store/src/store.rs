//! # Content Store
//!
//! Filesystem cache of generated artifacts. An artifact lives at
//! `identity.root / identity.relative_path`; each content kind gets its own
//! subdirectory of the configured cache directory (see
//! [`ContentStore::root_for`]).
//!
//! ## Fail-Open Toggle
//!
//! When the store is disabled, `exists` is always `false`, `load` always
//! reports not-found and `save` does nothing. Callers cannot tell a disabled
//! store from one that never hits.
//!
//! ## Write Semantics
//!
//! Saves go to a uniquely named sibling temp file which is then renamed over
//! the target. Readers see either the old or the new bytes. Losing a write
//! to a crash is acceptable: this is a decoy cache, not a durable store.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use pandora_core::{BodyKind, ContentIdentity};
use uuid::Uuid;

use crate::error::StoreError;

/// Process-wide cache configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Cache toggle. Disabling must only ever cost performance.
    pub enabled: bool,
    /// Directory under which per-kind cache roots are created.
    pub cache_dir: PathBuf,
}

impl StoreConfig {
    pub fn new(enabled: bool, cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            enabled,
            cache_dir: cache_dir.into(),
        }
    }

    /// A store that never hits and never writes.
    pub fn disabled() -> Self {
        Self::new(false, PathBuf::new())
    }
}

/// Filesystem-backed cache keyed by [`ContentIdentity`].
#[derive(Debug, Clone)]
pub struct ContentStore {
    config: StoreConfig,
}

impl ContentStore {
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    /// Whether caching is switched on for this process.
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// The configured cache directory.
    pub fn cache_dir(&self) -> &Path {
        &self.config.cache_dir
    }

    /// Root directory for artifacts of one content kind.
    pub fn root_for(&self, kind: BodyKind) -> PathBuf {
        self.config.cache_dir.join(kind.as_str())
    }

    /// Whether a cached artifact exists for `identity`.
    pub async fn exists(&self, identity: &ContentIdentity) -> bool {
        if !self.is_enabled() {
            return false;
        }
        tokio::fs::metadata(identity.full_path())
            .await
            .map(|m| m.is_file())
            .unwrap_or(false)
    }

    /// Read a cached artifact.
    ///
    /// Returns `Ok(None)` when the store is disabled or nothing is cached.
    /// A file deleted between `exists` and `load` is also `Ok(None)`.
    pub async fn load(&self, identity: &ContentIdentity) -> Result<Option<Vec<u8>>, StoreError> {
        if !self.is_enabled() {
            return Ok(None);
        }
        let path = identity.full_path();
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::io(path, e)),
        }
    }

    /// Write `bytes` for `identity`, creating parent directories and
    /// overwriting any previous artifact. A no-op when disabled.
    pub async fn save(&self, identity: &ContentIdentity, bytes: &[u8]) -> Result<(), StoreError> {
        if !self.is_enabled() {
            return Ok(());
        }

        let dir = identity.parent_dir();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| StoreError::io(&dir, e))?;

        let target = identity.full_path();
        let tmp = dir.join(format!(".{}.{}.tmp", identity.file_name, Uuid::new_v4().simple()));
        if let Err(e) = tokio::fs::write(&tmp, bytes).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(StoreError::io(tmp, e));
        }
        if let Err(e) = tokio::fs::rename(&tmp, &target).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(StoreError::io(target, e));
        }

        tracing::debug!(path = %target.display(), bytes = bytes.len(), "cached artifact");
        Ok(())
    }
}
