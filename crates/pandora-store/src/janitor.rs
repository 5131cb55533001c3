//! # Janitor
//!
//! Background eviction over a set of cache roots. Each pass runs two
//! phases per root:
//!
//! 1. **Age purge.** Every regular file whose newest timestamp
//!    (`max(atime, mtime)`) is older than `min_age` is deleted, whatever the
//!    root's total size.
//! 2. **LRU trim.** If the surviving files still exceed `max_bytes`, they are
//!    deleted oldest-accessed first until the total fits.
//!
//! A file that disappears mid-pass (a concurrent request wrote over it, or
//! another process removed it) is not an error. Per-file I/O failures are
//! logged and skipped; only a root that cannot be listed at all aborts that
//! root's pass.
//!
//! Passes are strictly sequential: the loop sleeps *after* a pass finishes,
//! so a slow pass can never overlap the next one.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use serde::Serialize;
use tokio::task::JoinHandle;
use walkdir::WalkDir;

use crate::error::JanitorError;

/// Default byte budget per root (8 GiB).
pub const DEFAULT_MAX_BYTES: u64 = 8 * 1024 * 1024 * 1024;
/// Default grace period before a file is purged by age.
pub const DEFAULT_MIN_AGE: Duration = Duration::from_secs(3600);
/// Default sleep between passes.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(900);

/// One monitored directory and its budgets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JanitorRoot {
    pub path: PathBuf,
    pub max_bytes: u64,
    pub min_age: Duration,
}

impl JanitorRoot {
    pub fn new(path: impl Into<PathBuf>, max_bytes: u64, min_age: Duration) -> Self {
        Self {
            path: path.into(),
            max_bytes,
            min_age,
        }
    }

    /// A root with the default budgets.
    pub fn with_defaults(path: impl Into<PathBuf>) -> Self {
        Self::new(path, DEFAULT_MAX_BYTES, DEFAULT_MIN_AGE)
    }
}

/// The full janitor configuration, loaded once at boot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JanitorConfig {
    pub roots: Vec<JanitorRoot>,
    pub interval: Duration,
}

impl JanitorConfig {
    /// Build a config, dropping roots whose path was already listed.
    /// The first occurrence wins.
    pub fn new(roots: impl IntoIterator<Item = JanitorRoot>, interval: Duration) -> Self {
        let mut unique: Vec<JanitorRoot> = Vec::new();
        for root in roots {
            if !unique.iter().any(|r| r.path == root.path) {
                unique.push(root);
            }
        }
        Self {
            roots: unique,
            interval,
        }
    }
}

/// Outcome of one pass over one root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PruneSummary {
    pub root: PathBuf,
    pub deleted: u64,
    pub freed_bytes: u64,
}

impl PruneSummary {
    fn empty(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            ..Self::default()
        }
    }
}

impl fmt::Display for PruneSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: deleted {} files, freed {} bytes",
            self.root.display(),
            self.deleted,
            self.freed_bytes
        )
    }
}

// -- Pass implementation -----------------------------------------------------

/// A regular file seen during a walk.
struct Candidate {
    path: PathBuf,
    size: u64,
    accessed: SystemTime,
    modified: SystemTime,
}

impl Candidate {
    fn last_touched(&self) -> SystemTime {
        self.accessed.max(self.modified)
    }
}

enum Removal {
    Deleted,
    AlreadyGone,
    Failed,
}

/// Run one age-purge + LRU-trim pass over `root`.
///
/// `now` is injected so callers (and tests) control the clock. A missing
/// root is an empty pass, not an error.
pub fn prune_root(root: &JanitorRoot, now: SystemTime) -> Result<PruneSummary, JanitorError> {
    let path = root.path.as_path();
    let meta = match fs::metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(PruneSummary::empty(path)),
        Err(source) => {
            return Err(JanitorError::RootUnreadable {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    if !meta.is_dir() {
        return Err(JanitorError::NotADirectory(path.to_path_buf()));
    }
    fs::read_dir(path).map_err(|source| JanitorError::RootUnreadable {
        path: path.to_path_buf(),
        source,
    })?;

    let mut summary = PruneSummary::empty(path);

    // Pass 1: age purge.
    for file in scan(path) {
        let age = now
            .duration_since(file.last_touched())
            .unwrap_or(Duration::ZERO);
        if age > root.min_age {
            if let Removal::Deleted = remove(&file.path) {
                summary.deleted += 1;
                summary.freed_bytes += file.size;
            }
        }
    }

    // Pass 2: LRU trim over whatever survived.
    let survivors = scan(path);
    let mut total: u64 = survivors.iter().map(|f| f.size).sum();
    if total > root.max_bytes {
        let mut heap: BinaryHeap<Reverse<(SystemTime, u64, PathBuf)>> = survivors
            .into_iter()
            .map(|f| Reverse((f.accessed, f.size, f.path)))
            .collect();

        while total > root.max_bytes {
            let Some(Reverse((_, size, file))) = heap.pop() else {
                break;
            };
            match remove(&file) {
                Removal::Deleted => {
                    summary.deleted += 1;
                    summary.freed_bytes += size;
                    total = total.saturating_sub(size);
                }
                Removal::AlreadyGone => total = total.saturating_sub(size),
                Removal::Failed => {}
            }
        }
    }

    Ok(summary)
}

fn scan(root: &Path) -> Vec<Candidate> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(false) {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                if !is_not_found(e.io_error()) {
                    tracing::warn!(root = %root.display(), error = %e, "janitor walk error");
                }
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let meta = match entry.metadata() {
            Ok(m) => m,
            Err(e) => {
                if !is_not_found(e.io_error()) {
                    tracing::warn!(path = %entry.path().display(), error = %e, "janitor stat failed");
                }
                continue;
            }
        };
        let modified = meta.modified().unwrap_or(SystemTime::UNIX_EPOCH);
        let accessed = meta.accessed().unwrap_or(modified);
        files.push(Candidate {
            path: entry.into_path(),
            size: meta.len(),
            accessed,
            modified,
        });
    }
    files
}

fn remove(path: &Path) -> Removal {
    match fs::remove_file(path) {
        Ok(()) => Removal::Deleted,
        Err(e) if e.kind() == ErrorKind::NotFound => Removal::AlreadyGone,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "janitor delete failed");
            Removal::Failed
        }
    }
}

fn is_not_found(err: Option<&std::io::Error>) -> bool {
    err.is_some_and(|e| e.kind() == ErrorKind::NotFound)
}

// -- Background task -----------------------------------------------------------

/// Periodic eviction over every configured root.
#[derive(Debug, Clone)]
pub struct Janitor {
    config: JanitorConfig,
}

impl Janitor {
    pub fn new(config: JanitorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &JanitorConfig {
        &self.config
    }

    /// Run one pass over every root. Roots that fail are logged and left
    /// out of the result.
    pub async fn run_pass(&self) -> Vec<PruneSummary> {
        let mut summaries = Vec::with_capacity(self.config.roots.len());
        for root in &self.config.roots {
            let job = root.clone();
            let outcome =
                tokio::task::spawn_blocking(move || prune_root(&job, SystemTime::now())).await;
            match outcome {
                Ok(Ok(summary)) => {
                    tracing::info!(
                        root = %summary.root.display(),
                        deleted = summary.deleted,
                        freed_bytes = summary.freed_bytes,
                        "janitor pass complete"
                    );
                    summaries.push(summary);
                }
                Ok(Err(e)) => {
                    tracing::warn!(root = %root.path.display(), error = %e, "janitor skipped root");
                }
                Err(e) => {
                    tracing::warn!(root = %root.path.display(), error = %e, "janitor task failed");
                }
            }
        }
        summaries
    }

    /// Start the pass-then-sleep loop on the Tokio runtime.
    ///
    /// Returns `None` when there is nothing to watch.
    pub fn spawn(self) -> Option<JoinHandle<()>> {
        if self.config.roots.is_empty() {
            tracing::info!("janitor disabled: no roots configured");
            return None;
        }
        tracing::info!(
            roots = self.config.roots.len(),
            interval_secs = self.config.interval.as_secs(),
            "janitor started"
        );
        Some(tokio::spawn(async move {
            loop {
                self.run_pass().await;
                tokio::time::sleep(self.config.interval).await;
            }
        }))
    }
}
