//! # pandora-store — Content Cache and Janitor
//!
//! Two independent pieces that share only the filesystem:
//!
//! - [`ContentStore`]: the write-through cache of generated artifacts, keyed
//!   by [`ContentIdentity`](pandora_core::ContentIdentity). A process-wide
//!   `enabled` flag turns it into a permanent miss without changing any other
//!   behavior.
//! - [`Janitor`]: a background task that periodically walks configured roots,
//!   deleting files past a grace period and then trimming least-recently
//!   accessed files until each root fits its byte budget.
//!
//! ## Concurrency
//!
//! Neither piece holds an in-process lock. Concurrent saves for the same
//! identity race benignly (last writer wins); the janitor tolerates files
//! vanishing under it. Both rely on filesystem atomicity of rename/unlink.

pub mod error;
pub mod janitor;
pub mod store;

pub use error::{JanitorError, StoreError};
pub use janitor::{
    prune_root, Janitor, JanitorConfig, JanitorRoot, PruneSummary, DEFAULT_INTERVAL,
    DEFAULT_MAX_BYTES, DEFAULT_MIN_AGE,
};
pub use store::{ContentStore, StoreConfig};
