//! # Error Types
//!
//! The resolver is total and never fails; errors here cover the few places
//! where a caller hands the core malformed configuration, such as an unknown
//! body-kind name or a registry with overlapping extensions.

use thiserror::Error;

/// Top-level error type for `pandora-core`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A body-kind name did not match any known kind.
    #[error("unknown content kind: {0}")]
    UnknownKind(String),

    /// Two registered content types claim the same extension.
    #[error("extension {extension:?} is claimed by both {first} and {second}")]
    DuplicateExtension {
        /// The contested extension.
        extension: String,
        /// The kind registered first.
        first: String,
        /// The kind that tried to register it again.
        second: String,
    },

    /// Two registered content types claim the same directory prefix.
    #[error("prefix {prefix:?} is claimed by both {first} and {second}")]
    DuplicatePrefix {
        /// The contested prefix.
        prefix: String,
        /// The kind registered first.
        first: String,
        /// The kind that tried to register it again.
        second: String,
    },
}
