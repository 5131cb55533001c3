//! # pandora-core — Foundational Types for the Pandora Decoy Server
//!
//! Pandora answers arbitrary HTTP requests for files of many types with
//! plausible synthetic content. This crate holds the pieces every other
//! crate in the workspace agrees on:
//!
//! 1. **`ContentIdentity`.** The canonical `{root, relative path, file name,
//!    extension}` form of a request path. Produced by a pure, total resolver;
//!    the relative path always ends in `.{extension}` and never escapes the
//!    root.
//!
//! 2. **`ContentType` descriptors.** One static entry per registered type
//!    (default file name, canonical extension, accepted extensions, directory
//!    prefixes, body kind). The registry in `pandora-synth` is built from these.
//!
//! 3. **Media-type lookup.** Extension → MIME string for response headers. A
//!    pure table lookup; the bytes themselves are never inspected.
//!
//! 4. **Environment helpers.** Typed readers over a variable lookup, shared
//!    by every `from_env()` in the workspace.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `pandora-*` crates (this is the leaf of the DAG).
//! - No I/O. Nothing here touches the filesystem or the network; the
//!   environment is read only through the [`env::Lookup`] trait.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod content_type;
pub mod env;
pub mod error;
pub mod identity;
pub mod media;

pub use content_type::{BodyKind, ContentType, Descriptor, BUILTIN_TYPES};
pub use env::ConfigError;
pub use error::CoreError;
pub use identity::ContentIdentity;
pub use media::{guess_media_type, media_type_or_default, OCTET_STREAM};
