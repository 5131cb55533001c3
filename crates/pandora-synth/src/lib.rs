//! # pandora-synth — Content Synthesis
//!
//! Everything between a routed request and the bytes in the response.
//!
//! - [`builders`]: one body builder per [`BodyKind`](pandora_core::BodyKind),
//!   deterministic in its seed.
//! - [`chain`]: tiered strategies (language model, synthetic, static
//!   fixture) run in order until one produces output.
//! - [`registry`]: the immutable map from request path to content type,
//!   chain or payload replay.
//! - [`dispatcher`]: cache lookup, chain execution and save-through.
//! - [`fallback`]: answers for paths nothing else claims.
//! - [`decoy`]: the occasional redirect or 404 in place of content.
//!
//! ## Failure model
//!
//! Tier failures are logged and absorbed. Cache failures are logged and
//! absorbed. The only error that reaches the HTTP layer is
//! [`DispatchError::Exhausted`], raised when every tier of a chain failed.

pub mod builders;
pub mod chain;
pub mod decoy;
pub mod dispatcher;
pub mod error;
pub mod fallback;
pub mod faker;
pub mod payload;
pub mod prompt;
pub mod registry;

pub use chain::{
    GenerationContext, GenerativeStrategy, GeneratorChain, Produced, StaticStrategy, Strategy,
    SyntheticStrategy, Tier,
};
pub use decoy::{DecoyError, DecoyErrors};
pub use dispatcher::{Dispatcher, Generated, Source};
pub use error::{DispatchError, PayloadError, TierFailure};
pub use fallback::{resolve_unknown, Acknowledgement, Fallback, Verb};
pub use payload::{load_payloads, Payload};
pub use registry::{
    default_chain, is_site_root, ChainSettings, ContentRegistry, PrimarySettings, RegisteredType, Route,
    VIDEO_FIXTURE,
};
