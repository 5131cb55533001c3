//! # pandora-api — Decoy HTTP Surface
//!
//! Axum application serving plausible files for any path and method.
//!
//! | Path | Handler |
//! |------|---------|
//! | `/about` | [`routes::info`] version and banner |
//! | `/health/liveness`, `/health/readiness` | [`routes::info`] probes |
//! | anything else | [`routes::content::serve`] via the content registry |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → ServerHeader → Handler
//! ```
//!
//! Every response, error bodies included, carries the configured `Server`
//! header. Content responses carry `Content-Type` from the file extension
//! and `Content-Disposition: attachment` with the resolved file name.

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::middleware::from_fn_with_state;
use axum::Router;

pub use config::PandoraConfig;
pub use error::{AppError, BootError};
pub use state::AppState;

/// Assemble the application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::info::router())
        .fallback(routes::content::serve)
        .layer(from_fn_with_state(state.clone(), middleware::server_header))
        .layer(middleware::trace_layer())
        .with_state(state)
}
