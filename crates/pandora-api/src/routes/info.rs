//! Fixed information endpoints: `/about` and the health probes.
//!
//! Only `GET` is special. Any other method on these paths is served by the
//! content catch-all like every other path, so no method ever gets a 405.

use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use super::content::serve;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct About {
    pub version: &'static str,
    pub message: &'static str,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/about", get(about).fallback(serve))
        .route("/health/liveness", get(liveness).fallback(serve))
        .route("/health/readiness", get(readiness).fallback(serve))
}

async fn about() -> Json<About> {
    tracing::info!("about requested");
    Json(About {
        version: env!("CARGO_PKG_VERSION"),
        message: "Pandora server",
    })
}

/// Liveness probe: 200 while the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe: state is built before the listener binds, so serving
/// means ready.
async fn readiness() -> &'static str {
    "ready"
}
