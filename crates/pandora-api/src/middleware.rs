//! # Middleware
//!
//! Request tracing and the decoy `Server` fingerprint, applied to every
//! response including errors and probes.

use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// `TraceLayer` giving each request a span with method, URI and status.
pub fn trace_layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>> {
    TraceLayer::new_for_http()
}

/// Overwrite `Server` with the configured value.
pub async fn server_header(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let mut response = next.run(req).await;
    response
        .headers_mut()
        .insert(header::SERVER, state.server_header().clone());
    response
}
