//! # Content Catch-All
//!
//! Every path and method not claimed by a fixed route lands here and is
//! routed through the registry:
//!
//! - payload prefix: the fixture file, verbatim, never cached;
//! - typed route: dispatcher (cache, then generator chain);
//! - unknown path: the fallback, which either acknowledges a mutating verb
//!   or delegates to a randomly chosen type.
//!
//! Reads of the site root and of unknown paths occasionally get a decoy
//! redirect or 404 instead. The source of the bytes (cache or tier) is
//! logged, never sent.

use axum::extract::State;
use axum::http::{header, HeaderValue, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Json;
use pandora_core::{media_type_or_default, Descriptor};
use pandora_synth::{
    is_site_root, resolve_unknown, DecoyError, Fallback, Payload, RegisteredType, Route, Verb,
};

use crate::error::AppError;
use crate::state::AppState;

pub async fn serve(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
) -> Result<Response, AppError> {
    let path = uri.path();
    let verb = Verb::from_method(method.as_str());
    match state.registry().route(path) {
        Route::Payload(payload) => serve_payload(payload, path).await,
        Route::Typed { entry, descriptor } => {
            if !verb.is_mutating() && is_site_root(path) {
                if let Some(response) = decoy_error(&state, &uri)? {
                    return Ok(response);
                }
            }
            serve_typed(&state, path, entry, &descriptor).await
        }
        Route::Unknown => {
            if !verb.is_mutating() {
                if let Some(response) = decoy_error(&state, &uri)? {
                    return Ok(response);
                }
            }
            let fallback = resolve_unknown(state.registry(), verb, &mut rand::thread_rng());
            match fallback {
                Fallback::Acknowledge(ack) => {
                    tracing::info!(%method, path, "acknowledged mutating request");
                    Ok(Json(ack).into_response())
                }
                Fallback::Delegate(entry) => {
                    tracing::debug!(path, kind = %entry.kind(), "unknown path delegated");
                    let descriptor = entry.content_type.descriptor();
                    serve_typed(&state, path, entry, &descriptor).await
                }
                Fallback::Nothing => Err(AppError::NotFound(path.to_string())),
            }
        }
    }
}

/// Roll the configured decoy-error policy for this request.
fn decoy_error(state: &AppState, uri: &Uri) -> Result<Option<Response>, AppError> {
    let target = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());
    match state.decoy_errors().roll(target, &mut rand::thread_rng()) {
        None => Ok(None),
        Some(DecoyError::Redirect(location)) => {
            tracing::info!(path = target, %location, "decoy redirect");
            match HeaderValue::from_str(&location) {
                Ok(value) => Ok(Some(
                    (StatusCode::FOUND, [(header::LOCATION, value)]).into_response(),
                )),
                Err(_) => Err(AppError::NotFound(target.to_string())),
            }
        }
        Some(DecoyError::NotFound) => {
            tracing::info!(path = target, "decoy not found");
            Err(AppError::NotFound(target.to_string()))
        }
    }
}

async fn serve_typed(
    state: &AppState,
    path: &str,
    entry: &RegisteredType,
    descriptor: &Descriptor<'_>,
) -> Result<Response, AppError> {
    let dispatcher = state.dispatcher();
    let identity = dispatcher.identify(entry, path, descriptor);
    let generated = match dispatcher.resolve(&identity, entry).await {
        Ok(generated) => generated,
        Err(e) => {
            tracing::error!(path, kind = %entry.kind(), error = %e, "no tier produced content");
            return Err(e.into());
        }
    };

    tracing::info!(
        path,
        file = %identity.relative_path,
        kind = %entry.kind(),
        source = ?generated.source,
        "served content"
    );
    let media_type =
        media_type_or_default(&identity.extension, Some(entry.content_type.media_type));
    Ok(file_response(generated.bytes, media_type, &identity.file_name))
}

async fn serve_payload(payload: &Payload, path: &str) -> Result<Response, AppError> {
    match tokio::fs::read(&payload.file).await {
        Ok(bytes) => {
            tracing::info!(path, file = %payload.file.display(), "served payload");
            Ok(file_response(bytes, &payload.media_type, &payload.file_name()))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!(path, file = %payload.file.display(), "payload file missing");
            Err(AppError::NotFound(path.to_string()))
        }
        Err(e) => Err(AppError::Internal(format!(
            "payload {} unreadable: {e}",
            payload.file.display()
        ))),
    }
}

fn file_response(bytes: Vec<u8>, media_type: &str, file_name: &str) -> Response {
    let content_type = HeaderValue::from_str(media_type)
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));
    (
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_DISPOSITION, attachment(file_name)),
        ],
        bytes,
    )
        .into_response()
}

/// `attachment; filename="..."` with characters that cannot appear in a
/// quoted header value replaced by `_`.
pub fn attachment(file_name: &str) -> HeaderValue {
    let safe: String = file_name
        .chars()
        .map(|c| {
            if (c.is_ascii_graphic() && c != '"' && c != '\\') || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect();
    HeaderValue::from_str(&format!("attachment; filename=\"{safe}\""))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"))
}
