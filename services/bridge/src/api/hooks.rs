//! The hook ingestion endpoint the configurator posts to.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
    Router,
};
use tracing::debug;

use crate::api::error::ApiError;
use crate::dispatch;
use crate::multipart;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/", post(ingest))
}

/// Decode one multipart hook request and dispatch it.
///
/// All per-request state lives in this function's scope; nothing survives
/// the request except what was posted to the hub or handed to the
/// allocator. Success is 202 with no body, including for unknown kinds,
/// which are accepted and dropped.
async fn ingest(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    let message = multipart::decode(&headers, &body)?;
    debug!(
        kind = %message.kind,
        payload_len = message.payload.len(),
        "decoded hook request"
    );

    let outcome = dispatch::dispatch(message, state.hub(), state.gateway())?;
    debug!(?outcome, "dispatched hook request");

    Ok(StatusCode::ACCEPTED)
}
