//! HTTP front end: routing and middleware.

pub mod error;
mod health;
mod hooks;

use std::time::Duration;

use axum::Router;
use tower_http::{compression::CompressionLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::state::AppState;

/// How long a single request may take before the front end gives up on it.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Create the main router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health endpoints
        .merge(health::routes())
        // The hook ingestion endpoint the configurator posts to
        .merge(hooks::routes())
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        // Application state
        .with_state(state)
}
