//! Application state shared across request handlers.

use std::sync::Arc;

use bridge_handoff::DecorationHub;

use crate::allocator::AllocatorGateway;

/// Shared application state.
///
/// Holds the two process-wide resources the request path touches: the
/// decoration hub and the allocator gateway. Handlers receive it via Axum's
/// state extractor; the embedding allocator keeps its own `Arc` to the hub
/// for the blocking `wait_for_*` side.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    hub: Arc<DecorationHub>,
    gateway: AllocatorGateway,
}

impl AppState {
    pub fn new(hub: Arc<DecorationHub>, gateway: AllocatorGateway) -> Self {
        Self {
            inner: Arc::new(AppStateInner { hub, gateway }),
        }
    }

    /// The decoration mailboxes.
    pub fn hub(&self) -> &DecorationHub {
        &self.inner.hub
    }

    /// The allocator gateway.
    pub fn gateway(&self) -> &AllocatorGateway {
        &self.inner.gateway
    }
}
