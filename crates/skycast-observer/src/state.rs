//! Shared application state for the API server.
//!
//! [`AppState`] is a thin handle on the [`BroadcastScheduler`]: the
//! `WebSocket` handler attaches and detaches through it, and the REST
//! handlers read its retained broadcast and history. Nothing here mutates
//! simulation state.

use std::sync::Arc;

use skycast_core::scheduler::BroadcastScheduler;

/// Name reported by the health endpoint.
pub const SERVICE_NAME: &str = "Weather WebSocket Service";

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The broadcast loop and its subscriber set.
    pub scheduler: Arc<BroadcastScheduler>,
    /// Service name reported by `/health`.
    pub service_name: String,
}

impl AppState {
    /// Create application state around `scheduler`.
    pub fn new(scheduler: Arc<BroadcastScheduler>) -> Self {
        Self {
            scheduler,
            service_name: SERVICE_NAME.to_owned(),
        }
    }
}
