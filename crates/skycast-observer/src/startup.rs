//! Server startup helper for embedding in the engine binary.
//!
//! Provides [`spawn_server`] which launches the HTTP + `WebSocket` server
//! on a background Tokio task so the binary can hold its handle alongside
//! the scheduler.
//!
//! # Usage
//!
//! ```rust,ignore
//! use skycast_observer::server::ServerConfig;
//! use skycast_observer::startup::spawn_server;
//! use skycast_observer::state::AppState;
//! use std::sync::Arc;
//!
//! let state = Arc::new(AppState::new(scheduler));
//! let handle = spawn_server(ServerConfig::default(), state)?;
//! handle.await??;
//! ```

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::server::{ServerConfig, ServerError};
use crate::state::AppState;

/// Errors that can occur when spawning the server.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// The server failed to bind or start.
    #[error("server start error: {0}")]
    Server(#[from] ServerError),
}

/// Spawn the HTTP server on a background Tokio task.
///
/// The address is validated before the task is spawned. Bind and serve
/// failures inside the task are logged and returned through the handle.
///
/// # Errors
///
/// Returns [`StartupError::Server`] if the configured address is invalid.
pub fn spawn_server(
    config: ServerConfig,
    state: Arc<AppState>,
) -> Result<JoinHandle<Result<(), ServerError>>, StartupError> {
    let addr = config.socket_addr()?;

    let handle = tokio::spawn(async move {
        let result = crate::server::start_server(&config, state).await;
        if let Err(e) = &result {
            tracing::error!(error = %e, "Weather server exited with error");
        }
        result
    });

    tracing::info!(%addr, "Weather server spawned on background task");

    Ok(handle)
}
