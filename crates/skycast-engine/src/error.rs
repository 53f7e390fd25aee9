//! Error types for the engine binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during startup.

/// Top-level error for the engine binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: skycast_core::config::ConfigError,
    },

    /// The city catalogue was rejected.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: skycast_world::WorldError,
    },

    /// The API server failed to start.
    #[error("server error: {source}")]
    Server {
        /// The underlying startup error.
        #[from]
        source: skycast_observer::startup::StartupError,
    },

    /// The server stopped serving with an error.
    #[error("server stopped: {source}")]
    Serve {
        /// The underlying bind or serve error.
        #[from]
        source: skycast_observer::server::ServerError,
    },

    /// The server returned without being asked to stop.
    #[error("server exited unexpectedly")]
    ServerExited,

    /// The server task ended abnormally.
    #[error("server task failed: {source}")]
    Join {
        /// The underlying join error.
        #[from]
        source: tokio::task::JoinError,
    },
}
