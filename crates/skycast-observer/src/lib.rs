//! Subscriber API server for Skycast.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **`WebSocket` endpoint** (`/ws`) streaming one weather broadcast per
//!   scheduler tick; the first connection starts the scheduler and the
//!   last disconnection lets it go idle
//! - **Health endpoint** (`/health`) with subscriber count and scheduler
//!   state
//! - **REST endpoints** for cities, the latest broadcast, and recent
//!   history
//!
//! # Architecture
//!
//! Handlers never touch simulation state directly; they go through the
//! shared [`BroadcastScheduler`], which retains the latest broadcast and a
//! bounded history for read-only queries.
//!
//! [`BroadcastScheduler`]: skycast_core::scheduler::BroadcastScheduler

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod startup;
pub mod state;
pub mod ws;

// Re-export primary types for convenience.
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use state::AppState;
