//! Configuration, tick cycle, and broadcast scheduling for Skycast.
//!
//! This crate wires the simulated world and the forecaster into a
//! periodic broadcast that runs while subscribers are attached.
//!
//! # Modules
//!
//! - [`clock`] -- [`Clock`] trait with system and fixed implementations.
//! - [`config`] -- Configuration loading from `skycast-config.yaml` into
//!   strongly-typed structs.
//! - [`history`] -- Bounded [`ObservationHistory`] audit trail.
//! - [`registry`] -- [`SubscriberRegistry`] with bounded per-subscriber
//!   queues.
//! - [`scheduler`] -- [`BroadcastScheduler`], the Idle/Running loop.
//! - [`tick`] -- One advance, forecast, and record cycle.
//!
//! [`Clock`]: clock::Clock
//! [`ObservationHistory`]: history::ObservationHistory
//! [`SubscriberRegistry`]: registry::SubscriberRegistry
//! [`BroadcastScheduler`]: scheduler::BroadcastScheduler

pub mod clock;
pub mod config;
pub mod history;
pub mod registry;
pub mod scheduler;
pub mod tick;
