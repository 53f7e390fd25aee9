//! Shared type definitions for the Skycast weather telemetry service.
//!
//! This crate is the single source of truth for the types that cross crate
//! boundaries and the wire. Wire types flow downstream to `TypeScript` via
//! `ts-rs` for dashboard clients.
//!
//! # Modules
//!
//! - [`enums`] -- Sky [`Condition`] and broadcast [`SchedulerState`]
//! - [`ids`] -- Type-safe UUID wrapper for subscribers
//! - [`structs`] -- [`CityProfile`] and the live [`WeatherObservation`]
//! - [`units`] -- Unit conversions and output rounding
//! - [`wire`] -- JSON message shapes pushed to subscribers

pub mod enums;
pub mod ids;
pub mod structs;
pub mod units;
pub mod wire;

// Re-export all public types at crate root for convenience.
pub use enums::{Condition, SchedulerState};
pub use ids::SubscriberId;
pub use structs::{CityProfile, WeatherObservation};
pub use units::{KPH_TO_MPH, celsius_to_fahrenheit, kph_to_mph, round_to_tenth};
pub use wire::{
    Coordinates, TIMESTAMP_FORMAT, Temperature, WeatherBroadcast, WeatherReading, WindSpeed,
    format_timestamp,
};
