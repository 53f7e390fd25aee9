//! City catalogue, live weather state, and simulation for Skycast.
//!
//! This crate models the simulated atmosphere: which cities exist, what
//! each city's weather is right now, and how it evolves from one tick to
//! the next.
//!
//! # Modules
//!
//! - [`cities`] -- Default five-city catalogue.
//! - [`error`] -- Error types for state lookups and catalogue validation.
//! - [`random`] -- [`RandomSource`] abstraction with a seedable
//!   [`rand`]-backed source and a scripted source for exact replay.
//! - [`simulation`] -- [`SimulationEngine`], the gradual-change clamp, and
//!   seasonal/diurnal temperature targets.
//! - [`store`] -- [`WeatherStateStore`], one observation per city.
//! - [`transitions`] -- [`ConditionTransitionTable`] for the sky-state
//!   Markov chain.

pub mod cities;
pub mod error;
pub mod random;
pub mod simulation;
pub mod store;
pub mod transitions;

// Re-export primary types at crate root.
pub use cities::default_cities;
pub use error::WorldError;
pub use random::{RandomSource, RngSource, ScriptedSource};
pub use simulation::{SimulationEngine, gradual_change, target_temperature};
pub use store::WeatherStateStore;
pub use transitions::ConditionTransitionTable;
