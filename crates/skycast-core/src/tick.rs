//! One broadcast cycle: advance every city, forecast it, package the result.
//!
//! Each tick runs through three phases:
//!
//! 1. **Advance** -- initialize any city without state, then step every
//!    city's observation through the [`SimulationEngine`].
//! 2. **Forecast** -- ask the [`ForecastAdapter`] for a clamped
//!    short-horizon forecast of each new observation.
//! 3. **Record** -- append the new observations to the bounded
//!    [`ObservationHistory`] and assemble the [`WeatherBroadcast`].
//!
//! The tick is synchronous and deterministic given the same store, random
//! source, predictor, and `now`.

use chrono::{DateTime, Utc};
use skycast_forecast::ForecastAdapter;
use skycast_types::{CityProfile, WeatherBroadcast, WeatherObservation, format_timestamp};
use skycast_world::{SimulationEngine, WeatherStateStore, WorldError};
use tracing::{debug, info};

use crate::history::ObservationHistory;

/// Errors that can occur during tick execution.
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    /// A world state operation failed.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: WorldError,
    },

    /// The broadcast could not be encoded.
    #[error("failed to encode broadcast: {source}")]
    Encode {
        /// The underlying serialization error.
        #[from]
        source: serde_json::Error,
    },

    /// The tick task panicked or was cancelled before finishing.
    #[error("tick aborted: {source}")]
    Aborted {
        /// The join failure of the tick task.
        #[from]
        source: tokio::task::JoinError,
    },
}

/// Everything a tick reads and writes.
#[derive(Debug)]
pub struct SimulationState {
    /// Current observation per city.
    pub store: WeatherStateStore,
    /// Step function and its random source.
    pub engine: SimulationEngine,
    /// Forecast wrapper around the predictor.
    pub forecaster: ForecastAdapter,
    /// Recent observations for the history endpoint.
    pub history: ObservationHistory,
    /// Number of completed ticks.
    pub ticks: u64,
}

impl SimulationState {
    /// Bundle the tick inputs.
    pub const fn new(
        store: WeatherStateStore,
        engine: SimulationEngine,
        forecaster: ForecastAdapter,
        history: ObservationHistory,
    ) -> Self {
        Self {
            store,
            engine,
            forecaster,
            history,
            ticks: 0,
        }
    }

    /// Draw initial state for any city that has none.
    pub fn initialize(&mut self, now: DateTime<Utc>) -> usize {
        self.store.initialize(self.engine.random_mut(), now)
    }

    /// Configured city profiles, in broadcast order.
    pub fn profiles(&self) -> &[CityProfile] {
        self.store.profiles()
    }
}

/// Execute one tick at `now`.
///
/// Every city's next state and forecast are computed before any of them is
/// stored, so a failed tick leaves the store, history, and tick count as
/// they were. Random draws made by a failed tick are not replayed.
///
/// # Errors
///
/// Returns [`TickError::World`] if a city's state cannot be read or
/// replaced.
pub fn run_tick(
    state: &mut SimulationState,
    now: DateTime<Utc>,
) -> Result<WeatherBroadcast, TickError> {
    let created = state.initialize(now);
    if created > 0 {
        info!(cities = created, "Initialized weather state");
    }

    // --- Phase 1 & 2: Advance and forecast (staged) ---
    let profiles: Vec<CityProfile> = state.profiles().to_vec();
    let mut observed: Vec<WeatherObservation> = Vec::with_capacity(profiles.len());
    let mut current_weather = Vec::with_capacity(profiles.len());
    let mut predictions = Vec::with_capacity(profiles.len());

    for profile in &profiles {
        let current = state.store.get(&profile.name)?;
        let next = state.engine.next_observation(profile, current, now);
        let forecast = state.forecaster.forecast(&next, now);
        debug!(
            city = %profile.name,
            temperature = next.temperature_celsius,
            forecast = forecast.temperature_celsius,
            condition = %next.condition,
            "City advanced"
        );
        current_weather.push(next.to_reading(profile.coordinates()));
        predictions.push(forecast.to_reading(profile.coordinates()));
        observed.push(next);
    }

    // --- Phase 3: Commit and record ---
    for observation in &observed {
        state.store.replace(&observation.city, observation.clone())?;
    }
    for observation in observed {
        state.history.push(observation);
    }
    state.ticks = state.ticks.saturating_add(1);

    info!(
        tick = state.ticks,
        cities = current_weather.len(),
        "Tick completed"
    );

    Ok(WeatherBroadcast {
        timestamp: format_timestamp(now),
        current_weather,
        predictions,
    })
}
