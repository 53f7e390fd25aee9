//! Weather evolution for a single city.
//!
//! Each tick the engine nudges every measurement towards a target, never
//! moving further than a fixed step:
//!
//! | Field | Target | Max step | Bounds |
//! |-------|--------|----------|--------|
//! | Temperature | band midpoint + 5·seasonal + 3·diurnal | 0.2 °C | none |
//! | Humidity | current + U(-2, 2) | 1 % | 30..=90 |
//! | Wind | current + U(-1, 1) | 0.5 km/h | >= 0 |
//! | Pressure | current + U(-0.5, 0.5) | 0.2 hPa | 980..=1025 |
//!
//! The condition changes with probability 0.02 per tick, to a successor
//! drawn uniformly from the [`ConditionTransitionTable`].
//!
//! # Rounding
//!
//! Temperature and wind are stored unrounded. Humidity and pressure are
//! rounded to whole numbers before they are stored, and the stored value is
//! the starting point of the next tick. With a 0.2 hPa step this means
//! pressure rounds back to its previous value; that behaviour is kept.
//!
//! # Draw order
//!
//! Per tick: humidity delta, wind delta, pressure delta, condition roll,
//! and (only when the roll fires) the successor index.

use std::f64::consts::TAU;

use chrono::{DateTime, Datelike, Timelike, Utc};
use skycast_types::{CityProfile, Condition, WeatherObservation};

use crate::error::WorldError;
use crate::random::RandomSource;
use crate::store::WeatherStateStore;
use crate::transitions::ConditionTransitionTable;

/// Maximum temperature change per tick (°C).
pub const MAX_TEMP_STEP: f64 = 0.2;
/// Maximum humidity change per tick (percentage points).
pub const MAX_HUMIDITY_STEP: f64 = 1.0;
/// Maximum wind speed change per tick (km/h).
pub const MAX_WIND_STEP: f64 = 0.5;
/// Maximum pressure change per tick (hPa).
pub const MAX_PRESSURE_STEP: f64 = 0.2;
/// Probability that a city's condition changes on a given tick.
pub const CONDITION_CHANGE_PROBABILITY: f64 = 0.02;

/// Lowest stored humidity.
pub const HUMIDITY_MIN: u8 = 30;
/// Highest stored humidity.
pub const HUMIDITY_MAX: u8 = 90;
/// Lowest stored pressure.
pub const PRESSURE_MIN: u16 = 980;
/// Highest stored pressure.
pub const PRESSURE_MAX: u16 = 1025;
/// Upper bound of the initial wind speed draw (km/h).
pub const INITIAL_WIND_MAX_KPH: f64 = 30.0;

/// Amplitude of the seasonal temperature swing (°C).
const SEASONAL_AMPLITUDE: f64 = 5.0;
/// Amplitude of the diurnal temperature swing (°C).
const DAILY_AMPLITUDE: f64 = 3.0;

/// Move `current` towards `target` by at most `max_step`.
///
/// Returns `target` exactly when it is within `max_step`, otherwise
/// `current ± max_step` in the direction of `target`.
pub fn gradual_change(current: f64, target: f64, max_step: f64) -> f64 {
    let diff = target - current;
    if diff.abs() > max_step {
        if diff > 0.0 {
            current + max_step
        } else {
            current - max_step
        }
    } else {
        target
    }
}

/// `sin(2π · day_of_year / 365)`, in `[-1, 1]`.
pub fn seasonal_factor(now: DateTime<Utc>) -> f64 {
    (TAU * f64::from(now.ordinal()) / 365.0).sin()
}

/// `sin(2π · (hour + minute / 60) / 24)`, in `[-1, 1]`.
pub fn daily_factor(now: DateTime<Utc>) -> f64 {
    let hours = f64::from(now.hour()) + f64::from(now.minute()) / 60.0;
    (TAU * hours / 24.0).sin()
}

/// Temperature the city is drifting towards at `now`.
pub fn target_temperature(profile: &CityProfile, now: DateTime<Utc>) -> f64 {
    DAILY_AMPLITUDE.mul_add(
        daily_factor(now),
        SEASONAL_AMPLITUDE.mul_add(seasonal_factor(now), profile.mid_seasonal_temp()),
    )
}

/// Computes successive observations from the current state and the clock.
pub struct SimulationEngine {
    random: Box<dyn RandomSource>,
    transitions: ConditionTransitionTable,
}

impl core::fmt::Debug for SimulationEngine {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SimulationEngine")
            .field("transitions", &self.transitions)
            .finish_non_exhaustive()
    }
}

impl SimulationEngine {
    /// Create an engine with the standard transition table.
    pub fn new(random: Box<dyn RandomSource>) -> Self {
        Self::with_transitions(random, ConditionTransitionTable::standard())
    }

    /// Create an engine with a custom transition table.
    pub fn with_transitions(
        random: Box<dyn RandomSource>,
        transitions: ConditionTransitionTable,
    ) -> Self {
        Self {
            random,
            transitions,
        }
    }

    /// The engine's random source, shared with store initialization.
    pub fn random_mut(&mut self) -> &mut dyn RandomSource {
        self.random.as_mut()
    }

    /// The transition table in use.
    pub const fn transitions(&self) -> &ConditionTransitionTable {
        &self.transitions
    }

    /// Compute the observation that follows `current` at `now`.
    pub fn next_observation(
        &mut self,
        profile: &CityProfile,
        current: &WeatherObservation,
        now: DateTime<Utc>,
    ) -> WeatherObservation {
        let temperature = gradual_change(
            current.temperature_celsius,
            target_temperature(profile, now),
            MAX_TEMP_STEP,
        );

        let humidity_now = f64::from(current.humidity_percent);
        let humidity = gradual_change(
            humidity_now,
            humidity_now + self.random.uniform(-2.0, 2.0),
            MAX_HUMIDITY_STEP,
        )
        .clamp(f64::from(HUMIDITY_MIN), f64::from(HUMIDITY_MAX));

        let wind = gradual_change(
            current.wind_speed_kph,
            current.wind_speed_kph + self.random.uniform(-1.0, 1.0),
            MAX_WIND_STEP,
        )
        .max(0.0);

        let pressure_now = f64::from(current.pressure_hpa);
        let pressure = gradual_change(
            pressure_now,
            pressure_now + self.random.uniform(-0.5, 0.5),
            MAX_PRESSURE_STEP,
        )
        .round()
        .clamp(f64::from(PRESSURE_MIN), f64::from(PRESSURE_MAX));

        let condition = self.next_condition(current.condition);

        WeatherObservation {
            city: current.city.clone(),
            timestamp: now,
            temperature_celsius: temperature,
            humidity_percent: to_humidity(humidity),
            wind_speed_kph: wind,
            pressure_hpa: to_pressure(pressure),
            condition,
            predicted: false,
        }
    }

    /// Advance `city` in `store` by one tick and return the new state.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::UnknownCity`] or [`WorldError::Uninitialized`]
    /// if the city has no state to advance.
    pub fn advance(
        &mut self,
        store: &mut WeatherStateStore,
        city: &str,
        now: DateTime<Utc>,
    ) -> Result<WeatherObservation, WorldError> {
        let profile = store.profile(city)?.clone();
        let current = store.get(city)?;
        let next = self.next_observation(&profile, current, now);
        store.replace(city, next.clone())?;
        Ok(next)
    }

    /// Roll for a condition change.
    fn next_condition(&mut self, current: Condition) -> Condition {
        if self.random.unit() >= CONDITION_CHANGE_PROBABILITY {
            return current;
        }
        let successors = self.transitions.successors(current);
        successors
            .get(self.random.index(successors.len()))
            .copied()
            .unwrap_or(current)
    }
}

/// Convert a clamped, rounded humidity to its stored form.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_humidity(value: f64) -> u8 {
    // Clamped to 30..=90 by the caller.
    value.round() as u8
}

/// Convert a clamped, rounded pressure to its stored form.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_pressure(value: f64) -> u16 {
    // Clamped to 980..=1025 by the caller.
    value.round() as u16
}
