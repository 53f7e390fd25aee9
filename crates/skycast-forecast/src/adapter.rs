//! Forecast wrapper around a [`Predictor`].

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use skycast_types::WeatherObservation;
use skycast_world::gradual_change;
use skycast_world::simulation::MAX_TEMP_STEP;
use tracing::warn;

use crate::features::FeatureVector;
use crate::predictor::Predictor;

/// Default distance into the future of a forecast.
pub const DEFAULT_HORIZON_SECS: i64 = 5;

/// Largest allowed gap between a forecast and the current temperature.
pub const MAX_FORECAST_DEVIATION: f64 = 2.0 * MAX_TEMP_STEP;

/// Turns a current observation into a clamped short-horizon forecast.
#[derive(Clone)]
pub struct ForecastAdapter {
    predictor: Arc<dyn Predictor>,
    horizon: Duration,
}

impl ForecastAdapter {
    /// Wrap `predictor` with the default five-second horizon.
    pub fn new(predictor: Arc<dyn Predictor>) -> Self {
        Self {
            predictor,
            horizon: Duration::seconds(DEFAULT_HORIZON_SECS),
        }
    }

    /// Override the forecast horizon.
    #[must_use]
    pub const fn with_horizon(mut self, horizon: Duration) -> Self {
        self.horizon = horizon;
        self
    }

    /// The configured horizon.
    pub const fn horizon(&self) -> Duration {
        self.horizon
    }

    /// Forecast `observation` as seen at `now`.
    ///
    /// Only the temperature changes; it is clamped to within
    /// [`MAX_FORECAST_DEVIATION`] of the current value. A non-finite raw
    /// prediction yields the current temperature.
    pub fn forecast(
        &self,
        observation: &WeatherObservation,
        now: DateTime<Utc>,
    ) -> WeatherObservation {
        let features = FeatureVector::from_observation(observation, now);
        let raw = self.predictor.predict(&features);
        let current = observation.temperature_celsius;

        let temperature = if raw.is_finite() {
            gradual_change(current, raw, MAX_FORECAST_DEVIATION)
        } else {
            warn!(city = %observation.city, raw, "Predictor returned a non-finite temperature");
            current
        };

        WeatherObservation {
            timestamp: now.checked_add_signed(self.horizon).unwrap_or(now),
            temperature_celsius: temperature,
            predicted: true,
            ..observation.clone()
        }
    }
}

impl std::fmt::Debug for ForecastAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForecastAdapter")
            .field("horizon", &self.horizon)
            .finish_non_exhaustive()
    }
}
