//! Model input features.

use chrono::{DateTime, Datelike, Timelike, Utc};
use serde::{Deserialize, Serialize};
use skycast_types::{Condition, WeatherObservation};

/// Number of features in a [`FeatureVector`].
pub const FEATURE_COUNT: usize = 8;

/// Feature names in column order, as persisted with a model.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "hour",
    "day",
    "month",
    "day_of_week",
    "humidity",
    "wind_speed",
    "pressure",
    "condition_encoded",
];

/// The inputs a predictor sees for one city.
///
/// Calendar features come from the time of the forecast; the rest come
/// from the city's current observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Hour of day, 0-23.
    pub hour: f64,
    /// Day of month, 1-31.
    pub day: f64,
    /// Month, 1-12.
    pub month: f64,
    /// Day of week, Monday = 0.
    pub day_of_week: f64,
    /// Relative humidity in percent.
    pub humidity: f64,
    /// Wind speed in km/h.
    pub wind_speed: f64,
    /// Pressure in hPa.
    pub pressure: f64,
    /// [`Condition::encoded`] of the current condition.
    pub condition_encoded: f64,
}

impl FeatureVector {
    /// Build features for `observation` at `now`.
    pub fn from_observation(observation: &WeatherObservation, now: DateTime<Utc>) -> Self {
        Self {
            hour: f64::from(now.hour()),
            day: f64::from(now.day()),
            month: f64::from(now.month()),
            day_of_week: f64::from(now.weekday().num_days_from_monday()),
            humidity: f64::from(observation.humidity_percent),
            wind_speed: observation.wind_speed_kph,
            pressure: f64::from(observation.pressure_hpa),
            condition_encoded: f64::from(observation.condition.encoded()),
        }
    }

    /// Build features from raw calendar and weather values.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        hour: u32,
        day: u32,
        month: u32,
        day_of_week: u32,
        humidity: u8,
        wind_speed: f64,
        pressure: u16,
        condition: Condition,
    ) -> Self {
        Self {
            hour: f64::from(hour),
            day: f64::from(day),
            month: f64::from(month),
            day_of_week: f64::from(day_of_week),
            humidity: f64::from(humidity),
            wind_speed,
            pressure: f64::from(pressure),
            condition_encoded: f64::from(condition.encoded()),
        }
    }

    /// Features in [`FEATURE_NAMES`] column order.
    pub const fn to_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.hour,
            self.day,
            self.month,
            self.day_of_week,
            self.humidity,
            self.wind_speed,
            self.pressure,
            self.condition_encoded,
        ]
    }
}
