//! Core domain structs: city profiles and live observations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::Condition;
use crate::units::{celsius_to_fahrenheit, kph_to_mph, round_to_tenth};
use crate::wire::{Coordinates, Temperature, WeatherReading, WindSpeed, format_timestamp};

// ---------------------------------------------------------------------------
// CityProfile
// ---------------------------------------------------------------------------

/// Static metadata for one simulated city.
///
/// The set of profiles is fixed at startup and never mutated. The seasonal
/// band drives both the initial temperature draw and the midpoint the
/// simulation pulls towards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CityProfile {
    /// Display name, also used as the city key.
    pub name: String,
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// Lower edge of the seasonal temperature band (°C).
    pub min_seasonal_temp: f64,
    /// Upper edge of the seasonal temperature band (°C).
    pub max_seasonal_temp: f64,
}

impl CityProfile {
    /// Build a profile from its parts.
    pub fn new(
        name: impl Into<String>,
        latitude: f64,
        longitude: f64,
        min_seasonal_temp: f64,
        max_seasonal_temp: f64,
    ) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
            min_seasonal_temp,
            max_seasonal_temp,
        }
    }

    /// Midpoint of the seasonal band.
    pub fn mid_seasonal_temp(&self) -> f64 {
        (self.min_seasonal_temp + self.max_seasonal_temp) / 2.0
    }

    /// Coordinates in their wire shape.
    pub const fn coordinates(&self) -> Coordinates {
        Coordinates {
            lat: self.latitude,
            lon: self.longitude,
        }
    }
}

// ---------------------------------------------------------------------------
// WeatherObservation
// ---------------------------------------------------------------------------

/// The live weather state of one city.
///
/// Temperature and wind speed hold unrounded values so that repeated small
/// steps accumulate; they are rounded only when converted to a
/// [`WeatherReading`]. Humidity and pressure are whole numbers.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherObservation {
    /// Name of the city this observation belongs to.
    pub city: String,
    /// When the observation was produced.
    pub timestamp: DateTime<Utc>,
    /// Air temperature in °C.
    pub temperature_celsius: f64,
    /// Relative humidity, always within 30..=90.
    pub humidity_percent: u8,
    /// Wind speed in km/h, never negative.
    pub wind_speed_kph: f64,
    /// Barometric pressure, always within 980..=1025 hPa.
    pub pressure_hpa: u16,
    /// Sky condition.
    pub condition: Condition,
    /// `true` when this is a forecast rather than an observed state.
    pub predicted: bool,
}

impl WeatherObservation {
    /// Temperature in °F, derived from the unrounded Celsius value.
    pub fn temperature_fahrenheit(&self) -> f64 {
        celsius_to_fahrenheit(self.temperature_celsius)
    }

    /// Wind speed in mph, derived from the unrounded km/h value.
    pub fn wind_speed_mph(&self) -> f64 {
        kph_to_mph(self.wind_speed_kph)
    }

    /// Project into the serialized wire shape.
    ///
    /// `predicted` is emitted only on forecasts.
    pub fn to_reading(&self, coordinates: Coordinates) -> WeatherReading {
        WeatherReading {
            city: self.city.clone(),
            coordinates,
            timestamp: format_timestamp(self.timestamp),
            temperature: Temperature {
                celsius: round_to_tenth(self.temperature_celsius),
                fahrenheit: self.temperature_fahrenheit(),
            },
            humidity: self.humidity_percent,
            wind_speed: WindSpeed {
                kph: round_to_tenth(self.wind_speed_kph),
                mph: self.wind_speed_mph(),
            },
            pressure: self.pressure_hpa,
            condition: self.condition,
            predicted: self.predicted.then_some(true),
        }
    }
}
