//! Serialized message shapes pushed to subscribers.
//!
//! These are the JSON documents clients consume. Measurements are already
//! rounded for display; timestamps are UTC strings in
//! [`TIMESTAMP_FORMAT`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::Condition;

/// `strftime` pattern for every timestamp on the wire.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format an instant as a wire timestamp (`YYYY-MM-DD HH:MM:SS`, UTC).
pub fn format_timestamp(instant: DateTime<Utc>) -> String {
    instant.format(TIMESTAMP_FORMAT).to_string()
}

/// Geographic position of a city.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Coordinates {
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Longitude in decimal degrees.
    pub lon: f64,
}

/// Temperature in both unit systems.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Temperature {
    /// Degrees Celsius, one decimal.
    pub celsius: f64,
    /// Degrees Fahrenheit, one decimal.
    pub fahrenheit: f64,
}

/// Wind speed in both unit systems.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct WindSpeed {
    /// Kilometres per hour, one decimal.
    pub kph: f64,
    /// Miles per hour, one decimal.
    pub mph: f64,
}

/// One city's observation or forecast as sent to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct WeatherReading {
    /// City name.
    pub city: String,
    /// City position.
    pub coordinates: Coordinates,
    /// Observation (or forecast target) time.
    pub timestamp: String,
    /// Air temperature.
    pub temperature: Temperature,
    /// Relative humidity in percent.
    pub humidity: u8,
    /// Wind speed.
    pub wind_speed: WindSpeed,
    /// Barometric pressure in hPa.
    pub pressure: u16,
    /// Sky condition.
    pub condition: Condition,
    /// Present and `true` only on forecasts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub predicted: Option<bool>,
}

/// The message broadcast to every subscriber once per tick.
///
/// `predictions` lists the same cities as `current_weather`, in the same
/// order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct WeatherBroadcast {
    /// When the tick ran.
    pub timestamp: String,
    /// Observed state of every city.
    pub current_weather: Vec<WeatherReading>,
    /// Short-horizon forecast for every city.
    pub predictions: Vec<WeatherReading>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn timestamp_uses_space_separated_utc_format() {
        let instant = Utc
            .with_ymd_and_hms(2025, 1, 9, 7, 4, 3)
            .unwrap();
        assert_eq!(format_timestamp(instant), "2025-01-09 07:04:03");
    }

    #[test]
    fn broadcast_parses_from_client_json() {
        let json = r#"{
            "timestamp": "2025-01-09 07:04:03",
            "current_weather": [{
                "city": "Tokyo",
                "coordinates": {"lat": 35.6762, "lon": 139.6503},
                "timestamp": "2025-01-09 07:04:03",
                "temperature": {"celsius": 21.4, "fahrenheit": 70.5},
                "humidity": 61,
                "wind_speed": {"kph": 7.5, "mph": 4.7},
                "pressure": 1012,
                "condition": "Partly Cloudy"
            }],
            "predictions": []
        }"#;

        let broadcast: WeatherBroadcast = serde_json::from_str(json).unwrap();
        assert_eq!(broadcast.current_weather.len(), 1);
        assert_eq!(
            broadcast.current_weather.first().map(|r| r.condition),
            Some(Condition::PartlyCloudy)
        );
        assert_eq!(broadcast.current_weather.first().and_then(|r| r.predicted), None);
    }
}
