//! Enumeration types for the Skycast service.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Sky condition
// ---------------------------------------------------------------------------

/// Discrete sky state reported alongside each observation.
///
/// Conditions evolve as a per-city Markov chain (see
/// `skycast_world::transitions`). Serialized with the human-readable names
/// clients display directly, e.g. `"Partly Cloudy"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum Condition {
    /// Bright sun, few or no clouds.
    Sunny,
    /// Sun with scattered cloud.
    #[serde(rename = "Partly Cloudy")]
    PartlyCloudy,
    /// Mostly cloud cover.
    Cloudy,
    /// Steady rain.
    Rain,
    /// Rain with thunder and lightning.
    Thunderstorm,
    /// Clear sky.
    Clear,
    /// Full, heavy cloud cover.
    Overcast,
    /// Drizzle or light showers.
    #[serde(rename = "Light Rain")]
    LightRain,
}

impl Condition {
    /// Every condition, in canonical order.
    pub const ALL: [Self; 8] = [
        Self::Sunny,
        Self::PartlyCloudy,
        Self::Cloudy,
        Self::Rain,
        Self::Thunderstorm,
        Self::Clear,
        Self::Overcast,
        Self::LightRain,
    ];

    /// Display name, identical to the serialized form.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Sunny => "Sunny",
            Self::PartlyCloudy => "Partly Cloudy",
            Self::Cloudy => "Cloudy",
            Self::Rain => "Rain",
            Self::Thunderstorm => "Thunderstorm",
            Self::Clear => "Clear",
            Self::Overcast => "Overcast",
            Self::LightRain => "Light Rain",
        }
    }

    /// Numeric encoding used as a model feature.
    ///
    /// The code is the condition's position when all labels are sorted
    /// alphabetically, so `Clear` is 0 and `Thunderstorm` is 7.
    pub const fn encoded(self) -> u8 {
        match self {
            Self::Clear => 0,
            Self::Cloudy => 1,
            Self::LightRain => 2,
            Self::Overcast => 3,
            Self::PartlyCloudy => 4,
            Self::Rain => 5,
            Self::Sunny => 6,
            Self::Thunderstorm => 7,
        }
    }
}

impl core::fmt::Display for Condition {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Scheduler state
// ---------------------------------------------------------------------------

/// Lifecycle state of the broadcast loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum SchedulerState {
    /// No loop is running; waiting for a subscriber.
    Idle,
    /// The loop is ticking and broadcasting.
    Running,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip_through_serde() {
        for condition in Condition::ALL {
            let json = serde_json::to_string(&condition).unwrap();
            assert_eq!(json, format!("\"{}\"", condition.label()));
        }
    }

    #[test]
    fn encoding_follows_alphabetical_label_order() {
        let mut labels: Vec<&str> = Condition::ALL.iter().map(|c| c.label()).collect();
        labels.sort_unstable();
        for condition in Condition::ALL {
            let position = labels.iter().position(|l| *l == condition.label());
            assert_eq!(position, Some(usize::from(condition.encoded())));
        }
    }
}
