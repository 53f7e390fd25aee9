//! Per-city live weather state.
//!
//! [`WeatherStateStore`] owns exactly one [`WeatherObservation`] per
//! configured city. State is created once with randomized values and then
//! overwritten in place; no history is kept here.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use skycast_types::{CityProfile, Condition, WeatherObservation};
use tracing::debug;

use crate::error::WorldError;
use crate::random::RandomSource;
use crate::simulation::{
    HUMIDITY_MAX, HUMIDITY_MIN, INITIAL_WIND_MAX_KPH, PRESSURE_MAX, PRESSURE_MIN,
};

/// Owned store of the current observation for every configured city.
#[derive(Debug, Clone)]
pub struct WeatherStateStore {
    /// City profiles in configured (broadcast) order.
    profiles: Vec<CityProfile>,
    /// Current state keyed by city name.
    states: BTreeMap<String, WeatherObservation>,
}

impl WeatherStateStore {
    /// Create an empty store for the given catalogue.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::DuplicateCity`] if a name appears twice and
    /// [`WorldError::InvalidBand`] if a seasonal band is inverted or not
    /// finite.
    pub fn new(profiles: Vec<CityProfile>) -> Result<Self, WorldError> {
        let mut seen = std::collections::BTreeSet::new();
        for profile in &profiles {
            if !seen.insert(profile.name.as_str()) {
                return Err(WorldError::DuplicateCity(profile.name.clone()));
            }
            let min = profile.min_seasonal_temp;
            let max = profile.max_seasonal_temp;
            if !min.is_finite() || !max.is_finite() || min > max {
                return Err(WorldError::InvalidBand {
                    city: profile.name.clone(),
                    min,
                    max,
                });
            }
        }

        Ok(Self {
            profiles,
            states: BTreeMap::new(),
        })
    }

    /// Create a randomized observation for every city that has none.
    ///
    /// Idempotent: existing state is never overwritten. Returns the number
    /// of cities that were initialized by this call.
    pub fn initialize(&mut self, random: &mut dyn RandomSource, now: DateTime<Utc>) -> usize {
        let mut created: usize = 0;
        for profile in &self.profiles {
            if self.states.contains_key(&profile.name) {
                continue;
            }
            let observation = initial_observation(profile, random, now);
            debug!(
                city = %profile.name,
                temperature = observation.temperature_celsius,
                condition = %observation.condition,
                "Initialized city weather"
            );
            self.states.insert(profile.name.clone(), observation);
            created = created.saturating_add(1);
        }
        created
    }

    /// Current observation for `city`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::UnknownCity`] if the city is not configured,
    /// or [`WorldError::Uninitialized`] if it has no state yet.
    pub fn get(&self, city: &str) -> Result<&WeatherObservation, WorldError> {
        self.profile(city)?;
        self.states
            .get(city)
            .ok_or_else(|| WorldError::Uninitialized(city.to_owned()))
    }

    /// Swap in a new observation for `city`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::UnknownCity`] if the city is not configured or
    /// has never been initialized, or [`WorldError::CityMismatch`] if the
    /// observation names another city.
    pub fn replace(
        &mut self,
        city: &str,
        observation: WeatherObservation,
    ) -> Result<(), WorldError> {
        if !self.states.contains_key(city) {
            return Err(WorldError::UnknownCity(city.to_owned()));
        }
        if observation.city != city {
            return Err(WorldError::CityMismatch {
                city: city.to_owned(),
                observed: observation.city,
            });
        }
        self.states.insert(city.to_owned(), observation);
        Ok(())
    }

    /// Set a configured city's state directly, initialized or not.
    ///
    /// Used to start a city from known values instead of a random draw.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::UnknownCity`] if the observation's city is not
    /// configured.
    pub fn seed(&mut self, observation: WeatherObservation) -> Result<(), WorldError> {
        self.profile(&observation.city)?;
        self.states.insert(observation.city.clone(), observation);
        Ok(())
    }

    /// Profile for `city`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::UnknownCity`] if the city is not configured.
    pub fn profile(&self, city: &str) -> Result<&CityProfile, WorldError> {
        self.profiles
            .iter()
            .find(|p| p.name == city)
            .ok_or_else(|| WorldError::UnknownCity(city.to_owned()))
    }

    /// All profiles in configured order.
    pub fn profiles(&self) -> &[CityProfile] {
        &self.profiles
    }

    /// Current observations in configured order, skipping uninitialized
    /// cities.
    pub fn observations(&self) -> impl Iterator<Item = &WeatherObservation> {
        self.profiles
            .iter()
            .filter_map(|p| self.states.get(&p.name))
    }

    /// Number of cities with live state.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Whether no city has been initialized.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

/// Draw a fresh observation for `profile`.
///
/// Draw order: temperature, humidity, wind, pressure, condition.
fn initial_observation(
    profile: &CityProfile,
    random: &mut dyn RandomSource,
    now: DateTime<Utc>,
) -> WeatherObservation {
    let temperature =
        random.uniform(profile.min_seasonal_temp, profile.max_seasonal_temp);
    let humidity = random.uniform_int(i64::from(HUMIDITY_MIN), i64::from(HUMIDITY_MAX));
    let wind = random.uniform(0.0, INITIAL_WIND_MAX_KPH);
    let pressure = random.uniform_int(i64::from(PRESSURE_MIN), i64::from(PRESSURE_MAX));
    let condition = Condition::ALL
        .get(random.index(Condition::ALL.len()))
        .copied()
        .unwrap_or(Condition::Clear);

    WeatherObservation {
        city: profile.name.clone(),
        timestamp: now,
        temperature_celsius: temperature,
        humidity_percent: u8::try_from(humidity)
            .unwrap_or(HUMIDITY_MIN)
            .clamp(HUMIDITY_MIN, HUMIDITY_MAX),
        wind_speed_kph: wind,
        pressure_hpa: u16::try_from(pressure)
            .unwrap_or(PRESSURE_MIN)
            .clamp(PRESSURE_MIN, PRESSURE_MAX),
        condition,
        predicted: false,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::cities::default_cities;
    use crate::random::{RngSource, ScriptedSource};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn initialize_creates_one_state_per_city() {
        let mut store = WeatherStateStore::new(default_cities()).unwrap();
        let mut random = RngSource::seeded(3);
        assert_eq!(store.initialize(&mut random, now()), 5);
        assert_eq!(store.len(), 5);

        let names: Vec<&str> = store.observations().map(|o| o.city.as_str()).collect();
        assert_eq!(names, ["New York", "London", "Tokyo", "Paris", "Sydney"]);
    }

    #[test]
    fn initialize_is_idempotent() {
        let mut store = WeatherStateStore::new(default_cities()).unwrap();
        let mut random = RngSource::seeded(3);
        store.initialize(&mut random, now());
        let before = store.get("Tokyo").unwrap().clone();

        assert_eq!(store.initialize(&mut random, now()), 0);
        assert_eq!(store.get("Tokyo").unwrap(), &before);
    }

    #[test]
    fn initial_values_respect_ranges() {
        for seed in 0..50 {
            let mut store = WeatherStateStore::new(default_cities()).unwrap();
            store.initialize(&mut RngSource::seeded(seed), now());
            for (obs, profile) in store.observations().zip(default_cities()) {
                assert!(obs.temperature_celsius >= profile.min_seasonal_temp);
                assert!(obs.temperature_celsius <= profile.max_seasonal_temp);
                assert!((HUMIDITY_MIN..=HUMIDITY_MAX).contains(&obs.humidity_percent));
                assert!((0.0..=INITIAL_WIND_MAX_KPH).contains(&obs.wind_speed_kph));
                assert!((PRESSURE_MIN..=PRESSURE_MAX).contains(&obs.pressure_hpa));
                assert!(!obs.predicted);
            }
        }
    }

    #[test]
    fn scripted_initialization_is_exact() {
        let london = CityProfile::new("London", 51.5074, -0.1278, 10.0, 25.0);
        let mut store = WeatherStateStore::new(vec![london]).unwrap();
        let mut random = ScriptedSource::new([0.5, 0.0, 0.5, 0.999, 0.3]);
        store.initialize(&mut random, now());

        let obs = store.get("London").unwrap();
        assert_eq!(obs.temperature_celsius, 17.5);
        assert_eq!(obs.humidity_percent, 30);
        assert_eq!(obs.wind_speed_kph, 15.0);
        assert_eq!(obs.pressure_hpa, 1025);
        // floor(0.3 * 8) = 2 -> Cloudy
        assert_eq!(obs.condition, Condition::Cloudy);
        assert_eq!(obs.timestamp, now());
    }

    #[test]
    fn unknown_city_is_rejected() {
        let mut store = WeatherStateStore::new(default_cities()).unwrap();
        store.initialize(&mut RngSource::seeded(1), now());

        assert!(matches!(store.get("Atlantis"), Err(WorldError::UnknownCity(_))));

        let mut obs = store.get("Paris").unwrap().clone();
        obs.city = String::from("Atlantis");
        assert!(matches!(
            store.replace("Atlantis", obs),
            Err(WorldError::UnknownCity(_))
        ));
    }

    #[test]
    fn replace_rejects_mismatched_city() {
        let mut store = WeatherStateStore::new(default_cities()).unwrap();
        store.initialize(&mut RngSource::seeded(1), now());
        let paris = store.get("Paris").unwrap().clone();
        assert!(matches!(
            store.replace("London", paris),
            Err(WorldError::CityMismatch { .. })
        ));
    }

    #[test]
    fn replace_swaps_state_in_place() {
        let mut store = WeatherStateStore::new(default_cities()).unwrap();
        store.initialize(&mut RngSource::seeded(1), now());
        let mut next = store.get("Sydney").unwrap().clone();
        next.humidity_percent = 42;
        store.replace("Sydney", next).unwrap();
        assert_eq!(store.get("Sydney").unwrap().humidity_percent, 42);
        assert_eq!(store.len(), 5);
    }

    #[test]
    fn configured_but_uninitialized_city_reports_uninitialized() {
        let store = WeatherStateStore::new(default_cities()).unwrap();
        assert!(matches!(store.get("London"), Err(WorldError::Uninitialized(_))));
    }

    #[test]
    fn replace_requires_initialized_city() {
        let mut store = WeatherStateStore::new(default_cities()).unwrap();
        let mut donor = WeatherStateStore::new(default_cities()).unwrap();
        donor.initialize(&mut RngSource::seeded(8), now());
        let london = donor.get("London").unwrap().clone();

        assert!(matches!(
            store.replace("London", london.clone()),
            Err(WorldError::UnknownCity(_))
        ));

        store.seed(london.clone()).unwrap();
        assert_eq!(store.get("London").unwrap(), &london);
        // Seeded cities are skipped by initialization.
        assert_eq!(store.initialize(&mut RngSource::seeded(8), now()), 4);
        assert_eq!(store.get("London").unwrap(), &london);

        let mut stranger = london;
        stranger.city = String::from("Atlantis");
        assert!(matches!(store.seed(stranger), Err(WorldError::UnknownCity(_))));
    }

    #[test]
    fn duplicate_and_inverted_profiles_are_rejected() {
        let mut cities = default_cities();
        cities.push(CityProfile::new("Paris", 0.0, 0.0, 1.0, 2.0));
        assert!(matches!(
            WeatherStateStore::new(cities),
            Err(WorldError::DuplicateCity(_))
        ));

        let inverted = vec![CityProfile::new("Nowhere", 0.0, 0.0, 30.0, 10.0)];
        assert!(matches!(
            WeatherStateStore::new(inverted),
            Err(WorldError::InvalidBand { .. })
        ));
    }
}
