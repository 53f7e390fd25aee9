//! Default city catalogue.
//!
//! Five cities spread across both hemispheres. Each carries its seasonal
//! temperature band, which seeds the initial state and sets the midpoint
//! the simulated temperature is pulled towards.

use skycast_types::CityProfile;

/// The built-in catalogue, in broadcast order.
pub fn default_cities() -> Vec<CityProfile> {
    vec![
        CityProfile::new("New York", 40.7128, -74.0060, 15.0, 30.0),
        CityProfile::new("London", 51.5074, -0.1278, 10.0, 25.0),
        CityProfile::new("Tokyo", 35.6762, 139.6503, 18.0, 32.0),
        CityProfile::new("Paris", 48.8566, 2.3522, 12.0, 28.0),
        CityProfile::new("Sydney", -33.8688, 151.2093, 20.0, 35.0),
    ]
}
