//! Unit conversions and output rounding.
//!
//! Derived units are always computed from the unrounded base value and then
//! rounded to one decimal place, so a reading's Fahrenheit figure never
//! inherits rounding error from its Celsius figure.

/// Kilometres-per-hour to miles-per-hour factor.
pub const KPH_TO_MPH: f64 = 0.621_371;

/// Round to one decimal place.
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Convert Celsius to Fahrenheit, rounded to one decimal.
pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    round_to_tenth(celsius * 9.0 / 5.0 + 32.0)
}

/// Convert km/h to mph, rounded to one decimal.
pub fn kph_to_mph(kph: f64) -> f64 {
    round_to_tenth(kph * KPH_TO_MPH)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn freezing_and_boiling_points() {
        assert!((celsius_to_fahrenheit(0.0) - 32.0).abs() < EPS);
        assert!((celsius_to_fahrenheit(100.0) - 212.0).abs() < EPS);
        assert!((celsius_to_fahrenheit(-40.0) + 40.0).abs() < EPS);
    }

    #[test]
    fn mph_is_rounded_to_one_decimal() {
        // 10 kph = 6.21371 mph
        assert!((kph_to_mph(10.0) - 6.2).abs() < EPS);
        assert!((kph_to_mph(0.0)).abs() < EPS);
    }

    #[test]
    fn rounding_keeps_one_decimal() {
        assert!((round_to_tenth(20.16) - 20.2).abs() < EPS);
        assert!((round_to_tenth(-3.14) + 3.1).abs() < EPS);
    }
}
