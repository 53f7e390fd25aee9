//! Injectable randomness for the simulation.
//!
//! Every stochastic input of the simulation goes through [`RandomSource`],
//! so production runs draw from a seedable [`rand`] generator while tests
//! replay an exact script with [`ScriptedSource`].

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A source of the random draws the simulation needs.
pub trait RandomSource: Send {
    /// Uniform float in `low..=high`. Returns `low` for an empty range.
    fn uniform(&mut self, low: f64, high: f64) -> f64;

    /// Uniform integer in `low..=high`. Returns `low` for an empty range.
    fn uniform_int(&mut self, low: i64, high: i64) -> i64;

    /// Uniform float in `[0, 1)`, used for probability rolls.
    fn unit(&mut self) -> f64;

    /// Uniform index in `0..len`. Returns 0 when `len` is 0.
    fn index(&mut self, len: usize) -> usize;
}

/// [`RandomSource`] backed by any [`rand::Rng`].
#[derive(Debug, Clone)]
pub struct RngSource<R> {
    rng: R,
}

impl<R: Rng> RngSource<R> {
    /// Wrap an existing generator.
    pub const fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngSource<StdRng> {
    /// Deterministic source for reproducible runs.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Source seeded from operating-system entropy.
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_os_rng())
    }
}

impl<R: Rng + Send> RandomSource for RngSource<R> {
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        if high <= low {
            return low;
        }
        self.rng.random_range(low..=high)
    }

    fn uniform_int(&mut self, low: i64, high: i64) -> i64 {
        if high <= low {
            return low;
        }
        self.rng.random_range(low..=high)
    }

    fn unit(&mut self) -> f64 {
        self.rng.random::<f64>()
    }

    fn index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.rng.random_range(0..len)
    }
}

/// Replays a fixed script of unit draws.
///
/// Each call to any [`RandomSource`] method consumes one value `u` from the
/// script (`0.0 <= u < 1.0`) and maps it linearly onto the requested range:
///
/// - `uniform(low, high)` = `low + u * (high - low)`
/// - `uniform_int(low, high)` = `low + floor(u * (high - low + 1))`
/// - `unit()` = `u`
/// - `index(len)` = `floor(u * len)`
///
/// Once the script is exhausted every draw returns the fallback value
/// (0.5 unless configured otherwise).
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    script: VecDeque<f64>,
    fallback: f64,
}

impl ScriptedSource {
    /// Create a source that replays `script` then falls back to 0.5.
    pub fn new(script: impl IntoIterator<Item = f64>) -> Self {
        Self {
            script: script.into_iter().collect(),
            fallback: 0.5,
        }
    }

    /// Set the value returned once the script is exhausted.
    #[must_use]
    pub const fn with_fallback(mut self, fallback: f64) -> Self {
        self.fallback = fallback;
        self
    }

    /// Number of scripted draws not yet consumed.
    pub fn remaining(&self) -> usize {
        self.script.len()
    }

    fn next_unit(&mut self) -> f64 {
        self.script
            .pop_front()
            .unwrap_or(self.fallback)
            .clamp(0.0, 1.0 - f64::EPSILON)
    }
}

impl RandomSource for ScriptedSource {
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        let u = self.next_unit();
        if high <= low {
            return low;
        }
        (high - low).mul_add(u, low)
    }

    #[allow(clippy::cast_possible_truncation, clippy::arithmetic_side_effects)]
    fn uniform_int(&mut self, low: i64, high: i64) -> i64 {
        let u = self.next_unit();
        if high <= low {
            return low;
        }
        // Span is small (measurement ranges); the product stays well inside i64.
        let span = high.saturating_sub(low).saturating_add(1) as f64;
        let offset = (u * span).floor() as i64;
        low.saturating_add(offset).min(high)
    }

    fn unit(&mut self) -> f64 {
        self.next_unit()
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn index(&mut self, len: usize) -> usize {
        let u = self.next_unit();
        if len == 0 {
            return 0;
        }
        let idx = (u * len as f64).floor() as usize;
        idx.min(len.saturating_sub(1))
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use rand::rngs::SmallRng;

    use super::*;

    #[test]
    fn scripted_source_maps_units_onto_ranges() {
        let mut source = ScriptedSource::new([0.0, 0.75, 0.5, 0.999, 0.25]);
        assert_eq!(source.uniform(-2.0, 2.0), -2.0);
        assert_eq!(source.uniform(-2.0, 2.0), 1.0);
        assert_eq!(source.uniform_int(30, 90), 60);
        assert_eq!(source.index(3), 2);
        assert_eq!(source.unit(), 0.25);
        assert_eq!(source.remaining(), 0);
    }

    #[test]
    fn scripted_source_falls_back_when_exhausted() {
        let mut source = ScriptedSource::new([]).with_fallback(0.0);
        assert_eq!(source.uniform(10.0, 20.0), 10.0);
        assert_eq!(source.index(8), 0);
    }

    #[test]
    fn rng_source_stays_within_bounds() {
        let mut source = RngSource::new(SmallRng::seed_from_u64(7));
        for _ in 0..1_000 {
            let f = source.uniform(-1.0, 1.0);
            assert!((-1.0..=1.0).contains(&f));
            let i = source.uniform_int(980, 1025);
            assert!((980..=1025).contains(&i));
            assert!(source.index(8) < 8);
            let u = source.unit();
            assert!((0.0..1.0).contains(&u));
        }
    }

    #[test]
    fn degenerate_ranges_return_low() {
        let mut source = RngSource::seeded(1);
        assert_eq!(source.uniform(5.0, 5.0), 5.0);
        assert_eq!(source.uniform_int(3, 3), 3);
        assert_eq!(source.index(0), 0);
    }

    #[test]
    fn seeded_sources_are_reproducible() {
        let mut a = RngSource::seeded(42);
        let mut b = RngSource::seeded(42);
        for _ in 0..100 {
            assert_eq!(a.uniform(0.0, 30.0), b.uniform(0.0, 30.0));
        }
    }
}
