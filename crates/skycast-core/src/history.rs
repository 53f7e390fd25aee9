//! Bounded audit trail of recent observations.

use std::collections::VecDeque;

use skycast_types::WeatherObservation;

/// Default number of retained observations.
pub const DEFAULT_HISTORY_CAPACITY: usize = 1_000;

/// FIFO of the most recent observations across all cities.
///
/// When full, the oldest entry is evicted. Nothing in the simulation
/// reads from here; it only backs the history endpoint.
#[derive(Debug, Clone)]
pub struct ObservationHistory {
    capacity: usize,
    entries: VecDeque<WeatherObservation>,
}

impl ObservationHistory {
    /// An empty history holding at most `capacity` entries (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    /// Append `observation`, evicting the oldest entry if full.
    pub fn push(&mut self, observation: WeatherObservation) {
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(observation);
    }

    /// Up to `limit` most recent entries, oldest first, optionally
    /// restricted to one city.
    pub fn recent(&self, city: Option<&str>, limit: usize) -> Vec<WeatherObservation> {
        let mut newest_first: Vec<WeatherObservation> = self
            .entries
            .iter()
            .rev()
            .filter(|o| city.is_none_or(|c| o.city == c))
            .take(limit)
            .cloned()
            .collect();
        newest_first.reverse();
        newest_first
    }

    /// Number of retained entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of entries.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for ObservationHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}
