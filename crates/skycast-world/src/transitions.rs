//! Condition transition table for the sky-state Markov chain.
//!
//! Each tick a city keeps its condition with high probability. When the
//! low-probability change event fires, the next condition is drawn
//! uniformly from the current condition's successors in this table:
//!
//! | From | Successors |
//! |------|------------|
//! | Sunny | Partly Cloudy, Clear |
//! | Partly Cloudy | Sunny, Cloudy, Clear |
//! | Cloudy | Partly Cloudy, Overcast, Light Rain |
//! | Light Rain | Cloudy, Rain, Overcast |
//! | Rain | Light Rain, Thunderstorm, Overcast |
//! | Thunderstorm | Rain, Overcast |
//! | Clear | Partly Cloudy, Sunny |
//! | Overcast | Cloudy, Light Rain |
//!
//! A condition with no entry may move to any of the eight conditions.

use std::collections::BTreeMap;

use skycast_types::Condition;

/// Fallback successors for conditions without an entry.
static ALL_CONDITIONS: [Condition; 8] = Condition::ALL;

/// Mapping from a condition to the conditions it may change into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionTransitionTable {
    successors: BTreeMap<Condition, Vec<Condition>>,
}

impl ConditionTransitionTable {
    /// A table with no entries; every condition falls back to all eight.
    pub const fn empty() -> Self {
        Self {
            successors: BTreeMap::new(),
        }
    }

    /// The standard table shown in the module docs.
    pub fn standard() -> Self {
        use Condition::{
            Clear, Cloudy, LightRain, Overcast, PartlyCloudy, Rain, Sunny, Thunderstorm,
        };

        let mut table = Self::empty();
        table.insert(Sunny, &[PartlyCloudy, Clear]);
        table.insert(PartlyCloudy, &[Sunny, Cloudy, Clear]);
        table.insert(Cloudy, &[PartlyCloudy, Overcast, LightRain]);
        table.insert(LightRain, &[Cloudy, Rain, Overcast]);
        table.insert(Rain, &[LightRain, Thunderstorm, Overcast]);
        table.insert(Thunderstorm, &[Rain, Overcast]);
        table.insert(Clear, &[PartlyCloudy, Sunny]);
        table.insert(Overcast, &[Cloudy, LightRain]);
        table
    }

    /// Set the successors of `from`, replacing any previous entry.
    ///
    /// An empty successor list removes the entry so `from` falls back to
    /// all conditions.
    pub fn insert(&mut self, from: Condition, to: &[Condition]) {
        if to.is_empty() {
            self.successors.remove(&from);
        } else {
            self.successors.insert(from, to.to_vec());
        }
    }

    /// Successors of `from`, or every condition if `from` has no entry.
    pub fn successors(&self, from: Condition) -> &[Condition] {
        self.successors
            .get(&from)
            .map_or(ALL_CONDITIONS.as_slice(), Vec::as_slice)
    }

    /// Whether `from` has an explicit entry.
    pub fn has_entry(&self, from: Condition) -> bool {
        self.successors.contains_key(&from)
    }
}

impl Default for ConditionTransitionTable {
    fn default() -> Self {
        Self::standard()
    }
}
