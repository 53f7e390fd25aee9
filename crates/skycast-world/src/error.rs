//! Error types for the `skycast-world` crate.
//!
//! All fallible operations in this crate return [`WorldError`].

/// Errors that can occur while managing per-city weather state.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// The city is not part of the configured catalogue.
    #[error("unknown city: {0}")]
    UnknownCity(String),

    /// The city is configured but its state has not been initialized.
    #[error("city {0} has no weather state yet")]
    Uninitialized(String),

    /// The same city name was configured twice.
    #[error("duplicate city: {0}")]
    DuplicateCity(String),

    /// A city's seasonal band is inverted or not finite.
    #[error("invalid seasonal band for {city}: {min} .. {max}")]
    InvalidBand {
        /// The misconfigured city.
        city: String,
        /// Configured lower edge.
        min: f64,
        /// Configured upper edge.
        max: f64,
    },

    /// An observation was stored under a different city's key.
    #[error("observation for {observed} cannot replace state of {city}")]
    CityMismatch {
        /// The key being replaced.
        city: String,
        /// The city named inside the observation.
        observed: String,
    },
}
