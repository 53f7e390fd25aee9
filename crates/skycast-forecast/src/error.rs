//! Error types for the `skycast-forecast` crate.

use std::path::PathBuf;

/// Errors raised when loading a persisted predictor.
///
/// Callers normally recover from these by falling back to the default
/// model (see [`SampleRegressor::load_or_default`]).
///
/// [`SampleRegressor::load_or_default`]: crate::predictor::SampleRegressor::load_or_default
#[derive(Debug, thiserror::Error)]
pub enum ModelLoadError {
    /// The model file could not be read.
    #[error("failed to read model file {path}: {source}")]
    Io {
        /// The file that was requested.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The model file is not valid model JSON.
    #[error("corrupt model file {path}: {source}")]
    Corrupt {
        /// The file that was parsed.
        path: PathBuf,
        /// The underlying parse error.
        source: serde_json::Error,
    },

    /// The model parsed but its contents are unusable.
    #[error("invalid model in {path}: {reason}")]
    Invalid {
        /// The file that was parsed.
        path: PathBuf,
        /// What is wrong with the model.
        reason: String,
    },
}

/// Errors raised when fitting or saving a predictor.
#[derive(Debug, thiserror::Error)]
pub enum ForecastError {
    /// Training data is empty or inconsistent.
    #[error("cannot fit model: {reason}")]
    Fit {
        /// Why the data was rejected.
        reason: String,
    },

    /// The model could not be serialized.
    #[error("failed to serialize model: {source}")]
    Serialize {
        /// The underlying serialization error.
        #[from]
        source: serde_json::Error,
    },

    /// The model file could not be written.
    #[error("failed to write model file {path}: {source}")]
    Write {
        /// The destination file.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}
