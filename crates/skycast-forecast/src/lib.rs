//! Short-horizon temperature forecasts for Skycast.
//!
//! # Modules
//!
//! - [`adapter`] -- [`ForecastAdapter`], which clamps a predictor's output
//!   and stamps the forecast into the future.
//! - [`error`] -- Model loading and fitting errors.
//! - [`features`] -- The eight-column [`FeatureVector`].
//! - [`predictor`] -- The [`Predictor`] trait and the built-in
//!   [`SampleRegressor`].

pub mod adapter;
pub mod error;
pub mod features;
pub mod predictor;

pub use adapter::{ForecastAdapter, MAX_FORECAST_DEVIATION};
pub use error::{ForecastError, ModelLoadError};
pub use features::{FEATURE_COUNT, FEATURE_NAMES, FeatureVector};
pub use predictor::{Predictor, SampleRegressor};
