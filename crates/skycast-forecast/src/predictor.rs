//! Temperature predictors.
//!
//! Any type implementing [`Predictor`] can drive the forecast, including a
//! plain closure. The built-in [`SampleRegressor`] is a small
//! inverse-distance-weighted regressor over standardized features, fitted
//! to four reference samples. It is persisted as JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};
use skycast_types::Condition;
use tracing::{info, warn};

use crate::error::{ForecastError, ModelLoadError};
use crate::features::{FEATURE_COUNT, FEATURE_NAMES, FeatureVector};

/// Distance below which a query is treated as an exact sample match.
const EXACT_MATCH_DISTANCE: f64 = 1e-12;

/// Anything that maps features to a temperature in °C.
pub trait Predictor: Send + Sync {
    /// Predict the temperature for `features`.
    fn predict(&self, features: &FeatureVector) -> f64;
}

impl<F> Predictor for F
where
    F: Fn(&FeatureVector) -> f64 + Send + Sync,
{
    fn predict(&self, features: &FeatureVector) -> f64 {
        self(features)
    }
}

/// Inverse-distance-weighted regressor over standardized features.
///
/// Features are standardized with the training mean and population
/// standard deviation (a zero deviation is treated as 1). A prediction is
/// the average of the training targets weighted by `1 / d²`, where `d` is
/// the Euclidean distance in standardized space. A query that coincides
/// with a training sample returns that sample's target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleRegressor {
    feature_names: Vec<String>,
    means: [f64; FEATURE_COUNT],
    scales: [f64; FEATURE_COUNT],
    samples: Vec<[f64; FEATURE_COUNT]>,
    targets: Vec<f64>,
}

impl SampleRegressor {
    /// Fit a regressor to `samples` and their `targets`.
    ///
    /// # Errors
    ///
    /// Returns [`ForecastError::Fit`] if there are no samples, the lengths
    /// differ, or any value is not finite.
    pub fn fit(samples: &[FeatureVector], targets: &[f64]) -> Result<Self, ForecastError> {
        if samples.is_empty() {
            return Err(ForecastError::Fit {
                reason: String::from("no training samples"),
            });
        }
        if samples.len() != targets.len() {
            return Err(ForecastError::Fit {
                reason: format!(
                    "{} samples but {} targets",
                    samples.len(),
                    targets.len()
                ),
            });
        }
        let rows: Vec<[f64; FEATURE_COUNT]> = samples.iter().map(FeatureVector::to_array).collect();
        if rows.iter().flatten().chain(targets).any(|v| !v.is_finite()) {
            return Err(ForecastError::Fit {
                reason: String::from("training data contains non-finite values"),
            });
        }
        Ok(Self::fit_rows(&rows, targets.to_vec()))
    }

    /// The reference model fitted to the four built-in samples.
    pub fn reference() -> Self {
        let samples = reference_samples();
        let rows: Vec<[f64; FEATURE_COUNT]> = samples.iter().map(|(f, _)| f.to_array()).collect();
        let targets = samples.iter().map(|(_, t)| *t).collect();
        Self::fit_rows(&rows, targets)
    }

    fn fit_rows(rows: &[[f64; FEATURE_COUNT]], targets: Vec<f64>) -> Self {
        let count = rows.len().max(1) as f64;
        let mut means = [0.0; FEATURE_COUNT];
        let mut scales = [1.0; FEATURE_COUNT];

        for (col, (mean, scale)) in means.iter_mut().zip(scales.iter_mut()).enumerate() {
            let column = || rows.iter().filter_map(move |row| row.get(col).copied());
            *mean = column().sum::<f64>() / count;
            let variance = column().map(|v| (v - *mean).powi(2)).sum::<f64>() / count;
            let deviation = variance.sqrt();
            *scale = if deviation > 0.0 { deviation } else { 1.0 };
        }

        let samples = rows
            .iter()
            .map(|row| standardize(row, &means, &scales))
            .collect();

        Self {
            feature_names: FEATURE_NAMES.iter().map(|n| (*n).to_owned()).collect(),
            means,
            scales,
            samples,
            targets,
        }
    }

    /// Number of training samples.
    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    /// Write the model to `path` as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ForecastError`] if serialization or the write fails.
    pub fn save(&self, path: &Path) -> Result<(), ForecastError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|source| ForecastError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Read a model from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelLoadError`] if the file is missing, unparseable, or
    /// describes an unusable model.
    pub fn load(path: &Path) -> Result<Self, ModelLoadError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ModelLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let model: Self =
            serde_json::from_str(&contents).map_err(|source| ModelLoadError::Corrupt {
                path: path.to_path_buf(),
                source,
            })?;
        model.validate().map_err(|reason| ModelLoadError::Invalid {
            path: path.to_path_buf(),
            reason,
        })?;
        Ok(model)
    }

    /// Read a model from `path`, falling back to [`reference`] on any
    /// failure.
    ///
    /// A failure is logged as a warning and never propagated.
    ///
    /// [`reference`]: Self::reference
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(model) => {
                info!(path = %path.display(), samples = model.sample_count(), "Forecast model loaded");
                model
            }
            Err(e) => {
                warn!(error = %e, "No usable forecast model found, using default initialization");
                Self::reference()
            }
        }
    }

    fn validate(&self) -> Result<(), String> {
        let names_match = self.feature_names.len() == FEATURE_COUNT
            && self
                .feature_names
                .iter()
                .zip(FEATURE_NAMES)
                .all(|(a, b)| a == b);
        if !names_match {
            return Err(format!(
                "feature names {:?} do not match {FEATURE_NAMES:?}",
                self.feature_names
            ));
        }
        if self.samples.is_empty() {
            return Err(String::from("model has no samples"));
        }
        if self.samples.len() != self.targets.len() {
            return Err(format!(
                "{} samples but {} targets",
                self.samples.len(),
                self.targets.len()
            ));
        }
        if self.scales.iter().any(|s| !s.is_finite() || *s <= 0.0) {
            return Err(String::from("feature scales must be finite and positive"));
        }
        let mut values = self
            .means
            .iter()
            .chain(self.samples.iter().flatten())
            .chain(&self.targets);
        if values.any(|v| !v.is_finite()) {
            return Err(String::from("model contains non-finite values"));
        }
        Ok(())
    }
}

impl Default for SampleRegressor {
    fn default() -> Self {
        Self::reference()
    }
}

impl Predictor for SampleRegressor {
    fn predict(&self, features: &FeatureVector) -> f64 {
        let query = standardize(&features.to_array(), &self.means, &self.scales);

        let mut weighted_sum = 0.0;
        let mut weight_total = 0.0;
        for (sample, target) in self.samples.iter().zip(&self.targets) {
            let distance_sq: f64 = sample
                .iter()
                .zip(&query)
                .map(|(a, b)| (a - b).powi(2))
                .sum();
            if distance_sq.sqrt() < EXACT_MATCH_DISTANCE {
                return *target;
            }
            let weight = distance_sq.recip();
            weighted_sum = weight.mul_add(*target, weighted_sum);
            weight_total += weight;
        }

        if weight_total > 0.0 {
            weighted_sum / weight_total
        } else {
            0.0
        }
    }
}

fn standardize(
    row: &[f64; FEATURE_COUNT],
    means: &[f64; FEATURE_COUNT],
    scales: &[f64; FEATURE_COUNT],
) -> [f64; FEATURE_COUNT] {
    let mut out = [0.0; FEATURE_COUNT];
    for (((slot, value), mean), scale) in out.iter_mut().zip(row).zip(means).zip(scales) {
        *slot = (value - mean) / scale;
    }
    out
}

/// The four reference samples and their temperatures.
fn reference_samples() -> [(FeatureVector, f64); 4] {
    [
        (
            FeatureVector::from_parts(12, 1, 1, 0, 60, 10.0, 1013, Condition::Sunny),
            20.0,
        ),
        (
            FeatureVector::from_parts(0, 15, 4, 2, 75, 15.0, 1008, Condition::Cloudy),
            15.0,
        ),
        (
            FeatureVector::from_parts(6, 30, 7, 4, 80, 5.0, 1020, Condition::Rain),
            18.0,
        ),
        (
            FeatureVector::from_parts(18, 7, 10, 6, 65, 20.0, 1015, Condition::Clear),
            22.0,
        ),
    ]
}
