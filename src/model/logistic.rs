//! Logistic regression classifier
//!
//! Loads a JSON export of a trained scikit-learn `LogisticRegression`:
//!
//! ```json
//! {
//!   "model_type": "logistic_regression",
//!   "version": "1.0",
//!   "feature_names": ["Gender", "Age", ...],
//!   "coefficients": [[0.12, 0.03, ...]],
//!   "intercept": [-1.7]
//! }
//! ```
//!
//! `coefficients` may also be flat and `intercept` a scalar. `feature_names`
//! must equal the encoder column order exactly.

use super::{Classifier, ModelInfo};
use crate::encoding::{FeatureVector, FEATURE_COLUMNS, FEATURE_COUNT};
use crate::errors::{PredictorError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Coefficients as either `coef_` (1 x n) or a flat list
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
enum Coefficients {
    Flat(Vec<f64>),
    Nested(Vec<Vec<f64>>),
}

/// Intercept as either a scalar or `intercept_` (length 1)
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
enum Intercept {
    Scalar(f64),
    Array(Vec<f64>),
}

/// On-disk model layout
#[derive(Debug, Clone, Deserialize, Serialize)]
struct ModelFile {
    #[serde(default = "default_model_type")]
    model_type: String,
    #[serde(default = "default_version")]
    version: String,
    feature_names: Vec<String>,
    coefficients: Coefficients,
    intercept: Intercept,
}

fn default_model_type() -> String {
    "logistic_regression".to_string()
}

fn default_version() -> String {
    "1.0".to_string()
}

/// Linear model with a sigmoid link
#[derive(Debug, Clone, PartialEq)]
pub struct LogisticRegression {
    coefficients: [f64; FEATURE_COUNT],
    intercept: f64,
    version: String,
}

impl LogisticRegression {
    /// Build from coefficients already in column order
    pub fn new(coefficients: [f64; FEATURE_COUNT], intercept: f64) -> Self {
        Self {
            coefficients,
            intercept,
            version: default_version(),
        }
    }

    /// Load and validate a model export
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            PredictorError::ModelFormat(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&contents)
    }

    /// Parse and validate a model export held in memory
    pub fn from_json(contents: &str) -> Result<Self> {
        let file: ModelFile = serde_json::from_str(contents)
            .map_err(|e| PredictorError::ModelFormat(format!("Failed to parse model: {}", e)))?;

        if !file.model_type.to_lowercase().contains("logistic") {
            return Err(PredictorError::ModelFormat(format!(
                "Unsupported model type: {}",
                file.model_type
            )));
        }

        check_feature_names(&file.feature_names)?;

        let weights = match file.coefficients {
            Coefficients::Flat(weights) => weights,
            Coefficients::Nested(mut rows) if rows.len() == 1 => rows.remove(0),
            Coefficients::Nested(rows) => {
                return Err(PredictorError::ModelFormat(format!(
                    "Expected a single coefficient row for a binary model, found {}",
                    rows.len()
                )))
            }
        };

        let coefficients: [f64; FEATURE_COUNT] = weights.try_into().map_err(|w: Vec<f64>| {
            PredictorError::ModelFormat(format!(
                "Expected {} coefficients, found {}",
                FEATURE_COUNT,
                w.len()
            ))
        })?;

        let intercept = match file.intercept {
            Intercept::Scalar(value) => value,
            Intercept::Array(values) if values.len() == 1 => values[0],
            Intercept::Array(values) => {
                return Err(PredictorError::ModelFormat(format!(
                    "Expected a single intercept, found {}",
                    values.len()
                )))
            }
        };

        if coefficients.iter().any(|w| !w.is_finite()) || !intercept.is_finite() {
            return Err(PredictorError::ModelFormat(
                "Model parameters must be finite".to_string(),
            ));
        }

        Ok(Self {
            coefficients,
            intercept,
            version: file.version,
        })
    }

    /// Serialize back into the export layout
    pub fn to_json(&self) -> Result<String> {
        let file = ModelFile {
            model_type: default_model_type(),
            version: self.version.clone(),
            feature_names: FEATURE_COLUMNS.iter().map(|c| c.to_string()).collect(),
            coefficients: Coefficients::Flat(self.coefficients.to_vec()),
            intercept: Intercept::Scalar(self.intercept),
        };
        Ok(serde_json::to_string_pretty(&file)?)
    }

    /// Linear decision value before the sigmoid
    pub fn decision_function(&self, features: &FeatureVector) -> f64 {
        self.intercept
            + self
                .coefficients
                .iter()
                .zip(features.as_slice())
                .map(|(w, x)| w * x)
                .sum::<f64>()
    }
}

impl Classifier for LogisticRegression {
    fn predict_proba(&self, features: &FeatureVector) -> Result<f64> {
        let z = self.decision_function(features);
        if !z.is_finite() {
            return Err(PredictorError::Generic(format!(
                "Non-finite decision value: {}",
                z
            )));
        }
        Ok(sigmoid(z).clamp(0.0, 1.0))
    }

    fn info(&self) -> ModelInfo {
        ModelInfo {
            model_type: "Logistic Regression".to_string(),
            features: FEATURE_COUNT,
            version: self.version.clone(),
        }
    }
}

/// Numerically stable logistic function
fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

fn check_feature_names(names: &[String]) -> Result<()> {
    for (position, expected) in FEATURE_COLUMNS.iter().enumerate() {
        let found = names.get(position).map(String::as_str).unwrap_or("<missing>");
        if found != *expected {
            return Err(PredictorError::FeatureMismatch {
                position,
                expected: expected.to_string(),
                found: found.to_string(),
            });
        }
    }

    if names.len() > FEATURE_COUNT {
        return Err(PredictorError::FeatureMismatch {
            position: FEATURE_COUNT,
            expected: "<end>".to_string(),
            found: names[FEATURE_COUNT].clone(),
        });
    }

    Ok(())
}
