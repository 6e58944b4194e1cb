//! Risk classification module
//!
//! The classifier is an external artifact: a logistic regression trained
//! offline and exported to JSON. This module loads it, applies it to encoded
//! feature vectors, and turns probabilities into risk bands and advice.

pub mod logistic;
pub mod recommendation;
pub mod risk;

use crate::encoding::FeatureVector;
use crate::errors::Result;
use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use logistic::LogisticRegression;
pub use recommendation::recommendation;
pub use risk::{Confidence, RiskAssessment, RiskLevel, HIGH_RISK_THRESHOLD, MEDIUM_RISK_THRESHOLD};

/// Model metadata reported by `/stats`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub model_type: String,
    pub features: usize,
    pub version: String,
}

/// Binary classifier over the fixed feature layout
///
/// Implementations must be side-effect free on inference; one instance is
/// shared across all request handlers.
pub trait Classifier: Send + Sync {
    /// Probability of the positive (dengue) class, in [0, 1]
    fn predict_proba(&self, features: &FeatureVector) -> Result<f64>;

    /// Descriptive metadata
    fn info(&self) -> ModelInfo;
}
