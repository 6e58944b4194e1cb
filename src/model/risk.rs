//! Risk banding
//!
//! Fixed probability thresholds mapping classifier output onto the three
//! public risk bands. Thresholds apply to the unrounded probability.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Probability at or above which a case is HIGH risk
pub const HIGH_RISK_THRESHOLD: f64 = 0.70;

/// Probability at or above which a case is MEDIUM risk
pub const MEDIUM_RISK_THRESHOLD: f64 = 0.40;

/// Distance from 0.5 beyond which confidence is reported as High
const CONFIDENCE_MARGIN: f64 = 0.3;

/// Three-level risk band
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Band for a probability
    pub fn from_probability(probability: f64) -> Self {
        if probability >= HIGH_RISK_THRESHOLD {
            RiskLevel::High
        } else if probability >= MEDIUM_RISK_THRESHOLD {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How far the probability sits from the decision boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confidence {
    High,
    Medium,
}

impl Confidence {
    pub fn from_probability(probability: f64) -> Self {
        if (probability - 0.5).abs() > CONFIDENCE_MARGIN {
            Confidence::High
        } else {
            Confidence::Medium
        }
    }
}

/// Classifier output with its derived labels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub probability: f64,
    pub risk_level: RiskLevel,
    pub confidence: Confidence,
}

impl RiskAssessment {
    pub fn new(probability: f64) -> Self {
        Self {
            probability,
            risk_level: RiskLevel::from_probability(probability),
            confidence: Confidence::from_probability(probability),
        }
    }

    /// Probability rounded to three decimals for display
    pub fn rounded_probability(&self) -> f64 {
        (self.probability * 1000.0).round() / 1000.0
    }
}
