//! Case records as written to and read from the store

use crate::types::patient::positivity;
use crate::types::PatientRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const UNKNOWN: &str = "Unknown";

/// A patient case with its predicted risk, ready to be logged
#[derive(Debug, Clone, PartialEq)]
pub struct CaseRecord {
    pub patient: PatientRecord,
    pub risk_score: f64,
    /// Confirmed dengue; live predictions have no outcome yet
    pub outcome: bool,
    pub recorded_at: DateTime<Utc>,
}

impl CaseRecord {
    pub fn new(patient: PatientRecord, risk_score: f64) -> Self {
        Self {
            patient,
            risk_score,
            outcome: false,
            recorded_at: Utc::now(),
        }
    }

    pub fn with_outcome(mut self, outcome: bool) -> Self {
        self.outcome = outcome;
        self
    }

    /// Free-text summary that is embedded for similarity search
    pub fn description(&self) -> String {
        let p = &self.patient;
        format!(
            "Location: {} - {} ({})\n\
             Patient: Age {}, Gender {}\n\
             Lab Results: NS1={}, IgG={}, IgM={}\n\
             Housing: {}\n\
             Risk Score: {:.2}%\n\
             Outcome: {}",
            p.district.as_deref().unwrap_or(UNKNOWN),
            p.area.as_deref().unwrap_or(UNKNOWN),
            p.area_type.as_deref().unwrap_or(UNKNOWN),
            p.age,
            p.gender,
            positivity(p.ns1),
            positivity(p.igg),
            positivity(p.igm),
            p.house_type.as_deref().unwrap_or(UNKNOWN),
            self.risk_score * 100.0,
            if self.outcome { "Dengue" } else { "No Dengue" },
        )
    }

    /// Payload stored alongside the embedding
    pub fn to_stored(&self, id: impl Into<String>) -> StoredCase {
        let p = &self.patient;
        StoredCase {
            id: id.into(),
            district: p.district.clone().unwrap_or_else(|| UNKNOWN.to_string()),
            area: p.area.clone().unwrap_or_else(|| UNKNOWN.to_string()),
            risk_score: self.risk_score,
            outcome: self.outcome,
            age: p.age,
            ns1: p.ns1,
            igm: p.igm,
            timestamp: self.recorded_at.to_rfc3339(),
            description: self.description(),
        }
    }
}

/// Case payload as held by a store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredCase {
    #[serde(default)]
    pub id: String,
    pub district: String,
    pub area: String,
    pub risk_score: f64,
    #[serde(default)]
    pub outcome: bool,
    #[serde(default)]
    pub age: u32,
    #[serde(default)]
    pub ns1: bool,
    #[serde(default)]
    pub igm: bool,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub description: String,
}

/// Search hit with its similarity score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarCase {
    pub score: f32,
    #[serde(flatten)]
    pub case: StoredCase,
}
