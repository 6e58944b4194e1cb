//! Batch loading of historical cases
//!
//! Input is a JSON array of objects using the `/predict` field names plus an
//! optional `Outcome` (0/1). Each row is scored with the loaded classifier
//! before it is stored.

use super::record::CaseRecord;
use super::CaseStore;
use crate::encoding::encode;
use crate::errors::{PredictorError, Result};
use crate::model::Classifier;
use crate::types::{BinaryInput, PredictRequest};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

/// Rows between progress log lines
pub const PROGRESS_INTERVAL: usize = 100;

/// One row of a historical dataset
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoricalCase {
    #[serde(flatten)]
    pub request: PredictRequest,
    #[serde(rename = "Outcome", default)]
    pub outcome: Option<BinaryInput>,
}

/// Outcome of a batch load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub total: usize,
    pub stored: usize,
    pub skipped: usize,
}

/// Read a JSON array of historical cases
pub fn load_cases(path: impl AsRef<Path>) -> Result<Vec<HistoricalCase>> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| {
        PredictorError::InvalidRequest(format!("{}: {}", path.display(), e))
    })
}

/// Score and store every valid row. Invalid rows are skipped; a store
/// failure aborts the batch.
pub async fn ingest_cases(
    store: &dyn CaseStore,
    classifier: &dyn Classifier,
    cases: Vec<HistoricalCase>,
) -> Result<IngestReport> {
    let mut report = IngestReport {
        total: cases.len(),
        ..IngestReport::default()
    };
    info!(total = report.total, backend = store.backend(), "Loading cases into vector store");

    for (index, case) in cases.into_iter().enumerate() {
        match score(classifier, case) {
            Ok(record) => {
                store.add_case(&record).await?;
                report.stored += 1;
            }
            Err(e) => {
                warn!(row = index, error = %e, "Skipping case");
                report.skipped += 1;
            }
        }

        if (index + 1) % PROGRESS_INTERVAL == 0 {
            info!(processed = index + 1, total = report.total, "Ingest progress");
        }
    }

    info!(stored = report.stored, skipped = report.skipped, "Vector store populated");
    Ok(report)
}

fn score(classifier: &dyn Classifier, case: HistoricalCase) -> Result<CaseRecord> {
    let outcome = case
        .outcome
        .map(|value| value.to_flag("Outcome"))
        .transpose()?
        .unwrap_or(false);
    let patient = case.request.into_record()?;
    let probability = classifier.predict_proba(&encode(&patient))?;
    Ok(CaseRecord::new(patient, probability).with_outcome(outcome))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cases::InMemoryCaseStore;
    use crate::encoding::FeatureVector;
    use crate::model::ModelInfo;
    use serde_json::json;

    struct FixedClassifier(f64);

    impl Classifier for FixedClassifier {
        fn predict_proba(&self, _features: &FeatureVector) -> Result<f64> {
            Ok(self.0)
        }

        fn info(&self) -> ModelInfo {
            ModelInfo {
                model_type: "fixed".to_string(),
                features: 0,
                version: "0".to_string(),
            }
        }
    }

    fn row(area: &str, outcome: u8) -> serde_json::Value {
        json!({
            "Age": 25, "Gender": 1, "NS1": 1, "IgG": 0, "IgM": 0,
            "Area": area, "District": "Dhaka", "AreaType": "Developed",
            "HouseType": "Building", "Outcome": outcome
        })
    }

    #[tokio::test]
    async fn test_ingest_skips_invalid_rows() {
        let rows: Vec<HistoricalCase> = serde_json::from_value(json!([
            row("Mirpur", 1),
            {"Age": 30},
            row("Badda", 0),
        ]))
        .unwrap();

        let store = InMemoryCaseStore::default();
        let report = ingest_cases(&store, &FixedClassifier(0.8), rows).await.unwrap();

        assert_eq!(report, IngestReport { total: 3, stored: 2, skipped: 1 });
        let stats = store.area_statistics("Dhaka", "Mirpur").await.unwrap().unwrap();
        assert_eq!(stats.positive_cases, 1);
        assert!((stats.avg_risk_score - 0.8).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_invalid_outcome_is_skipped() {
        let rows: Vec<HistoricalCase> = serde_json::from_value(json!([row("Mirpur", 2)])).unwrap();
        let store = InMemoryCaseStore::default();
        let report = ingest_cases(&store, &FixedClassifier(0.5), rows).await.unwrap();
        assert_eq!(report.skipped, 1);
    }

    #[test]
    fn test_load_cases_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cases.json");
        std::fs::write(&path, json!([row("Mirpur", 0)]).to_string()).unwrap();

        let cases = load_cases(&path).unwrap();
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].request.area.as_deref(), Some("Mirpur"));

        std::fs::write(&path, "{not json").unwrap();
        assert!(load_cases(&path).is_err());
    }
}
