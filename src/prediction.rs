//! Prediction service
//!
//! Validates a request, encodes it, runs the classifier and assembles the
//! public response. Case logging is fire-and-forget.

use crate::cases::{CaseRecord, CaseStore};
use crate::encoding::{encode, unmatched_attributes};
use crate::errors::{PredictorError, Result};
use crate::model::{recommendation, Classifier, Confidence, ModelInfo, RiskAssessment, RiskLevel};
use crate::types::{PatientRecord, PredictRequest};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Response of `POST /predict`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    pub probability: f64,
    pub risk_level: RiskLevel,
    pub confidence: Confidence,
    pub recommendation: String,
    pub key_factors: BTreeMap<String, Value>,
}

#[derive(Clone)]
pub struct PredictionService {
    classifier: Option<Arc<dyn Classifier>>,
    case_store: Option<Arc<dyn CaseStore>>,
}

impl PredictionService {
    pub fn new(
        classifier: Option<Arc<dyn Classifier>>,
        case_store: Option<Arc<dyn CaseStore>>,
    ) -> Self {
        Self {
            classifier,
            case_store,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.classifier.is_some()
    }

    pub fn model_info(&self) -> Option<ModelInfo> {
        self.classifier.as_ref().map(|c| c.info())
    }

    /// Validate and score a wire request
    pub async fn predict(&self, request: PredictRequest) -> Result<PredictResponse> {
        let record = request.into_record()?;
        let classifier = self
            .classifier
            .as_ref()
            .ok_or(PredictorError::ModelNotLoaded)?;

        let response = assess(classifier.as_ref(), &record)?;

        if let Some(store) = &self.case_store {
            log_case(store.clone(), CaseRecord::new(record, response.probability));
        }

        Ok(response)
    }
}

/// Score a validated record without side effects
pub fn assess(classifier: &dyn Classifier, record: &PatientRecord) -> Result<PredictResponse> {
    let unmatched = unmatched_attributes(record);
    if !unmatched.is_empty() {
        warn!(attributes = ?unmatched, "Unknown categorical values encoded as all zeros");
    }

    let features = encode(record);
    let probability = classifier.predict_proba(&features)?;
    let assessment = RiskAssessment::new(probability);
    debug!(probability, risk_level = %assessment.risk_level, "Prediction complete");

    let area = record.area.as_deref().unwrap_or("your area");

    Ok(PredictResponse {
        probability: assessment.rounded_probability(),
        risk_level: assessment.risk_level,
        confidence: assessment.confidence,
        recommendation: recommendation(assessment.risk_level, probability, area),
        key_factors: key_factors(record, assessment.risk_level),
    })
}

fn key_factors(record: &PatientRecord, level: RiskLevel) -> BTreeMap<String, Value> {
    let mut factors = BTreeMap::new();
    factors.insert("Age".to_string(), Value::from(record.age));
    factors.insert("Location".to_string(), Value::from(record.location()));
    factors.insert("Test_Results".to_string(), Value::from(record.test_results()));

    if record.ns1 {
        factors.insert(
            "NS1_Status".to_string(),
            Value::from("Positive (strong indicator)"),
        );
    }
    if record.igm {
        factors.insert(
            "IgM_Status".to_string(),
            Value::from("Positive (recent infection)"),
        );
    }
    if level == RiskLevel::High {
        factors.insert(
            "Area_Risk".to_string(),
            Value::from(format!(
                "{} in {} shows elevated risk",
                record.area.as_deref().unwrap_or("Unknown"),
                record.district.as_deref().unwrap_or("Unknown")
            )),
        );
    }

    factors
}

/// Store the case on a detached task; failures only log
fn log_case(store: Arc<dyn CaseStore>, record: CaseRecord) {
    tokio::spawn(async move {
        match store.add_case(&record).await {
            Ok(id) => debug!(id = %id, "Case logged"),
            Err(e) => warn!(error = %e, backend = store.backend(), "Failed to log case"),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cases::InMemoryCaseStore;
    use crate::encoding::FeatureVector;
    use crate::types::BinaryInput;

    struct FixedClassifier(f64);

    impl Classifier for FixedClassifier {
        fn predict_proba(&self, _features: &FeatureVector) -> Result<f64> {
            Ok(self.0)
        }

        fn info(&self) -> ModelInfo {
            ModelInfo {
                model_type: "fixed".to_string(),
                features: 47,
                version: "test".to_string(),
            }
        }
    }

    fn request() -> PredictRequest {
        PredictRequest {
            age: Some(34u32.into()),
            gender: Some(BinaryInput::Int(1)),
            ns1: Some(BinaryInput::Int(1)),
            igg: Some(BinaryInput::Int(0)),
            igm: Some(BinaryInput::Int(0)),
            area: Some("Mirpur".to_string()),
            district: Some("Dhaka".to_string()),
            area_type: Some("Developed".to_string()),
            house_type: Some("Building".to_string()),
        }
    }

    #[tokio::test]
    async fn test_high_risk_response() {
        let service = PredictionService::new(Some(Arc::new(FixedClassifier(0.82345))), None);
        let response = service.predict(request()).await.unwrap();

        assert_eq!(response.probability, 0.823);
        assert_eq!(response.risk_level, RiskLevel::High);
        assert_eq!(response.confidence, Confidence::High);
        assert!(response.recommendation.starts_with("HIGH RISK (82.3%)"));
        assert!(response.recommendation.contains("Mirpur"));
        assert_eq!(response.key_factors["Age"], 34);
        assert_eq!(response.key_factors["Location"], "Mirpur, Dhaka");
        assert_eq!(
            response.key_factors["Test_Results"],
            "NS1: Positive, IgG: Negative, IgM: Negative"
        );
        assert!(response.key_factors.contains_key("NS1_Status"));
        assert!(!response.key_factors.contains_key("IgM_Status"));
        assert_eq!(
            response.key_factors["Area_Risk"],
            "Mirpur in Dhaka shows elevated risk"
        );
    }

    #[tokio::test]
    async fn test_low_risk_has_no_area_risk() {
        let service = PredictionService::new(Some(Arc::new(FixedClassifier(0.1))), None);
        let response = service.predict(request()).await.unwrap();
        assert_eq!(response.risk_level, RiskLevel::Low);
        assert!(!response.key_factors.contains_key("Area_Risk"));
    }

    #[tokio::test]
    async fn test_missing_fields_reported() {
        let service = PredictionService::new(Some(Arc::new(FixedClassifier(0.5))), None);
        let mut req = request();
        req.age = None;
        req.house_type = None;

        match service.predict(req).await {
            Err(PredictorError::MissingFields { fields }) => assert_eq!(fields, ["Age", "HouseType"]),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_model_not_loaded() {
        let service = PredictionService::new(None, None);
        assert!(!service.is_loaded());
        assert!(matches!(
            service.predict(request()).await,
            Err(PredictorError::ModelNotLoaded)
        ));
    }

    #[tokio::test]
    async fn test_case_logged_in_background() {
        let store = Arc::new(InMemoryCaseStore::default());
        let service = PredictionService::new(
            Some(Arc::new(FixedClassifier(0.75))),
            Some(store.clone()),
        );
        service.predict(request()).await.unwrap();

        for _ in 0..50 {
            if store.count().await.unwrap() == 1 {
                break;
            }
            tokio::task::yield_now().await;
        }
        let cases = store.cases().await;
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].area, "Mirpur");
        assert!((cases[0].risk_score - 0.75).abs() < 1e-12);
    }
}
