//! Error types for the dengue predictor
//!
//! One error enum shared by the encoder, classifier, chat and case-store
//! layers. The HTTP layer maps these onto status codes in `server::error`.

use thiserror::Error;

/// Main error type for the prediction service
#[derive(Error, Debug)]
pub enum PredictorError {
    /// Required request fields were absent
    #[error("Missing required fields: {fields:?}")]
    MissingFields { fields: Vec<String> },

    /// A request field was present but unusable
    #[error("Invalid value for {field}: {reason}")]
    InvalidField { field: String, reason: String },

    /// Malformed request body
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Classifier was never loaded
    #[error("ML model not loaded")]
    ModelNotLoaded,

    /// Model file could not be interpreted
    #[error("Model format error: {0}")]
    ModelFormat(String),

    /// Model columns disagree with the encoder column order
    #[error("Feature mismatch at position {position}: expected {expected:?}, found {found:?}")]
    FeatureMismatch {
        position: usize,
        expected: String,
        found: String,
    },

    /// Generative AI credential absent
    #[error("AI assistant is not configured")]
    AiNotConfigured,

    /// Text generation failed upstream
    #[error("Generation failed: {0}")]
    GenerationError(String),

    /// Upstream service answered with a non-success status
    #[error("Upstream returned HTTP {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    /// Vector store unavailable or failing
    #[error("Case store error: {0}")]
    CaseStoreError(String),

    /// Case store not configured
    #[error("Case store is not configured")]
    CaseStoreNotConfigured,

    /// Resource lookup found nothing
    #[error("Not found: {0}")]
    NotFound(String),

    /// HTTP client errors
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Timeout errors
    #[error("Operation timed out after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    /// Generic errors with context
    #[error("{0}")]
    Generic(String),
}

/// Result type alias for predictor operations
pub type Result<T> = std::result::Result<T, PredictorError>;

impl From<anyhow::Error> for PredictorError {
    fn from(err: anyhow::Error) -> Self {
        PredictorError::Generic(format!("{:#}", err))
    }
}

impl PredictorError {
    /// Whether a retry could plausibly succeed
    pub fn is_transient(&self) -> bool {
        match self {
            PredictorError::Timeout { .. } => true,
            PredictorError::HttpError(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            PredictorError::UpstreamStatus { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_display() {
        let err = PredictorError::MissingFields {
            fields: vec!["Age".to_string(), "Area".to_string()],
        };
        let text = err.to_string();
        assert!(text.contains("Age"));
        assert!(text.contains("Area"));
    }

    #[test]
    fn test_feature_mismatch_display() {
        let err = PredictorError::FeatureMismatch {
            position: 6,
            expected: "Area_Badda".to_string(),
            found: "Area_Banasree".to_string(),
        };
        assert!(err.to_string().contains("position 6"));
        assert!(err.to_string().contains("Area_Badda"));
    }

    #[test]
    fn test_transient_classification() {
        assert!(PredictorError::Timeout { duration_ms: 10 }.is_transient());
        assert!(PredictorError::UpstreamStatus { status: 503, body: String::new() }.is_transient());
        assert!(PredictorError::UpstreamStatus { status: 429, body: String::new() }.is_transient());
        assert!(!PredictorError::UpstreamStatus { status: 400, body: String::new() }.is_transient());
        assert!(!PredictorError::ModelNotLoaded.is_transient());
        assert!(!PredictorError::ConfigError("x".into()).is_transient());
    }

    #[test]
    fn test_anyhow_conversion() {
        let err: PredictorError = anyhow::anyhow!("boom").into();
        assert!(matches!(err, PredictorError::Generic(ref m) if m == "boom"));
    }
}
