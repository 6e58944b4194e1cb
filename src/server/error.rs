//! HTTP error mapping

use crate::errors::PredictorError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Error returned by API handlers as `{"error": ...}`
#[derive(Debug)]
pub struct ApiError(pub PredictorError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            PredictorError::MissingFields { .. }
            | PredictorError::InvalidField { .. }
            | PredictorError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            PredictorError::NotFound(_) => StatusCode::NOT_FOUND,
            PredictorError::AiNotConfigured | PredictorError::CaseStoreNotConfigured => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<PredictorError> for ApiError {
    fn from(error: PredictorError) -> Self {
        Self(error)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(PredictorError::InvalidRequest(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "Request failed");
        } else {
            tracing::debug!(error = %self.0, %status, "Request rejected");
        }

        let body = match &self.0 {
            PredictorError::MissingFields { fields } => json!({
                "error": self.0.to_string(),
                "missing_fields": fields,
            }),
            other => json!({ "error": other.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (PredictorError::MissingFields { fields: vec!["Age".into()] }, 400),
            (PredictorError::InvalidRequest("bad".into()), 400),
            (PredictorError::NotFound("area".into()), 404),
            (PredictorError::CaseStoreNotConfigured, 503),
            (PredictorError::AiNotConfigured, 503),
            (PredictorError::ModelNotLoaded, 500),
            (PredictorError::Generic("boom".into()), 500),
        ];

        for (error, expected) in cases {
            assert_eq!(ApiError(error).status().as_u16(), expected);
        }
    }
}
