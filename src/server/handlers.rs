//! Route handlers

use super::areas::areas_by_district;
use super::error::ApiError;
use super::state::AppState;
use crate::cases::{AreaRisk, AreaStatistics, SimilarCase, DEFAULT_HIGH_RISK_THRESHOLD, DEFAULT_SIMILAR_LIMIT};
use crate::chat::{ChatFailure, NOT_CONFIGURED_MESSAGE};
use crate::errors::PredictorError;
use crate::model::ModelInfo;
use crate::prediction::PredictResponse;
use crate::types::{ChatRequest, ChatResponse, PredictRequest};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;

type ApiResult<T> = std::result::Result<Json<T>, ApiError>;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model_loaded: bool,
    pub ai_configured: bool,
    pub vector_db_configured: bool,
}

#[derive(Debug, Deserialize)]
pub struct SimilarQuery {
    #[serde(default)]
    q: String,
    #[serde(default = "default_similar_limit")]
    limit: usize,
}

fn default_similar_limit() -> usize {
    DEFAULT_SIMILAR_LIMIT
}

#[derive(Debug, Deserialize)]
pub struct HighRiskQuery {
    #[serde(default = "default_threshold")]
    threshold: f64,
}

fn default_threshold() -> f64 {
    DEFAULT_HIGH_RISK_THRESHOLD
}

pub async fn predict(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<PredictRequest>, JsonRejection>,
) -> ApiResult<PredictResponse> {
    let Json(request) = payload?;
    let response = state.prediction.predict(request).await?;
    Ok(Json(response))
}

pub async fn chat(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return ApiError::from(rejection).into_response(),
    };

    match state.chat.respond(request).await {
        Ok(response) => Json(response).into_response(),
        Err(ChatFailure::NotConfigured) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ChatResponse {
                response: NOT_CONFIGURED_MESSAGE.to_string(),
                conversation_history: Vec::new(),
            }),
        )
            .into_response(),
        Err(ChatFailure::EmptyMessage) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "No message provided" })),
        )
            .into_response(),
        Err(ChatFailure::Generation(apology)) => {
            (StatusCode::INTERNAL_SERVER_ERROR, Json(apology)).into_response()
        }
    }
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        model_loaded: state.prediction.is_loaded(),
        ai_configured: state.chat.is_configured(),
        vector_db_configured: state.cases.is_some(),
    })
}

pub async fn stats(State(state): State<Arc<AppState>>) -> ApiResult<ModelInfo> {
    let info = state
        .prediction
        .model_info()
        .ok_or(PredictorError::ModelNotLoaded)?;
    Ok(Json(info))
}

pub async fn areas() -> Json<BTreeMap<&'static str, Vec<&'static str>>> {
    Json(areas_by_district())
}

pub async fn similar_cases(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SimilarQuery>,
) -> ApiResult<Vec<SimilarCase>> {
    let store = state.case_store()?;
    if query.q.trim().is_empty() {
        return Err(PredictorError::InvalidRequest("Query parameter q is required".to_string()).into());
    }
    Ok(Json(store.search_similar(&query.q, query.limit).await?))
}

pub async fn area_stats(
    State(state): State<Arc<AppState>>,
    Path((district, area)): Path<(String, String)>,
) -> ApiResult<AreaStatistics> {
    let store = state.case_store()?;
    let stats = store
        .area_statistics(&district, &area)
        .await?
        .ok_or_else(|| PredictorError::NotFound(format!("No cases recorded for {}, {}", area, district)))?;
    Ok(Json(stats))
}

pub async fn high_risk_areas(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HighRiskQuery>,
) -> ApiResult<Vec<AreaRisk>> {
    let store = state.case_store()?;
    if !(0.0..=1.0).contains(&query.threshold) {
        return Err(PredictorError::InvalidRequest("threshold must be between 0 and 1".to_string()).into());
    }
    Ok(Json(store.high_risk_areas(query.threshold).await?))
}
