use super::AppState;
use super::error::ApiError;
use crate::domain::metadata::ModelMetadata;
use crate::domain::movie::PredictRequest;
use crate::domain::prediction::PredictResponse;
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::header;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

pub const SERVICE_NAME: &str = "IMDb Rating Classification API";

pub async fn root() -> Json<Value> {
    Json(json!({
        "message": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "/health": "Health check",
            "/predict": "Predict rating category",
            "/model-info": "Model information",
            "/metrics": "Prometheus metrics"
        }
    }))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model_path: String,
    pub model_exists: bool,
    pub metadata_exists: bool,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let model = state.service.state();
    let status = if model.is_ready() { "healthy" } else { "unhealthy" };
    Json(HealthResponse {
        status: status.to_string(),
        model_path: model.model_path().display().to_string(),
        model_exists: model.model_exists(),
        metadata_exists: model.metadata_exists(),
    })
}

pub async fn model_info(State(state): State<AppState>) -> Result<Json<ModelMetadata>, ApiError> {
    let metadata = state.service.state().require_metadata()?;
    Ok(Json(metadata.clone()))
}

/// Schema validation happens in the extractor; a rejected body never reaches
/// the prediction service.
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    let Json(request) = payload?;
    let response = state.service.respond(&request)?;
    Ok(Json(response))
}

pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
