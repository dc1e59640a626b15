use crate::domain::errors::PredictionError;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub detail: String,
}

/// Error returned by a handler, rendered as a JSON body.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub kind: &'static str,
    pub detail: String,
}

impl From<PredictionError> for ApiError {
    fn from(err: PredictionError) -> Self {
        let status = match &err {
            PredictionError::ModelUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            PredictionError::MalformedInput { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            PredictionError::InferenceFailure { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            kind: err.kind(),
            detail: err.to_string(),
        }
    }
}

/// Body rejections keep axum's status: 400 for broken JSON, 415 for a
/// missing content type, 422 for a well-formed body that fails the schema.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            status: rejection.status(),
            kind: "invalid_request",
            detail: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!("{} {}: {}", self.status.as_u16(), self.kind, self.detail);
        } else {
            warn!("{} {}: {}", self.status.as_u16(), self.kind, self.detail);
        }
        let payload = Json(ErrorResponse {
            error: self.kind.to_string(),
            detail: self.detail,
        });
        (self.status, payload).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prediction_error_status_mapping() {
        let cases = [
            (PredictionError::unavailable("x"), StatusCode::SERVICE_UNAVAILABLE),
            (PredictionError::malformed("x"), StatusCode::UNPROCESSABLE_ENTITY),
            (PredictionError::inference("x"), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            let kind = err.kind();
            let api = ApiError::from(err);
            assert_eq!(api.status, status);
            assert_eq!(api.kind, kind);
        }
    }

    #[test]
    fn test_into_response_keeps_status() {
        let response = ApiError::from(PredictionError::unavailable("not loaded")).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
