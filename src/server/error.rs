use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::domain::record::ValidationError;

/// Every failure a handler can return. All render as `{"error": msg}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Model not loaded. Run 'train' first.")]
    ModelNotLoaded,

    #[error("Not found")]
    NotFound,

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn internal(err: anyhow::Error) -> Self {
        ApiError::Internal(format!("{err:#}"))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_)  => StatusCode::BAD_REQUEST,
            ApiError::NotFound       => StatusCode::NOT_FOUND,
            ApiError::ModelNotLoaded => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal(_)    => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{}", self);
        } else {
            tracing::debug!("Rejected request: {}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
