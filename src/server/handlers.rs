// ============================================================
// HTTP Handlers
// ============================================================
//   GET  /health      → always 200, reports whether a model is loaded
//   POST /predict     → validate body, then predict (400 / 500 / 200)
//   GET  /model_info  → coefficients of the loaded model (500 / 200)
//
// /predict takes the raw body instead of axum's Json extractor so
// every malformed input maps to 400 with a JSON error, rather
// than axum's 415/422 plain-text rejections.

use axum::{body::Bytes, extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::domain::model::ModelInfo;
use crate::domain::record::{validate_hours, Difficulty};
use crate::server::{error::ApiError, AppState};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictRequest {
    pub hours_studied:   f64,
    pub exam_difficulty: Difficulty,
}

impl PredictRequest {
    /// Parse and validate a request body.
    pub fn from_body(body: &[u8]) -> Result<Self, ApiError> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| ApiError::BadRequest(format!("Invalid JSON body: {e}")))?;
        let obj = value
            .as_object()
            .ok_or_else(|| ApiError::BadRequest("Request body must be a JSON object".into()))?;

        let hours = obj
            .get("hours_studied")
            .ok_or_else(|| ApiError::BadRequest("Missing required field: hours_studied".into()))?
            .as_f64()
            .ok_or_else(|| ApiError::BadRequest("hours_studied must be a number".into()))?;

        let difficulty = obj
            .get("exam_difficulty")
            .ok_or_else(|| ApiError::BadRequest("Missing required field: exam_difficulty".into()))?
            .as_str()
            .ok_or_else(|| ApiError::BadRequest("exam_difficulty must be a string".into()))?
            .parse::<Difficulty>()?;

        Ok(Self { hours_studied: validate_hours(hours)?, exam_difficulty: difficulty })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    pub predicted_score: f64,
    pub input:           PredictRequest,
}

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status":       "healthy",
        "message":      "API is running",
        "model_loaded": state.model_loaded(),
    }))
}

pub async fn predict(State(state): State<AppState>, body: Bytes) -> Result<Json<PredictResponse>, ApiError> {
    let request   = PredictRequest::from_body(&body)?;
    let predictor = state.predictor()?;

    let predicted_score = predictor
        .predict(request.hours_studied, request.exam_difficulty)
        .map_err(ApiError::internal)?;

    tracing::info!(
        "predict hours={} difficulty={} → {:.2}",
        request.hours_studied, request.exam_difficulty, predicted_score
    );
    Ok(Json(PredictResponse { predicted_score, input: request }))
}

pub async fn model_info(State(state): State<AppState>) -> Result<Json<ModelInfo>, ApiError> {
    Ok(Json(state.predictor()?.info()))
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_valid_body() {
        let req = PredictRequest::from_body(br#"{"hours_studied": 5, "exam_difficulty": "Medium"}"#).unwrap();
        assert_eq!(req.hours_studied, 5.0);
        assert_eq!(req.exam_difficulty, Difficulty::Medium);
    }

    #[test]
    fn test_rejects_each_bad_field() {
        let cases: [&[u8]; 7] = [
            b"not json",
            b"[1, 2]",
            br#"{}"#,
            br#"{"hours_studied": "invalid", "exam_difficulty": "Medium"}"#,
            br#"{"hours_studied": -3, "exam_difficulty": "Medium"}"#,
            br#"{"hours_studied": 5.0}"#,
            br#"{"hours_studied": 5.0, "exam_difficulty": "Invalid"}"#,
        ];
        for body in cases {
            let err = PredictRequest::from_body(body).unwrap_err();
            assert!(matches!(err, ApiError::BadRequest(_)), "{}", String::from_utf8_lossy(body));
        }
    }
}
