use actix_web::{web, HttpResponse};
use serde_json::{json, Map, Value};
use tracing::{error, info, instrument, warn};

use super::AppState;
use crate::config::FailurePolicy;
use crate::core::pipeline::InvokeError;
use crate::core::{normalize, validate_record, PredictionResponse};
use crate::error::ApiError;
use crate::models::RawPatientRecord;

/// `POST /predict`
#[instrument(skip_all, fields(bytes = body.len()))]
pub async fn predict(
    state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let response = run_prediction(&state, &body)?;
    info!(cancer = %response.cancer, "prediction served");
    Ok(HttpResponse::Ok().json(response))
}

/// `GET /health`
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "pipeline_loaded": state.predictions.is_loaded(),
    }))
}

/// Parse, validate, encode and score one request body.
pub fn run_prediction(state: &AppState, body: &[u8]) -> Result<PredictionResponse, ApiError> {
    let object = parse_body(body)?;

    let record = RawPatientRecord::from_object(object).map_err(|fields| {
        warn!(fields = ?fields.keys().collect::<Vec<_>>(), "schema check failed");
        ApiError::Validation(fields)
    })?;

    validate_record(&record).map_err(|fields| {
        warn!(fields = ?fields.keys().collect::<Vec<_>>(), "validation failed");
        ApiError::Validation(fields)
    })?;

    let encoded = normalize(&record).map_err(|e| prediction_failed(state, e.to_string()))?;

    let label = state.predictions.predict(&encoded).map_err(|e| match e {
        InvokeError::Unavailable => {
            error!("prediction requested but no pipeline is loaded");
            ApiError::PipelineUnavailable
        }
        InvokeError::Predict(e) => prediction_failed(state, e.to_string()),
    })?;

    Ok(PredictionResponse::from_label(label))
}

fn parse_body(body: &[u8]) -> Result<Map<String, Value>, ApiError> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(object)) if !object.is_empty() => Ok(object),
        Ok(_) => Err(ApiError::MalformedRequest),
        Err(e) => {
            warn!(error = %e, "request body is not JSON");
            Err(ApiError::MalformedRequest)
        }
    }
}

fn prediction_failed(state: &AppState, cause: String) -> ApiError {
    error!(%cause, "prediction failed");
    if state.on_failure == FailurePolicy::Abort {
        error!("aborting on prediction failure");
        std::process::exit(1);
    }
    ApiError::Prediction(cause)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PredictionService;

    fn state() -> AppState {
        AppState::new(PredictionService::unavailable(), FailurePolicy::Respond)
    }

    #[test_case::test_case(b"" ; "empty body")]
    #[test_case::test_case(b"not json" ; "garbage")]
    #[test_case::test_case(b"{}" ; "empty object")]
    #[test_case::test_case(b"[1, 2]" ; "array")]
    #[test_case::test_case(b"null" ; "null")]
    fn malformed_bodies(body: &[u8]) {
        assert!(matches!(
            run_prediction(&state(), body),
            Err(ApiError::MalformedRequest)
        ));
    }

    #[test]
    fn validation_runs_before_pipeline_check() {
        let body = br#"{"gender": "m"}"#;
        match run_prediction(&state(), body) {
            Err(ApiError::Validation(fields)) => {
                assert_eq!(fields.len(), 14);
                assert!(!fields.contains_key("gender"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
