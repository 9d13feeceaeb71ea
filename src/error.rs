//! Error taxonomy for the HTTP surface.
//!
//! Every failure in the request path ends up as an [`ApiError`], which
//! renders itself as a JSON body with the matching status code.

use std::collections::BTreeMap;

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

/// Field name -> human readable message.
pub type FieldErrors = BTreeMap<String, String>;

pub const NO_JSON_MESSAGE: &str = "No JSON data provided";
pub const PIPELINE_NOT_LOADED_MESSAGE: &str = "Pipeline not loaded.";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{}", NO_JSON_MESSAGE)]
    MalformedRequest,

    #[error("validation failed for {} field(s)", .0.len())]
    Validation(FieldErrors),

    #[error("Prediction error: {0}")]
    Prediction(String),

    #[error("{}", PIPELINE_NOT_LOADED_MESSAGE)]
    PipelineUnavailable,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum ErrorDetail<'a> {
    Message(String),
    Fields(&'a FieldErrors),
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: ErrorDetail<'a>,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MalformedRequest | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Prediction(_) | ApiError::PipelineUnavailable => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            ApiError::Validation(fields) => ErrorDetail::Fields(fields),
            other => ErrorDetail::Message(other.to_string()),
        };
        HttpResponse::build(self.status_code()).json(ErrorBody { error })
    }
}
