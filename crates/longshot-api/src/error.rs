//! API error types.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use longshot_jobs::JobError;

pub type ApiResult<T> = Result<T, ApiError>;

const INTERNAL_DETAIL: &str = "An internal error occurred";

#[derive(Debug, Error)]
pub enum ApiError {
    /// Body could not be read or deserialized.
    #[error("Invalid request body: {}", .0.body_text())]
    Body(#[from] JsonRejection),

    #[error("Invalid query string: {}", .0.body_text())]
    Query(#[from] QueryRejection),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Convert a job error, hiding internals when `production` is set.
    pub fn from_job(error: JobError, production: bool) -> Self {
        match error {
            JobError::Validation(msg) => ApiError::Validation(msg),
            _ if production => ApiError::Internal(INTERNAL_DETAIL.to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Body(rejection) => rejection.status(),
            ApiError::Query(rejection) => rejection.status(),
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::Body(_) => "invalid_body",
            ApiError::Query(_) => "invalid_query",
            ApiError::Validation(_) => "validation_error",
            ApiError::Internal(_) => "internal_error",
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
    code: &'static str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            detail: self.to_string(),
            code: self.code(),
        };

        (self.status_code(), Json(body)).into_response()
    }
}
