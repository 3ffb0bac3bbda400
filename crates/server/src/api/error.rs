//! HTTP mapping for core errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use waveforge_core::{JobError, MediaError};

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// API-level error carrying an HTTP status and a message.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}

impl From<MediaError> for ApiError {
    fn from(e: MediaError) -> Self {
        let status = match &e {
            MediaError::Validation(_)
            | MediaError::InvalidRange { .. }
            | MediaError::InsufficientInputs(_)
            | MediaError::UnsupportedFormat(_) => StatusCode::BAD_REQUEST,
            MediaError::UnreadableInput { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            MediaError::Workspace(_)
            | MediaError::Tool(_)
            | MediaError::MissingOutput { .. }
            | MediaError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, e.to_string())
    }
}

impl From<JobError> for ApiError {
    fn from(e: JobError) -> Self {
        let status = match &e {
            JobError::Validation(_) => StatusCode::BAD_REQUEST,
            JobError::NotFound(_) => StatusCode::NOT_FOUND,
            JobError::NotReady { .. } => StatusCode::CONFLICT,
            // A failed job is reported as a retrievable result, not a
            // server fault: the recorded reason goes to the caller.
            JobError::Failed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            JobError::Resource(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, e.to_string())
    }
}
