use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use services::{AnswerError, ContentError, ProgressError};
use thiserror::Error;
use tracing::error;

/// Errors returned to HTTP clients.
///
/// Only `NotFound` carries a client-facing message; everything else becomes
/// an opaque 500 and the cause is logged.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    #[error("{0}")]
    NotFound(&'static str),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub(crate) fn internal(error: impl std::fmt::Display) -> Self {
        Self::Internal(error.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self {
            ApiError::NotFound(detail) => (StatusCode::NOT_FOUND, *detail),
            ApiError::Internal(cause) => {
                error!(%cause, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

impl From<ProgressError> for ApiError {
    fn from(error: ProgressError) -> Self {
        Self::internal(error)
    }
}

impl From<AnswerError> for ApiError {
    fn from(error: AnswerError) -> Self {
        match error {
            AnswerError::ProblemNotFound(_) => Self::NotFound("Problem not found"),
            AnswerError::ExerciseNotFound(_) => Self::NotFound("Exercise not found"),
            other => Self::internal(other),
        }
    }
}

/// Maps sampling failures; `what` names the missing content in the 404 body.
pub(crate) fn content_error(what: &'static str) -> impl FnOnce(ContentError) -> ApiError {
    move |error| match error {
        ContentError::NoContent => ApiError::NotFound(what),
        other => ApiError::internal(other),
    }
}
