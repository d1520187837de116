//! Error types for the cache administration API
//!
//! The cache itself never fails; these cover caller input and warm-up reports.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Api Error Enum ==
/// Unified error type for the administrative endpoints.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Missing or malformed caller input
    #[error("{0}")]
    InvalidRequest(String),

    /// Warm-up ran and one of its sources failed
    #[error("{error}: {details}")]
    WarmUpFailed { error: String, details: String },

    /// Known route, unsupported method
    #[error("{method} not allowed for {path}")]
    MethodNotAllowed { method: String, path: String },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::WarmUpFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::WarmUpFailed { error, details } => ErrorResponse::with_details(error, details),
            other => ErrorResponse::new(other.to_string()),
        };

        (status, Json(body)).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the API handlers.
pub type Result<T> = std::result::Result<T, ApiError>;
