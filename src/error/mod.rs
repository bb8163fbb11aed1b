//! Centralized API error handling for Bankline
//!
//! Every failure leaves the service as `{"Error": "<message>"}`. Handler-level
//! failures answer 400; access guard denials answer 403.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auth::{AccessDenied, JwtError};
use crate::store::StoreError;

/// API error type with HTTP status code mapping
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("validation failed: {0}")]
    ValidationError(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("token issuance failed: {0}")]
    Token(#[from] JwtError),
}

/// JSON error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(rename = "Error")]
    pub error: String,
}

impl ApiError {
    /// Get the HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::BadRequest(_)
            | ApiError::ValidationError(_)
            | ApiError::Store(_)
            | ApiError::Token(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();

        match &self {
            ApiError::Store(StoreError::Database(_)) | ApiError::Token(_) => {
                tracing::error!(error = %message, status = %status.as_u16(), "Server error occurred");
            }
            _ => {
                tracing::debug!(error = %message, status = %status.as_u16(), "Client error occurred");
            }
        }

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<AccessDenied> for ApiError {
    fn from(denied: AccessDenied) -> Self {
        ApiError::Forbidden(denied.to_string())
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        ApiError::ValidationError(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// Result type alias using ApiError
pub type ApiResult<T> = Result<T, ApiError>;
