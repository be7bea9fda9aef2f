//! API error type and the single place errors become HTTP responses.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        FromRequest, FromRequestParts,
    },
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
};
use std::any::Any;
use nullaudit_store::StoreError;
use serde::Serialize;
use thiserror::Error;

use crate::rate_limit::RateLimitError;

/// Application error type
///
/// Every handler returns `Result<_, ApiError>`; `IntoResponse` below is the
/// only formatter, so all error bodies share one shape.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or invalid request field (400)
    #[error("{message}")]
    Validation {
        /// Offending field, when known
        field: Option<String>,
        /// What is wrong
        message: String,
    },

    /// Task would move backwards in its lifecycle (400)
    #[error("{0}")]
    InvalidTransition(String),

    /// Unknown resource (404)
    #[error("{0}")]
    NotFound(String),

    /// Client exceeded its request quota (429)
    #[error("Too many requests, retry in {retry_after_secs}s")]
    RateLimited {
        /// Seconds until the window resets
        retry_after_secs: u64,
    },

    /// Anything else (500)
    #[error("{0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Always false
    pub success: bool,
    /// Error details
    pub error: ErrorBody,
}

/// Machine-readable error details
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Stable code for client-side branching
    pub code: &'static str,
    /// Human-readable message
    pub message: String,
    /// HTTP status
    pub status: u16,
    /// Offending field for validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ApiError {
    /// Validation error naming a field
    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        ApiError::Validation {
            field: Some(field.to_string()),
            message: message.into(),
        }
    }

    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Validation { .. } => "VALIDATION_ERROR",
            ApiError::InvalidTransition(_) => "INVALID_TRANSITION",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::RateLimited { .. } => "RATE_LIMITED",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// HTTP status
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. } | ApiError::InvalidTransition(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();

        match &self {
            ApiError::Internal(msg) => tracing::error!(code, "Unexpected error: {}", msg),
            ApiError::RateLimited { retry_after_secs } => {
                tracing::warn!(code, retry_after_secs, "Request rejected by rate limiter")
            }
            other => tracing::debug!(code, "Request failed: {}", other),
        }

        let retry_after = match &self {
            ApiError::RateLimited { retry_after_secs } => Some(*retry_after_secs),
            _ => None,
        };

        let field = match &self {
            ApiError::Validation { field, .. } => field.clone(),
            _ => None,
        };

        let body = Json(ErrorResponse {
            success: false,
            error: ErrorBody {
                code,
                message: self.to_string(),
                status: status.as_u16(),
                field,
            },
        });

        let mut response = (status, body).into_response();
        if let Some(secs) = retry_after {
            if let Ok(value) = HeaderValue::from_str(&secs.to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
        }
        response
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(_) => ApiError::NotFound(e.to_string()),
            StoreError::Validation { field, message } => ApiError::Validation {
                field: Some(field.to_string()),
                message,
            },
            StoreError::InvalidTransition { .. } => ApiError::InvalidTransition(e.to_string()),
        }
    }
}

impl From<RateLimitError> for ApiError {
    fn from(e: RateLimitError) -> Self {
        match e {
            RateLimitError::Exceeded { retry_after_secs } => {
                ApiError::RateLimited { retry_after_secs }
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation {
            field: None,
            message: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Validation {
            field: None,
            message: rejection.body_text(),
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Validation {
            field: None,
            message: rejection.body_text(),
        }
    }
}

/// JSON body extractor whose rejections go through [`ApiError`]
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Query string extractor whose rejections go through [`ApiError`]
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

/// Path extractor whose rejections go through [`ApiError`]
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

/// Turn a handler panic into a structured 500
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "handler panicked".to_string()
    };

    ApiError::Internal(detail).into_response()
}
