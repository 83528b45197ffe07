use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use registry::RegistryError;
use serde::Serialize;
use slicer::SlicerError;
use thiserror::Error;

/// Unified application error type
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid request parameters
    #[error("{0}")]
    BadRequest(String),

    /// Registration / lookup errors
    #[error("{0}")]
    Registry(#[from] RegistryError),

    /// Feed rendering errors
    #[error("{0}")]
    Slicer(#[from] SlicerError),
}

/// API error response body
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message, details) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            AppError::Registry(e) => match e {
                RegistryError::NotFound(_) => (StatusCode::NOT_FOUND, e.to_string(), None),
                RegistryError::Store(inner) => {
                    tracing::error!("Store error: {}", inner);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "store error".to_string(),
                        Some(inner.to_string()),
                    )
                }
                // Validation rejections: the caller's input, not us.
                RegistryError::EmptyHost
                | RegistryError::Unreachable(_)
                | RegistryError::BadStatus(_)
                | RegistryError::NotXml(_) => (StatusCode::BAD_REQUEST, e.to_string(), None),
            },
            AppError::Slicer(e) => match e {
                SlicerError::InvalidRule(_) => (StatusCode::BAD_REQUEST, e.to_string(), None),
                // The serving contract answers "not found" when the
                // upstream cannot be fetched.
                SlicerError::Upstream(inner) => {
                    tracing::warn!("Upstream fetch failed: {}", inner);
                    (StatusCode::NOT_FOUND, e.to_string(), None)
                }
                SlicerError::Malformed(inner) => {
                    tracing::error!("Malformed upstream feed: {}", inner);
                    (
                        StatusCode::BAD_GATEWAY,
                        "malformed upstream feed".to_string(),
                        Some(inner.clone()),
                    )
                }
            },
        };

        let body = ErrorResponse {
            error: error_message,
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Convenience type alias
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }
}
