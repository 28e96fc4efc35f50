//! Unified error type for the relay and its HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// Errors that can occur while relaying a transformation request.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The incoming request failed validation (missing field, oversize
    /// upload, disallowed file type).
    #[error("{0}")]
    Validation(String),

    /// The provider returned an error response or an unusable result shape.
    #[error("Provider error: {message}")]
    Provider {
        /// Upstream HTTP status, when the provider answered at all.
        status: Option<u16>,
        /// Error detail, provider-supplied when available.
        message: String,
    },

    /// The outbound provider call exceeded its configured time bound.
    #[error("The image generation request timed out")]
    Timeout,

    /// An I/O error occurred (scratch file read/write).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A non-timeout network error occurred on the outbound call.
    #[error("Network error: {0}")]
    Network(reqwest::Error),

    /// Startup configuration error. Never surfaces over HTTP.
    #[error("Config error: {0}")]
    Config(String),
}

// Timeouts get their own variant so the handler can answer 504; every
// other transport failure stays a 500.
impl From<reqwest::Error> for RelayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Network(err)
        }
    }
}

impl RelayError {
    /// The HTTP status this error maps to.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Timeout => StatusCode::GATEWAY_TIMEOUT,
            Self::Provider { .. } | Self::Io(_) | Self::Network(_) | Self::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// JSON error envelope sent for every failed request.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Always `false`.
    pub success: bool,
    /// Human-readable error message.
    pub error: String,
    /// Extra detail (e.g. the upstream status) when available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let detail = match &self {
            Self::Provider { status: Some(code), .. } => Some(format!("upstream status {code}")),
            _ => None,
        };
        let body = ErrorBody { success: false, error: self.to_string(), detail };
        (self.status_code(), Json(body)).into_response()
    }
}
