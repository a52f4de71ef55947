//! Unified error type for the gateway's proxy handlers.
//!
//! Every handler is the final boundary: whatever goes wrong is turned into an
//! HTTP response carrying an `error` field, never an unhandled fault.

use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Main error type for all proxy operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ProxyError {
    /// A required path, query or body parameter was absent or empty.
    #[error("{0}")]
    MissingParameter(&'static str),

    /// The request body could not be parsed as the expected JSON shape.
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// A path parameter tried to escape its directory.
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// The URL path or query string could not be extracted.
    #[error("{0}")]
    InvalidRequest(String),

    /// Upstream answered with a non-success status.
    #[error("{message}")]
    Upstream {
        status: StatusCode,
        message: String,
        details: Option<String>,
    },

    /// Upstream could not be reached or the body could not be read.
    #[error("{message}")]
    Transport {
        message: String,
        #[source]
        source: reqwest::Error,
    },

    /// Upstream answered 2xx with a body that is not valid JSON.
    #[error("{message}")]
    Decode { message: String, reason: String },

    /// Upstream answered 2xx with JSON of the wrong shape.
    #[error("{0}")]
    UnexpectedShape(String),

    /// Reading the local taxonomy tree failed.
    #[error("{message}")]
    Filesystem {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration loading or validation failed.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ProxyError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingParameter(_)
            | Self::InvalidBody(_)
            | Self::InvalidPath(_)
            | Self::InvalidRequest(_) => {
                StatusCode::BAD_REQUEST
            },
            Self::Upstream { status, .. } if status.is_client_error() || status.is_server_error() => {
                *status
            },
            Self::Upstream { .. }
            | Self::Transport { .. }
            | Self::Decode { .. }
            | Self::UnexpectedShape(_)
            | Self::Filesystem { .. }
            | Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            Self::Upstream { message, details: Some(details), .. } => {
                json!({ "error": message, "details": details })
            },
            Self::Filesystem { message, .. } => json!({ "data": [], "error": message }),
            other => json!({ "error": other.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}

impl From<PathRejection> for ProxyError {
    fn from(rejection: PathRejection) -> Self {
        Self::InvalidRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ProxyError {
    fn from(rejection: QueryRejection) -> Self {
        Self::InvalidRequest(rejection.body_text())
    }
}

/// Result type alias for proxy operations.
pub type ProxyResult<T> = Result<T, ProxyError>;
