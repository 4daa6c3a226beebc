//! Error responses for the JSON endpoints.
//!
//! # Design Decisions
//! - Body shape is `{"error": {"code", "message"}}`
//! - API transport failures and timeouts map to 502 / 504
//! - HTML pages never use this type; they redirect with a flash message

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::blockcypher::BlockCypherError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Error code (UNKNOWN_COIN, INVALID_HASH, NOT_FOUND, ...)
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum WebError {
    #[error("{0}")]
    UnknownCoin(String),

    #[error("{0}")]
    InvalidHash(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    UpstreamTimeout(String),

    #[error("{0}")]
    Upstream(String),
}

impl WebError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            WebError::UnknownCoin(_) => (StatusCode::NOT_FOUND, "UNKNOWN_COIN"),
            WebError::InvalidHash(_) => (StatusCode::BAD_REQUEST, "INVALID_HASH"),
            WebError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            WebError::UpstreamTimeout(_) => (StatusCode::GATEWAY_TIMEOUT, "UPSTREAM_TIMEOUT"),
            WebError::Upstream(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
        }
    }
}

impl From<BlockCypherError> for WebError {
    fn from(err: BlockCypherError) -> Self {
        match err {
            BlockCypherError::InvalidHash(hash) => {
                WebError::InvalidHash(format!("Invalid transaction hash: {}", hash))
            }
            BlockCypherError::NotFound(message) => WebError::NotFound(message),
            BlockCypherError::Http(e) if e.is_timeout() => {
                WebError::UpstreamTimeout("Blockchain API timed out".to_string())
            }
            other => WebError::Upstream(other.to_string()),
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let body = Json(ErrorResponse {
            error: ErrorBody {
                code,
                message: self.to_string(),
            },
        });
        (status, body).into_response()
    }
}
