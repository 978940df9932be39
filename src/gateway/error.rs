//! Error type for server round-trips.

use thiserror::Error;

/// Why a gateway call produced no usable value.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum GatewayError {
    /// The request never got a response (connection refused, reset, timeout).
    #[error("transport error: {0}")]
    Transport(String),

    /// The server answered with a non-2xx status.
    #[error("server returned {status} for {path}")]
    Status { status: u16, path: String },

    /// The response body did not match the expected shape.
    #[error("could not decode response: {0}")]
    Decode(String),

    /// The request was rejected before being sent.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl GatewayError {
    /// Short text suitable for the error popup.
    pub fn user_message(&self) -> &str {
        match self {
            Self::Transport(_) => "Could not reach the server. Check your connection.",
            Self::Status { status: 401 | 403, .. } => {
                "You need to be logged in to do that."
            }
            Self::Status { status: 404, .. } => "The requested item was not found.",
            Self::Status { .. } => "The server rejected the request.",
            Self::Decode(_) => "The server sent an unexpected response.",
            Self::InvalidRequest(_) => "The request could not be built.",
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return Self::Decode(err.to_string());
        }
        if let Some(status) = err.status() {
            return Self::Status {
                status: status.as_u16(),
                path: err.url().map(|u| u.path().to_string()).unwrap_or_default(),
            };
        }
        if err.is_builder() {
            return Self::InvalidRequest(err.to_string());
        }
        Self::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Result of every gateway operation.
pub type ApiResult<T> = std::result::Result<T, GatewayError>;
