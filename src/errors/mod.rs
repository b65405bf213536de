/// Unified error handling module
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Unified error response format
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub ok: bool,
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

/// Failure of a single upstream feed. Never escapes the aggregation pipeline.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("upstream returned status {0}")]
    Status(reqwest::StatusCode),
    #[error("timed out after {0:?}")]
    Timeout(Duration),
    #[error("malformed payload: {0}")]
    Malformed(String),
}

/// Invalid orbital body table, fatal at startup
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("body '{name}' is invalid: {reason}")]
    InvalidBody { name: String, reason: String },
    #[error("body '{0}' is defined more than once")]
    DuplicateBody(String),
    #[error("body '{name}' orbits unknown parent '{parent}'")]
    UnknownParent { name: String, parent: String },
    #[error("body '{0}' is part of a parent cycle")]
    ParentCycle(String),
}

#[derive(Debug, Error, PartialEq)]
#[error("invalid time mode: {0}")]
pub struct InvalidTimeMode(pub String);

#[derive(Debug, Error, PartialEq)]
#[error("unknown event type: {0}")]
pub struct UnknownEventType(pub String);

#[derive(Debug)]
pub enum ApiError {
    Upstream(FetchError),
    NotFound(String),
    InvalidInput(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Upstream(e) => write!(f, "External API error: {}", e),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<FetchError> for ApiError {
    fn from(err: FetchError) -> Self {
        ApiError::Upstream(err)
    }
}

impl From<InvalidTimeMode> for ApiError {
    fn from(err: InvalidTimeMode) -> Self {
        ApiError::InvalidInput(err.to_string())
    }
}

impl From<UnknownEventType> for ApiError {
    fn from(err: UnknownEventType) -> Self {
        ApiError::InvalidInput(err.to_string())
    }
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Upstream(FetchError::Status(status)) => (
                StatusCode::BAD_GATEWAY,
                match status.as_u16() {
                    403 => "UPSTREAM_403",
                    404 => "UPSTREAM_404",
                    429 => "UPSTREAM_429",
                    500..=599 => "UPSTREAM_5XX",
                    _ => "UPSTREAM_ERROR",
                },
            ),
            ApiError::Upstream(FetchError::Timeout(_)) => {
                (StatusCode::GATEWAY_TIMEOUT, "UPSTREAM_TIMEOUT")
            }
            ApiError::Upstream(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "INVALID_INPUT"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let message = match &self {
            ApiError::NotFound(msg) | ApiError::InvalidInput(msg) => msg.clone(),
            ApiError::Upstream(_) => self.to_string(),
        };

        let error_response = ErrorResponse {
            ok: false,
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(error_response)).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        let response = ApiError::NotFound("pluto".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_upstream_status_maps_to_bad_gateway() {
        let err = ApiError::from(FetchError::Status(reqwest::StatusCode::TOO_MANY_REQUESTS));
        assert_eq!(err.status_and_code(), (StatusCode::BAD_GATEWAY, "UPSTREAM_429"));
    }

    #[test]
    fn test_upstream_timeout_maps_to_gateway_timeout() {
        let err = ApiError::from(FetchError::Timeout(Duration::from_secs(5)));
        assert_eq!(err.status_and_code(), (StatusCode::GATEWAY_TIMEOUT, "UPSTREAM_TIMEOUT"));
        let malformed = ApiError::from(FetchError::Malformed("not json".into()));
        assert_eq!(malformed.status_and_code(), (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"));
    }

    #[test]
    fn test_invalid_time_mode_is_bad_input() {
        let err = ApiError::from(InvalidTimeMode("warp".into()));
        assert_eq!(err.status_and_code().0, StatusCode::BAD_REQUEST);
        assert!(err.to_string().contains("warp"));
    }
}
