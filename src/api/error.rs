//! API error responses
//!
//! Maps the core error taxonomy onto HTTP status codes: invalid
//! arguments are client errors, a malformed upstream feed is a bad
//! gateway, everything else is a server error.

use crate::error::Error;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// API error wrapper that converts core errors to HTTP responses
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError(err)
    }
}

/// JSON error response body
#[derive(Debug, Clone, Serialize)]
struct ErrorResponse {
    error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match &self.0 {
            Error::InvalidArgument(msg) => {
                (StatusCode::BAD_REQUEST, "invalid_argument", Some(msg.clone()))
            }
            Error::MalformedRecord(msg) => {
                tracing::error!(error = %msg, "malformed upstream feed");
                (StatusCode::BAD_GATEWAY, "malformed_feed", Some(msg.clone()))
            }
            Error::Fetch(msg) => {
                tracing::error!(error = %msg, "feed fetch failed");
                (
                    StatusCode::BAD_GATEWAY,
                    "fetch_failed",
                    Some("Failed to fetch the upstream feed".to_string()),
                )
            }
            Error::Http(err) => {
                tracing::error!(error = %err, "feed fetch failed");
                (
                    StatusCode::BAD_GATEWAY,
                    "fetch_failed",
                    Some("Failed to fetch the upstream feed".to_string()),
                )
            }
            Error::Storage(err) => {
                tracing::error!(error = %err, "storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "storage_unavailable",
                    Some("A storage error occurred".to_string()),
                )
            }
            err => {
                tracing::error!(error = %err, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    Some("An internal error occurred".to_string()),
                )
            }
        };

        let body = ErrorResponse { error, message };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_argument_is_bad_request() {
        let response = ApiError(Error::InvalidArgument("bad label".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_malformed_feed_is_bad_gateway() {
        let response = ApiError(Error::MalformedRecord("no features".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_other_errors_are_internal() {
        let response = ApiError(Error::Other("boom".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
