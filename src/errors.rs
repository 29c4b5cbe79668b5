use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

/// Failure kinds of a company lookup.
///
/// A lookup that finds nothing is not an error; it succeeds with `found: false`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// Caller input rejected before any network call.
    InvalidArgument(String),
    /// Request body exceeded the configured limit.
    PayloadTooLarge,
    /// Upstream credentials are not configured on this server.
    Misconfigured,
    /// Upstream answered with a non-200 status.
    UpstreamError {
        /// Status code returned by the registry.
        status: u16,
        /// Raw response body, kept for diagnostics.
        body: String,
    },
    /// Upstream never produced a response (connect failure, timeout).
    UpstreamUnavailable(String),
    /// Unexpected local failure.
    Internal(String),
}

impl AppError {
    /// Stable machine-readable kind, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::InvalidArgument(_) => "invalid_argument",
            AppError::PayloadTooLarge => "payload_too_large",
            AppError::Misconfigured => "misconfigured",
            AppError::UpstreamError { .. } => "upstream_error",
            AppError::UpstreamUnavailable(_) => "upstream_unavailable",
            AppError::Internal(_) => "internal",
        }
    }

    /// HTTP status code returned to callers for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Misconfigured => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::UpstreamError { .. } => StatusCode::BAD_GATEWAY,
            AppError::UpstreamUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            AppError::PayloadTooLarge => write!(f, "Request body too large"),
            AppError::Misconfigured => write!(f, "Server not configured"),
            AppError::UpstreamError { status, body } => {
                write!(f, "Zefix API returned status {}: {}", status, body)
            }
            AppError::UpstreamUnavailable(msg) => write!(f, "No response from Zefix API: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    /// Converts the error into the `{success: false, error, details?}` envelope.
    ///
    /// Failures are logged once, by the lookup span that produced them; the
    /// caller only gets a generic message plus upstream diagnostics.
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            AppError::InvalidArgument(msg) => json!({
                "success": false,
                "error": msg,
            }),
            AppError::PayloadTooLarge => json!({
                "success": false,
                "error": "Request body too large",
            }),
            AppError::Misconfigured => json!({
                "success": false,
                "error": "Server not configured",
            }),
            AppError::UpstreamError {
                status: upstream_status,
                body,
            } => json!({
                "success": false,
                "error": "Zefix API request failed",
                "details": {
                    "upstreamStatus": upstream_status,
                    "body": body,
                },
            }),
            AppError::UpstreamUnavailable(_) => json!({
                "success": false,
                "error": "No response from Zefix API",
            }),
            AppError::Internal(_) => json!({
                "success": false,
                "error": "Internal server error while calling Zefix API",
            }),
        };

        (status, Json(body)).into_response()
    }
}
