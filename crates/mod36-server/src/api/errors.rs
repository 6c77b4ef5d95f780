//! Error handling for the Mod36 API
//!
//! Every error leaves the server as
//! `{"error": msg, "errorDetails": {"errorCode", "errorMessage"}}`.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use mod36_core::{ErrorKind, FlowError};
use serde_json::json;
use tracing::{error, warn};

/// API Error type for returning standard error responses
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400): body is not usable JSON
    BadRequest(String),
    /// Well-formed JSON that does not fit the flow input (400)
    InvalidInput(String),
    /// Not found (404)
    NotFound(String),
    /// Failed flow run, mapped by its kind
    Flow(FlowError),
}

impl From<FlowError> for ApiError {
    fn from(err: FlowError) -> Self {
        ApiError::Flow(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            // Missing fields and wrong types are input problems, not transport ones
            JsonRejection::JsonDataError(err) => ApiError::InvalidInput(err.body_text()),
            other => ApiError::BadRequest(other.body_text()),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            ApiError::InvalidInput(msg) => write!(f, "Invalid Input: {}", msg),
            ApiError::Flow(err) => write!(f, "Flow Error: {}", err),
        }
    }
}

/// Status code and error code for a flow failure
pub fn flow_error_status(kind: ErrorKind) -> (StatusCode, &'static str) {
    match kind {
        ErrorKind::InvalidInput => (StatusCode::BAD_REQUEST, "ERR_INVALID_INPUT"),
        ErrorKind::EmptyOrInvalidOutput => (StatusCode::BAD_GATEWAY, "ERR_EMPTY_OR_INVALID_OUTPUT"),
        ErrorKind::BackendUnavailable => (StatusCode::SERVICE_UNAVAILABLE, "ERR_BACKEND_UNAVAILABLE"),
        ErrorKind::Definition => (StatusCode::INTERNAL_SERVER_ERROR, "ERR_INTERNAL_SERVER_ERROR"),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match &self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "ERR_BAD_REQUEST", msg.clone(), None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "ERR_NOT_FOUND", msg.clone(), None),
            ApiError::InvalidInput(msg) => {
                warn!(error = %msg, "Request body does not match flow input");
                (StatusCode::BAD_REQUEST, "ERR_INVALID_INPUT", msg.clone(), None)
            }
            ApiError::Flow(err) => {
                let (status, code) = flow_error_status(err.kind());
                if status.is_server_error() {
                    error!(error = %err, code, "Flow failed");
                } else {
                    warn!(error = %err, code, "Flow rejected input");
                }
                let details = match err {
                    FlowError::InvalidInput { violations, .. } if !violations.is_empty() => {
                        Some(json!({ "violations": violations }))
                    }
                    _ => None,
                };
                (status, code, err.user_message(), details)
            }
        };

        let mut body = json!({
            "error": message,
            "errorDetails": {
                "errorCode": error_code,
                "errorMessage": message,
            }
        });
        if let Some(details) = details {
            body["errorDetails"]["details"] = details;
        }

        (status, Json(body)).into_response()
    }
}
