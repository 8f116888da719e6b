//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::{DomainError, ErrorKind};

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Malformed request the domain never saw.
    BadRequest(String),
    /// Error raised by a command or query.
    Domain(DomainError),
}

impl ApiError {
    /// Returns the status code this error is reported with.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Domain(err) => status_for(err.kind()),
        }
    }
}

/// Maps an error kind onto its HTTP status.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::InvalidTransition | ErrorKind::Inactive | ErrorKind::Conflict => {
            StatusCode::CONFLICT
        }
        ErrorKind::InsufficientStock => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::Infrastructure => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (kind, message) = match self {
            ApiError::BadRequest(msg) => (ErrorKind::Validation, msg),
            ApiError::Domain(err) => (err.kind(), err.to_string()),
        };

        if status.is_server_error() {
            tracing::error!(error = %message, "internal server error");
        }

        let body = serde_json::json!({ "error": message, "kind": kind.as_str() });
        (status, axum::Json(body)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::Domain(err)
    }
}

impl From<common::MoneyError> for ApiError {
    fn from(err: common::MoneyError) -> Self {
        ApiError::Domain(err.into())
    }
}

impl From<common::AddressError> for ApiError {
    fn from(err: common::AddressError) -> Self {
        ApiError::Domain(err.into())
    }
}
