//! the HTTP error boundary.
//!
//! every internal component raises a classified [`opsdesk_types::Error`];
//! this wrapper is the single place that turns one into the
//! `{status, message}` wire envelope. internal errors are logged and
//! replaced with a fixed message.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::error;

/// handler-level error carrying the classified service error.
#[derive(Debug)]
pub struct ApiError(pub opsdesk_types::Error);

impl From<opsdesk_types::Error> for ApiError {
    fn from(err: opsdesk_types::Error) -> Self {
        Self(err)
    }
}

impl From<opsdesk_db::Error> for ApiError {
    fn from(err: opsdesk_db::Error) -> Self {
        Self(err.into())
    }
}

impl From<opsdesk_auth::AuthError> for ApiError {
    fn from(err: opsdesk_auth::AuthError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("internal error: {}", self.0);
            "Internal Server Error".to_string()
        } else {
            self.0.to_string()
        };
        let body = json!({
            "status": status.as_u16(),
            "message": message,
        });
        (status, Json(body)).into_response()
    }
}
