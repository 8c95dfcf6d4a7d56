//! classified error taxonomy shared by every opsdesk crate.
//!
//! each variant carries the HTTP status it maps to at the boundary; only the
//! outermost handler layer turns one of these into a wire response.

use thiserror::Error;

/// classified service error.
///
/// internal components raise these; the server crate owns the conversion to
/// the `{status, message}` wire envelope.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
    /// malformed input, missing required field, invalid id or query parameter. HTTP 400.
    #[error("{0}")]
    BadRequest(String),

    /// missing, invalid, expired or revoked credentials. HTTP 401.
    #[error("{0}")]
    Unauthorized(String),

    /// authenticated principal lacking the required privilege. HTTP 403.
    #[error("{0}")]
    Forbidden(String),

    /// referenced resource or parent absent. HTTP 404.
    #[error("{0}")]
    NotFound(String),

    /// uniqueness violation. HTTP 409.
    #[error("{0}")]
    Conflict(String),

    /// caller exceeded a rate window. HTTP 429.
    #[error("{0}")]
    TooManyRequests(String),

    /// unexpected or uncategorized failure, including storage surprises. HTTP 500.
    #[error("{0}")]
    Internal(String),
}

impl Error {
    /// construct a 400 error.
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    /// construct a 401 error.
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    /// construct a 403 error.
    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    /// construct a 404 error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// construct a 409 error.
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// construct a 500 error.
    pub fn internal(msg: impl std::fmt::Display) -> Self {
        Self::Internal(msg.to_string())
    }

    /// numeric HTTP status for this error.
    pub fn status(&self) -> u16 {
        match self {
            Error::BadRequest(_) => 400,
            Error::Unauthorized(_) => 401,
            Error::Forbidden(_) => 403,
            Error::NotFound(_) => 404,
            Error::Conflict(_) => 409,
            Error::TooManyRequests(_) => 429,
            Error::Internal(_) => 500,
        }
    }

    /// rebuild an error from a raw status code and message.
    ///
    /// used by the validation aggregator, which collects `(status, message)`
    /// pairs before deciding which status wins.
    pub fn from_status(status: u16, msg: impl Into<String>) -> Self {
        match status {
            400 => Self::BadRequest(msg.into()),
            401 => Self::Unauthorized(msg.into()),
            403 => Self::Forbidden(msg.into()),
            404 => Self::NotFound(msg.into()),
            409 => Self::Conflict(msg.into()),
            429 => Self::TooManyRequests(msg.into()),
            _ => Self::Internal(msg.into()),
        }
    }
}
