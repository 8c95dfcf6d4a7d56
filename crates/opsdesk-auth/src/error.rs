//! error types for opsdesk-auth.

use thiserror::Error;

/// errors that can occur during token or password handling.
#[derive(Debug, Error)]
pub enum AuthError {
    /// the token's signature is valid but it has expired.
    #[error("token expired")]
    TokenExpired,

    /// the token is structurally invalid.
    #[error("malformed token")]
    TokenMalformed,

    /// any other verification failure (wrong signature, bad claims).
    #[error("token verification failed: {0}")]
    TokenInvalid(String),

    /// hashing or hash-parsing failure.
    #[error("crypto error: {0}")]
    Crypto(String),
}

impl From<AuthError> for opsdesk_types::Error {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::TokenExpired => opsdesk_types::Error::unauthorized("Token expired"),
            AuthError::TokenMalformed => opsdesk_types::Error::unauthorized("Malformed token"),
            AuthError::TokenInvalid(_) => opsdesk_types::Error::unauthorized("Access Denied"),
            AuthError::Crypto(e) => opsdesk_types::Error::internal(e),
        }
    }
}
