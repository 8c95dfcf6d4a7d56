//! authentication and authorization primitives for opsdesk.
//!
//! this crate is pure decision logic with no HTTP or database access:
//! - [`token`]: signed session/action tokens with typed verification errors
//! - [`password`]: one-way password hashing (Argon2id)
//! - [`decision`]: the role → privilege → feature ALLOW/DENY check

#![warn(missing_docs)]

/// privilege decision functions.
pub mod decision;
mod error;
/// password hashing and verification.
pub mod password;
/// token issuance and verification.
pub mod token;

pub use error::AuthError;
pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenSubject, issue_short_token, issue_token, verify_token};

/// result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, AuthError>;
