//! core types for opsdesk - a role-based multi-tenant CRUD backend.
//!
//! this crate provides the fundamental data structures used throughout opsdesk:
//! - [`field`]: declarative per-field metadata driving validation, coercion,
//!   filtering and sorting
//! - [`schema`]: the per-entity field registries
//! - [`principal`]: the authenticated caller attached to a request
//! - [`config`]: application configuration

#![warn(missing_docs)]

mod config;
mod error;
/// field descriptors and coerced values.
pub mod field;
mod principal;
/// per-entity field metadata registries.
pub mod schema;

pub use config::{AuthConfig, Config, DatabaseConfig, RateConfig, UploadConfig};
pub use error::Error;
pub use field::{
    DateWindow, EndOnly, EntitySchema, FieldDescriptor, FieldKind, FieldValue, FileKind,
    ForeignKey, Pattern, RecordInput,
};
pub use principal::Principal;

/// result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;
