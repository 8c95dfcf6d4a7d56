//! error types for opsdesk-db.

use thiserror::Error;

/// errors that can occur in the persistence gateway.
#[derive(Debug, Error)]
pub enum Error {
    /// the underlying database rejected or failed an operation.
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// a schema field name did not resolve to a column of the entity.
    #[error("unknown column for field '{0}'")]
    UnknownColumn(String),

    /// a parent entity name did not resolve to a loadable entity.
    #[error("unknown parent entity '{0}'")]
    UnknownParent(String),

    /// a stored row failed to serialize to wire JSON.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl From<Error> for opsdesk_types::Error {
    fn from(err: Error) -> Self {
        match err {
            // unique/foreign-key constraint violations surface from the
            // check-then-write race; classify them as conflicts, not 500s
            Error::Database(sea_orm::DbErr::Exec(e)) if is_constraint(&e.to_string()) => {
                opsdesk_types::Error::conflict("constraint violation")
            }
            Error::Database(sea_orm::DbErr::Query(e)) if is_constraint(&e.to_string()) => {
                opsdesk_types::Error::conflict("constraint violation")
            }
            other => opsdesk_types::Error::internal(other),
        }
    }
}

fn is_constraint(message: &str) -> bool {
    let lower = message.to_ascii_lowercase();
    lower.contains("unique constraint") || lower.contains("foreign key constraint")
}
