//! the generic CRUD engine for opsdesk.
//!
//! one engine, many entities: everything here dispatches on the declarative
//! [`EntitySchema`](opsdesk_types::EntitySchema) registries instead of
//! per-entity code.
//!
//! - [`coerce`]: raw request input → typed, validated values
//! - [`query`]: pagination/search/sort/filter parameters → a structured query
//! - [`list`]: query execution with foreign-key includes and the list envelope
//! - [`pipeline`]: validated create/update/delete with uniqueness,
//!   foreign-key and file handling
//! - [`files`]: uploaded-file bookkeeping and the storage seam

#![warn(missing_docs)]

/// validation and coercion of raw input values.
pub mod coerce;
/// uploaded-file tracking and the file storage contract.
pub mod files;
/// list execution and wire serialization.
pub mod list;
/// create/update/delete pipelines.
pub mod pipeline;
/// list-parameter parsing and filter construction.
pub mod query;
mod resource;

pub use files::{FileStore, UploadedFiles, discard_uploads};
pub use list::ListPage;
pub use resource::Resource;

/// convert a camelCase wire name to its snake_case column name.
pub(crate) fn snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for ch in name.chars() {
        if ch.is_ascii_uppercase() {
            out.push('_');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// snake_case column name of a foreign-key field ("author" → "author_id").
pub(crate) fn fk_column_name(field: &str) -> String {
    format!("{}_id", snake_case(field))
}

/// camelCase wire key of a foreign-key id ("author" → "authorId").
pub(crate) fn fk_wire_key(field: &str) -> String {
    format!("{field}Id")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snake_case_handles_wire_names() {
        assert_eq!(snake_case("updatedAt"), "updated_at");
        assert_eq!(snake_case("name"), "name");
        assert_eq!(snake_case("name_en"), "name_en");
        assert_eq!(fk_column_name("fromPhase"), "from_phase_id");
        assert_eq!(fk_wire_key("changedBy"), "changedById");
    }
}
