//! field registry for the token revocation list.

use crate::field::{EntitySchema, FieldDescriptor, Pattern};

const FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::text("token")
        .required()
        .unique()
        .searchable()
        .len(1, 3000)
        .pattern(Pattern::SafeText),
];

/// schema for the `blacklists` entity. insert-only; rows are never updated.
pub static SCHEMA: EntitySchema = EntitySchema {
    entity: "blacklists",
    fields: FIELDS,
    extra_sort_keys: &[],
    date_window: None,
    bulk_scope: None,
};
