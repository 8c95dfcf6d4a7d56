//! field registry for access roles.

use crate::field::{EntitySchema, FieldDescriptor, Pattern};

const FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::text("name")
        .required()
        .unique()
        .searchable()
        .len(1, 191)
        .pattern(Pattern::SafeText),
    FieldDescriptor::text("description")
        .required()
        .searchable()
        .len(1, 191)
        .pattern(Pattern::SafeText),
    FieldDescriptor::flag("status"),
];

/// schema for the `roles` entity.
pub static SCHEMA: EntitySchema = EntitySchema {
    entity: "roles",
    fields: FIELDS,
    extra_sort_keys: &[],
    date_window: None,
    bulk_scope: None,
};
