//! field registry for billing clients.

use crate::field::{EntitySchema, FieldDescriptor, Pattern};

const FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::text("name")
        .required()
        .searchable()
        .len(1, 191)
        .pattern(Pattern::SafeText),
    FieldDescriptor::text("email")
        .unique()
        .searchable()
        .len(5, 191)
        .pattern(Pattern::Email),
    FieldDescriptor::text("phone")
        .searchable()
        .len(6, 32)
        .pattern(Pattern::Phone),
    FieldDescriptor::text("country").searchable().pattern(Pattern::SafeText),
    FieldDescriptor::text("state").searchable().pattern(Pattern::SafeText),
    FieldDescriptor::text("city").searchable().pattern(Pattern::SafeText),
    FieldDescriptor::text("zip").searchable().len(1, 16).pattern(Pattern::SafeText),
    FieldDescriptor::text("address").searchable().pattern(Pattern::SafeText),
];

/// schema for the `clients` entity.
pub static SCHEMA: EntitySchema = EntitySchema {
    entity: "clients",
    fields: FIELDS,
    extra_sort_keys: &[],
    date_window: None,
    bulk_scope: None,
};
