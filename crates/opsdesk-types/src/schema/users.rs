//! field registry for system users.

use crate::field::{EntitySchema, FieldDescriptor, Pattern};

const FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::text("photo").image(),
    FieldDescriptor::parent("role", "roles").required(),
    FieldDescriptor::text("name")
        .required()
        .searchable()
        .len(1, 191)
        .pattern(Pattern::SafeText),
    FieldDescriptor::text("email")
        .required()
        .unique()
        .searchable()
        .len(5, 191)
        .pattern(Pattern::Email),
    FieldDescriptor::text("password").required().hashed().hidden().len(8, 191),
    FieldDescriptor::text("phone")
        .required()
        .searchable()
        .len(6, 32)
        .pattern(Pattern::Phone),
    FieldDescriptor::text("address")
        .searchable()
        .len(1, 191)
        .pattern(Pattern::SafeText),
];

/// schema for the `users` entity.
pub static SCHEMA: EntitySchema = EntitySchema {
    entity: "users",
    fields: FIELDS,
    extra_sort_keys: &[],
    date_window: None,
    bulk_scope: None,
};
