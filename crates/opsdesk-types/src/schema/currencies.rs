//! field registry for currencies.

use crate::field::{EntitySchema, FieldDescriptor, Pattern};

const FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::text("name")
        .required()
        .unique()
        .searchable()
        .len(1, 191)
        .pattern(Pattern::SafeText),
    FieldDescriptor::text("symbol")
        .required()
        .searchable()
        .len(1, 8)
        .pattern(Pattern::SafeText),
];

/// schema for the `currencies` entity.
pub static SCHEMA: EntitySchema = EntitySchema {
    entity: "currencies",
    fields: FIELDS,
    extra_sort_keys: &[],
    date_window: None,
    bulk_scope: None,
};
