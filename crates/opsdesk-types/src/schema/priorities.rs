//! field registry for task priorities.

use crate::field::{EntitySchema, FieldDescriptor, Pattern};

const FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::text("name")
        .required()
        .unique()
        .searchable()
        .len(1, 191)
        .pattern(Pattern::SafeText),
    FieldDescriptor::text("name_en").searchable(),
    FieldDescriptor::text("name_de"),
    FieldDescriptor::text("name_nl"),
    FieldDescriptor::text("name_id"),
    FieldDescriptor::text("name_ph"),
];

/// schema for the `priorities` entity.
pub static SCHEMA: EntitySchema = EntitySchema {
    entity: "priorities",
    fields: FIELDS,
    extra_sort_keys: &[],
    date_window: None,
    bulk_scope: None,
};
