//! field registry for transaction pipeline stages.

use crate::field::{EntitySchema, FieldDescriptor, Pattern};

const FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::number("dataOrder").len(1, 3),
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
    FieldDescriptor::text("color").len(4, 9).pattern(Pattern::SafeText),
];

/// schema for the `stages` entity.
pub static SCHEMA: EntitySchema = EntitySchema {
    entity: "stages",
    fields: FIELDS,
    extra_sort_keys: &[],
    date_window: None,
    bulk_scope: None,
};
