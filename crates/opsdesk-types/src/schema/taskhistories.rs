//! field registry for task phase-change audit rows.

use crate::field::{EntitySchema, FieldDescriptor, Pattern};

const FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::text("name")
        .required()
        .unique()
        .len(1, 191)
        .pattern(Pattern::SafeText),
    FieldDescriptor::parent("task", "tasks").required().mandatory_filter(),
    FieldDescriptor::parent("fromPhase", "phases"),
    FieldDescriptor::parent("toPhase", "phases").required(),
    FieldDescriptor::parent("changedBy", "users").required(),
];

/// schema for the `taskhistories` entity. append-only audit trail.
pub static SCHEMA: EntitySchema = EntitySchema {
    entity: "taskhistories",
    fields: FIELDS,
    extra_sort_keys: &[],
    date_window: None,
    bulk_scope: Some("task"),
};
