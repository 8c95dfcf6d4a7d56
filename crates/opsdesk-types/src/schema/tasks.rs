//! field registry for tasks.

use crate::field::{DateWindow, EndOnly, EntitySchema, FieldDescriptor, Pattern};

const FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::text("name")
        .required()
        .searchable()
        .len(1, 191)
        .pattern(Pattern::SafeText),
    FieldDescriptor::text("description")
        .searchable()
        .len(1, 3000)
        .pattern(Pattern::SafeText),
    // author is forced to the acting principal on create and preserved on update
    FieldDescriptor::parent("author", "users").required(),
    FieldDescriptor::parent("assignee", "users"),
    FieldDescriptor::parent("priority", "priorities").required(),
    FieldDescriptor::parent("phase", "phases").required(),
    FieldDescriptor::stamp("start"),
    FieldDescriptor::stamp("deadline"),
    FieldDescriptor::text("image").image(),
    FieldDescriptor::text("document").document(),
];

const SORT_KEYS: &[&str] = &[
    "priority.name",
    "priority.name_en",
    "priority.name_de",
    "priority.name_nl",
    "priority.name_id",
    "priority.name_ph",
    "phase.name",
    "phase.name_en",
    "phase.name_de",
    "phase.name_nl",
    "phase.name_id",
    "phase.name_ph",
];

/// schema for the `tasks` entity.
pub static SCHEMA: EntitySchema = EntitySchema {
    entity: "tasks",
    fields: FIELDS,
    extra_sort_keys: SORT_KEYS,
    date_window: Some(DateWindow {
        start_param: "start",
        end_param: "deadline",
        start_column: "start",
        end_only: EndOnly::ClampStart,
    }),
    bulk_scope: None,
};
