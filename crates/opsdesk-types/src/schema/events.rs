//! field registry for calendar events.

use crate::field::{DateWindow, EndOnly, EntitySchema, FieldDescriptor, Pattern};

const FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::text("title")
        .required()
        .searchable()
        .len(1, 191)
        .pattern(Pattern::SafeText),
    FieldDescriptor::parent("user", "users").required(),
    FieldDescriptor::stamp("dataDate").required(),
    FieldDescriptor::text("startTime").required().pattern(Pattern::ClockTime).len(5, 5),
    FieldDescriptor::text("endTime").required().pattern(Pattern::ClockTime).len(5, 5),
    FieldDescriptor::stamp("startDateTime"),
    FieldDescriptor::stamp("endDateTime"),
];

/// schema for the `events` entity.
pub static SCHEMA: EntitySchema = EntitySchema {
    entity: "events",
    fields: FIELDS,
    extra_sort_keys: &[],
    date_window: Some(DateWindow {
        start_param: "startDateTime",
        end_param: "endDateTime",
        start_column: "startDateTime",
        end_only: EndOnly::Column("endDateTime"),
    }),
    bulk_scope: None,
};
