//! field registry for role/feature privilege rows.

use crate::field::{EntitySchema, FieldDescriptor, Pattern};

const FIELDS: &[FieldDescriptor] = &[
    // seeded with a generated uuid; unique so each (role, feature) pair gets
    // exactly one row per provisioning pass
    FieldDescriptor::text("name")
        .required()
        .unique()
        .len(1, 191)
        .pattern(Pattern::SafeText),
    FieldDescriptor::parent("role", "roles")
        .required()
        .mandatory_filter(),
    FieldDescriptor::parent("feature", "features").required(),
    FieldDescriptor::flag("privilegeCreate"),
    FieldDescriptor::flag("privilegeRead"),
    FieldDescriptor::flag("privilegeUpdate"),
    FieldDescriptor::flag("privilegeDelete"),
];

/// schema for the `privileges` entity.
pub static SCHEMA: EntitySchema = EntitySchema {
    entity: "privileges",
    fields: FIELDS,
    extra_sort_keys: &[],
    date_window: None,
    // a bulk delete must stay inside one role's privilege set
    bulk_scope: Some("role"),
};
