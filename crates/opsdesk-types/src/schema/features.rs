//! field registry for access-controlled features.

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
    // provisioning defaults copied into privileges when a role is seeded
    FieldDescriptor::flag("featureCreate"),
    FieldDescriptor::flag("featureRead"),
    FieldDescriptor::flag("featureUpdate"),
    FieldDescriptor::flag("featureDelete"),
];

/// schema for the `features` entity.
pub static SCHEMA: EntitySchema = EntitySchema {
    entity: "features",
    fields: FIELDS,
    extra_sort_keys: &[],
    date_window: None,
    bulk_scope: None,
};
