//! field registry for transaction stage/client/currency audit rows.

use crate::field::{EntitySchema, FieldDescriptor, Pattern};

const FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::text("name")
        .required()
        .unique()
        .len(1, 191)
        .pattern(Pattern::SafeText),
    FieldDescriptor::parent("transaction", "transactions")
        .required()
        .mandatory_filter(),
    FieldDescriptor::parent("fromStage", "stages"),
    FieldDescriptor::parent("toStage", "stages").required(),
    FieldDescriptor::parent("fromClient", "clients"),
    FieldDescriptor::parent("toClient", "clients").required(),
    FieldDescriptor::parent("fromCurrency", "currencies"),
    FieldDescriptor::parent("toCurrency", "currencies").required(),
    FieldDescriptor::parent("changedBy", "users").required(),
];

/// schema for the `transactionhistories` entity. append-only audit trail.
pub static SCHEMA: EntitySchema = EntitySchema {
    entity: "transactionhistories",
    fields: FIELDS,
    extra_sort_keys: &[],
    date_window: None,
    bulk_scope: Some("transaction"),
};
