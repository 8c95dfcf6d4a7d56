//! field registry for billing transactions.

use crate::field::{EntitySchema, FieldDescriptor, Pattern};

const FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::text("name")
        .required()
        .searchable()
        .len(1, 191)
        .pattern(Pattern::SafeText),
    // user is forced to the acting principal on create and preserved on update
    FieldDescriptor::parent("user", "users").required(),
    FieldDescriptor::parent("client", "clients").required().mandatory_filter(),
    FieldDescriptor::parent("stage", "stages").required(),
    FieldDescriptor::parent("currency", "currencies").required(),
    // digit-count bounds: anything from single units to 18-digit minor units
    FieldDescriptor::bigint("amount").required().len(1, 18),
    FieldDescriptor::stamp("transactionDate").required(),
];

const SORT_KEYS: &[&str] = &[
    "client.name",
    "stage.name",
    "stage.name_en",
    "stage.name_de",
    "stage.name_nl",
    "stage.name_id",
    "stage.name_ph",
    "currency.name",
];

/// schema for the `transactions` entity.
pub static SCHEMA: EntitySchema = EntitySchema {
    entity: "transactions",
    fields: FIELDS,
    extra_sort_keys: SORT_KEYS,
    date_window: None,
    bulk_scope: None,
};
