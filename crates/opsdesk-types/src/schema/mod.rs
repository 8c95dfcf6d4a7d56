//! per-entity field metadata registries.
//!
//! one module per business entity, each exporting a `SCHEMA` static the
//! generic engine dispatches on. field order is meaningful: it fixes the
//! precedence of aggregated validation errors.

pub mod blacklists;
pub mod clients;
pub mod currencies;
pub mod events;
pub mod features;
pub mod phases;
pub mod priorities;
pub mod privileges;
pub mod roles;
pub mod schedules;
pub mod stages;
pub mod taskhistories;
pub mod tasks;
pub mod transactionhistories;
pub mod transactions;
pub mod users;

use crate::EntitySchema;

/// look up a schema by entity name.
pub fn by_entity(entity: &str) -> Option<&'static EntitySchema> {
    match entity {
        "blacklists" => Some(&blacklists::SCHEMA),
        "clients" => Some(&clients::SCHEMA),
        "currencies" => Some(&currencies::SCHEMA),
        "events" => Some(&events::SCHEMA),
        "features" => Some(&features::SCHEMA),
        "phases" => Some(&phases::SCHEMA),
        "priorities" => Some(&priorities::SCHEMA),
        "privileges" => Some(&privileges::SCHEMA),
        "roles" => Some(&roles::SCHEMA),
        "schedules" => Some(&schedules::SCHEMA),
        "stages" => Some(&stages::SCHEMA),
        "taskhistories" => Some(&taskhistories::SCHEMA),
        "tasks" => Some(&tasks::SCHEMA),
        "transactionhistories" => Some(&transactionhistories::SCHEMA),
        "transactions" => Some(&transactions::SCHEMA),
        "users" => Some(&users::SCHEMA),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_schema_is_registered_under_its_own_name() {
        for entity in [
            "blacklists",
            "clients",
            "currencies",
            "events",
            "features",
            "phases",
            "priorities",
            "privileges",
            "roles",
            "schedules",
            "stages",
            "taskhistories",
            "tasks",
            "transactionhistories",
            "transactions",
            "users",
        ] {
            let schema = by_entity(entity).expect(entity);
            assert_eq!(schema.entity, entity);
        }
        assert!(by_entity("bogus").is_none());
    }

    #[test]
    fn field_names_are_unique_per_schema() {
        for entity in ["tasks", "transactions", "users", "events"] {
            let schema = by_entity(entity).unwrap();
            for (i, field) in schema.fields.iter().enumerate() {
                assert!(
                    !schema.fields[..i].iter().any(|f| f.name == field.name),
                    "duplicate field {} in {}",
                    field.name,
                    entity
                );
            }
        }
    }
}
