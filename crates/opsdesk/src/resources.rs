//! the entity roster: one [`Resource`] implementation per CRUD-managed
//! entity, plus the HTTP-level delete-gating rules.
//!
//! most entities are fully described by their schema registry and the
//! generated `from_record`/`apply_record` constructors; tasks and
//! transactions additionally override sorting to honor their joined
//! sort keys with deterministic tie-breaks.

use sea_orm::{IntoActiveModel, JoinType, Order, QueryOrder, QuerySelect, RelationTrait, Select};

use opsdesk_db::entity;
use opsdesk_engine::{Resource, query::order_by_column};
use opsdesk_types::{EntitySchema, RecordInput, Result, schema};

/// HTTP-facing rules layered on top of the engine's [`Resource`].
pub trait HttpResource: Resource {
    /// refuse to delete the final remaining row (configuration entities).
    const GUARD_LAST_ROW: bool = false;
    /// deletes require an administrative role.
    const ADMIN_DELETE: bool = false;
}

macro_rules! resource {
    ($name:ident, $module:ident, $schema:ident) => {
        /// marker type wiring one entity into the generic engine.
        pub struct $name;

        impl Resource for $name {
            type Entity = entity::$module::Entity;
            type Model = entity::$module::Model;
            type Column = entity::$module::Column;
            type Pk = entity::$module::PrimaryKey;
            type Active = entity::$module::ActiveModel;

            fn schema() -> &'static EntitySchema {
                &schema::$schema::SCHEMA
            }

            fn insert_model(input: &RecordInput) -> Self::Active {
                entity::$module::ActiveModel::from_record(input)
            }

            fn update_model(existing: Self::Model, input: &RecordInput) -> Self::Active {
                existing.into_active_model().apply_record(input)
            }
        }
    };
}

resource!(Roles, roles, roles);
resource!(Features, features, features);
resource!(Privileges, privileges, privileges);
resource!(Users, users, users);
resource!(Priorities, priorities, priorities);
resource!(Phases, phases, phases);
resource!(TaskHistories, task_histories, taskhistories);
resource!(Events, events, events);
resource!(Schedules, schedules, schedules);
resource!(Clients, clients, clients);
resource!(Stages, stages, stages);
resource!(Currencies, currencies, currencies);
resource!(TransactionHistories, transaction_histories, transactionhistories);

impl HttpResource for Roles {
    const GUARD_LAST_ROW: bool = true;
}
impl HttpResource for Features {
    const GUARD_LAST_ROW: bool = true;
}
impl HttpResource for Privileges {
    const GUARD_LAST_ROW: bool = true;
}
impl HttpResource for Users {
    const ADMIN_DELETE: bool = true;
}
impl HttpResource for Priorities {}
impl HttpResource for Phases {}
impl HttpResource for TaskHistories {}
impl HttpResource for Events {}
impl HttpResource for Schedules {}
impl HttpResource for Clients {}
impl HttpResource for Stages {}
impl HttpResource for Currencies {}
impl HttpResource for TransactionHistories {}

/// marker type wiring the tasks entity into the generic engine.
pub struct Tasks;

impl Resource for Tasks {
    type Entity = entity::tasks::Entity;
    type Model = entity::tasks::Model;
    type Column = entity::tasks::Column;
    type Pk = entity::tasks::PrimaryKey;
    type Active = entity::tasks::ActiveModel;

    fn schema() -> &'static EntitySchema {
        &schema::tasks::SCHEMA
    }

    fn insert_model(input: &RecordInput) -> Self::Active {
        entity::tasks::ActiveModel::from_record(input)
    }

    fn update_model(existing: Self::Model, input: &RecordInput) -> Self::Active {
        existing.into_active_model().apply_record(input)
    }

    fn sort_select(
        select: Select<Self::Entity>,
        key: &str,
        order: Order,
    ) -> Result<Select<Self::Entity>> {
        use entity::tasks::Column;
        // board sorts proxy through the fk ids (priority/phase ids follow
        // their display order) with deterministic tie-breaks
        Ok(if key.starts_with("priority.name") {
            select
                .order_by(Column::PriorityId, order)
                .order_by(Column::Name, Order::Asc)
                .order_by(Column::PhaseId, Order::Asc)
        } else if key.starts_with("phase.name") {
            select
                .order_by(Column::PhaseId, order)
                .order_by(Column::Name, Order::Asc)
                .order_by(Column::PriorityId, Order::Desc)
        } else if key == "name" {
            select
                .order_by(Column::Name, order)
                .order_by(Column::PriorityId, Order::Desc)
                .order_by(Column::PhaseId, Order::Asc)
        } else {
            return order_by_column::<Self::Entity>(select, key, order);
        })
    }
}

impl HttpResource for Tasks {
    const ADMIN_DELETE: bool = true;
}

/// marker type wiring the transactions entity into the generic engine.
pub struct Transactions;

impl Resource for Transactions {
    type Entity = entity::transactions::Entity;
    type Model = entity::transactions::Model;
    type Column = entity::transactions::Column;
    type Pk = entity::transactions::PrimaryKey;
    type Active = entity::transactions::ActiveModel;

    fn schema() -> &'static EntitySchema {
        &schema::transactions::SCHEMA
    }

    fn insert_model(input: &RecordInput) -> Self::Active {
        entity::transactions::ActiveModel::from_record(input)
    }

    fn update_model(existing: Self::Model, input: &RecordInput) -> Self::Active {
        existing.into_active_model().apply_record(input)
    }

    fn sort_select(
        select: Select<Self::Entity>,
        key: &str,
        order: Order,
    ) -> Result<Select<Self::Entity>> {
        use entity::transactions::{Column, Relation};

        let tie = |s: Select<Self::Entity>| {
            s.order_by(Column::TransactionDate, Order::Desc)
                .order_by(Column::Amount, Order::Desc)
        };

        Ok(match key {
            "client.name" => tie(select
                .join(JoinType::LeftJoin, Relation::Client.def())
                .order_by(entity::clients::Column::Name, order)),
            "currency.name" => tie(select
                .join(JoinType::LeftJoin, Relation::Currency.def())
                .order_by(entity::currencies::Column::Name, order)),
            k if k.starts_with("stage.name") => {
                let column = match k.strip_prefix("stage.name").unwrap_or_default() {
                    "_en" => entity::stages::Column::NameEn,
                    "_de" => entity::stages::Column::NameDe,
                    "_nl" => entity::stages::Column::NameNl,
                    "_id" => entity::stages::Column::NameId,
                    "_ph" => entity::stages::Column::NamePh,
                    _ => entity::stages::Column::Name,
                };
                tie(select
                    .join(JoinType::LeftJoin, Relation::Stage.def())
                    .order_by(column, order))
            }
            "name" => tie(select.order_by(Column::Name, order)),
            _ => return order_by_column::<Self::Entity>(select, key, order),
        })
    }
}

impl HttpResource for Transactions {
    const ADMIN_DELETE: bool = true;
}
