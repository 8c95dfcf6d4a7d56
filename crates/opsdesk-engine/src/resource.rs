//! the per-entity hook the generic engine runs through.

use std::str::FromStr;

use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, EntityTrait, FromQueryResult,
    IntoActiveModel, ModelTrait, Order, PrimaryKeyToColumn, PrimaryKeyTrait, Select,
};
use serde::Serialize;

use opsdesk_types::{EntitySchema, RecordInput, Result};

use crate::query::order_by_column;

/// one CRUD-managed entity as seen by the generic engine.
///
/// the associated types pin the sea-orm entity family down to what the
/// engine needs (serializable models, string-resolvable columns, i64 keys);
/// the methods supply the only two things that cannot be derived from the
/// schema registry - active-model construction and joined-field sorting.
pub trait Resource: Send + Sync + 'static {
    /// the sea-orm entity.
    type Entity: EntityTrait<Model = Self::Model, Column = Self::Column, PrimaryKey = Self::Pk>;
    /// the row model, serializable to wire JSON.
    type Model: ModelTrait<Entity = Self::Entity>
        + FromQueryResult
        + Serialize
        + IntoActiveModel<Self::Active>
        + Send
        + Sync;
    /// columns, resolvable from snake_case names.
    type Column: ColumnTrait + FromStr;
    /// i64 primary key.
    type Pk: PrimaryKeyTrait<ValueType = i64> + PrimaryKeyToColumn<Column = Self::Column>;
    /// the active model used for writes.
    type Active: ActiveModelTrait<Entity = Self::Entity> + ActiveModelBehavior + Send + 'static;

    /// the entity's field metadata.
    fn schema() -> &'static EntitySchema;

    /// build an active model for insert from validated values.
    fn insert_model(input: &RecordInput) -> Self::Active;

    /// fold validated values over an existing row for update.
    fn update_model(existing: Self::Model, input: &RecordInput) -> Self::Active;

    /// apply a validated sort key to a select.
    ///
    /// the default handles the entity's own columns; entities with joined
    /// sort keys override this to add their joins and tie-breaks.
    fn sort_select(
        select: Select<Self::Entity>,
        key: &str,
        order: Order,
    ) -> Result<Select<Self::Entity>> {
        order_by_column::<Self::Entity>(select, key, order)
    }
}
