//! task phase-change audit entity for database storage.
//!
//! rows are appended on task creation and on every phase transition and are
//! never updated afterwards.

use chrono::{DateTime, Utc};
use sea_orm::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use opsdesk_types::RecordInput;

/// task history database model.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "task_histories")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub task_id: i64,
    /// null for the initial entry written at task creation.
    pub from_phase_id: Option<i64>,
    pub to_phase_id: i64,
    pub changed_by_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::tasks::Entity",
        from = "Column::TaskId",
        to = "super::tasks::Column::Id"
    )]
    Task,
    #[sea_orm(
        belongs_to = "super::phases::Entity",
        from = "Column::FromPhaseId",
        to = "super::phases::Column::Id"
    )]
    FromPhase,
    #[sea_orm(
        belongs_to = "super::phases::Entity",
        from = "Column::ToPhaseId",
        to = "super::phases::Column::Id"
    )]
    ToPhase,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::ChangedById",
        to = "super::users::Column::Id"
    )]
    ChangedBy,
}

impl Related<super::tasks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Task.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    /// fold validated engine values into this active model.
    pub fn apply_record(mut self, input: &RecordInput) -> Self {
        for (name, value) in input {
            match name.as_str() {
                "name" => {
                    if let Some(v) = value.as_text() {
                        self.name = Set(v.to_string());
                    }
                }
                "task" => {
                    if let Some(v) = value.as_int() {
                        self.task_id = Set(v);
                    }
                }
                "fromPhase" => self.from_phase_id = Set(value.as_int()),
                "toPhase" => {
                    if let Some(v) = value.as_int() {
                        self.to_phase_id = Set(v);
                    }
                }
                "changedBy" => {
                    if let Some(v) = value.as_int() {
                        self.changed_by_id = Set(v);
                    }
                }
                _ => {}
            }
        }
        self.updated_at = Set(Utc::now());
        self
    }

    /// fresh active model for insert.
    pub fn from_record(input: &RecordInput) -> Self {
        let mut model = Self {
            created_at: Set(Utc::now()),
            ..Default::default()
        };
        model = model.apply_record(input);
        model
    }
}
