//! task entity for database storage.

use chrono::{DateTime, Utc};
use sea_orm::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use opsdesk_types::RecordInput;

/// task database model.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tasks")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub author_id: i64,
    pub assignee_id: Option<i64>,
    pub priority_id: i64,
    pub phase_id: i64,
    pub start: Option<DateTime<Utc>>,
    pub deadline: Option<DateTime<Utc>>,
    /// stored path of the attached image, if any.
    pub image: Option<String>,
    /// stored path of the attached document, if any.
    pub document: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::AuthorId",
        to = "super::users::Column::Id"
    )]
    Author,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::AssigneeId",
        to = "super::users::Column::Id"
    )]
    Assignee,
    #[sea_orm(
        belongs_to = "super::priorities::Entity",
        from = "Column::PriorityId",
        to = "super::priorities::Column::Id"
    )]
    Priority,
    #[sea_orm(
        belongs_to = "super::phases::Entity",
        from = "Column::PhaseId",
        to = "super::phases::Column::Id"
    )]
    Phase,
    #[sea_orm(has_many = "super::task_histories::Entity")]
    Histories,
}

impl Related<super::priorities::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Priority.def()
    }
}

impl Related<super::phases::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Phase.def()
    }
}

impl Related<super::task_histories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Histories.def()
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
                "description" => self.description = Set(value.as_text().map(str::to_string)),
                "author" => {
                    if let Some(v) = value.as_int() {
                        self.author_id = Set(v);
                    }
                }
                "assignee" => self.assignee_id = Set(value.as_int()),
                "priority" => {
                    if let Some(v) = value.as_int() {
                        self.priority_id = Set(v);
                    }
                }
                "phase" => {
                    if let Some(v) = value.as_int() {
                        self.phase_id = Set(v);
                    }
                }
                "start" => self.start = Set(value.as_stamp()),
                "deadline" => self.deadline = Set(value.as_stamp()),
                "image" => self.image = Set(value.as_text().map(str::to_string)),
                "document" => self.document = Set(value.as_text().map(str::to_string)),
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
