//! schedule entity for database storage.

use chrono::{DateTime, Utc};
use sea_orm::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use opsdesk_types::RecordInput;

/// schedule database model.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "schedules")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    pub user_id: i64,
    /// calendar day the slot belongs to.
    pub data_date: DateTime<Utc>,
    /// wall-clock start, `HH:MM`.
    pub start_time: String,
    /// wall-clock end, `HH:MM`.
    pub end_time: String,
    pub start_date_time: Option<DateTime<Utc>>,
    pub end_date_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    /// fold validated engine values into this active model.
    pub fn apply_record(mut self, input: &RecordInput) -> Self {
        for (name, value) in input {
            match name.as_str() {
                "title" => {
                    if let Some(v) = value.as_text() {
                        self.title = Set(v.to_string());
                    }
                }
                "user" => {
                    if let Some(v) = value.as_int() {
                        self.user_id = Set(v);
                    }
                }
                "dataDate" => {
                    if let Some(v) = value.as_stamp() {
                        self.data_date = Set(v);
                    }
                }
                "startTime" => {
                    if let Some(v) = value.as_text() {
                        self.start_time = Set(v.to_string());
                    }
                }
                "endTime" => {
                    if let Some(v) = value.as_text() {
                        self.end_time = Set(v.to_string());
                    }
                }
                "startDateTime" => self.start_date_time = Set(value.as_stamp()),
                "endDateTime" => self.end_date_time = Set(value.as_stamp()),
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
