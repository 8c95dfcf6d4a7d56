//! task phase entity for database storage.

use chrono::{DateTime, Utc};
use sea_orm::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use opsdesk_types::RecordInput;

/// phase database model with localized display names.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "phases")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    #[serde(rename = "name_en")]
    pub name_en: Option<String>,
    #[serde(rename = "name_de")]
    pub name_de: Option<String>,
    #[serde(rename = "name_nl")]
    pub name_nl: Option<String>,
    #[serde(rename = "name_id")]
    pub name_id: Option<String>,
    #[serde(rename = "name_ph")]
    pub name_ph: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::tasks::Entity")]
    Tasks,
}

impl Related<super::tasks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tasks.def()
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
                "name_en" => self.name_en = Set(value.as_text().map(str::to_string)),
                "name_de" => self.name_de = Set(value.as_text().map(str::to_string)),
                "name_nl" => self.name_nl = Set(value.as_text().map(str::to_string)),
                "name_id" => self.name_id = Set(value.as_text().map(str::to_string)),
                "name_ph" => self.name_ph = Set(value.as_text().map(str::to_string)),
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
