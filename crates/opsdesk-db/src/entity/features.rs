//! feature entity for database storage.

use chrono::{DateTime, Utc};
use sea_orm::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use opsdesk_types::RecordInput;

/// feature database model. one row per access-controlled resource namespace.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "features")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub description: String,
    /// default create permission copied into privileges at provisioning time.
    pub feature_create: bool,
    pub feature_read: bool,
    pub feature_update: bool,
    pub feature_delete: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::privileges::Entity")]
    Privileges,
}

impl Related<super::privileges::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Privileges.def()
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
                "description" => {
                    if let Some(v) = value.as_text() {
                        self.description = Set(v.to_string());
                    }
                }
                "featureCreate" => {
                    if let Some(v) = value.as_flag() {
                        self.feature_create = Set(v);
                    }
                }
                "featureRead" => {
                    if let Some(v) = value.as_flag() {
                        self.feature_read = Set(v);
                    }
                }
                "featureUpdate" => {
                    if let Some(v) = value.as_flag() {
                        self.feature_update = Set(v);
                    }
                }
                "featureDelete" => {
                    if let Some(v) = value.as_flag() {
                        self.feature_delete = Set(v);
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
            feature_create: Set(false),
            feature_read: Set(false),
            feature_update: Set(false),
            feature_delete: Set(false),
            created_at: Set(Utc::now()),
            ..Default::default()
        };
        model = model.apply_record(input);
        model
    }
}
