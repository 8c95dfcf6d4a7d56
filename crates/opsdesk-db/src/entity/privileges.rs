//! privilege entity for database storage.
//!
//! the unit of access control: one row per (role, feature) pair carrying the
//! create/read/update/delete bits.

use chrono::{DateTime, Utc};
use sea_orm::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use opsdesk_types::RecordInput;

/// privilege database model.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "privileges")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub role_id: i64,
    pub feature_id: i64,
    pub privilege_create: bool,
    pub privilege_read: bool,
    pub privilege_update: bool,
    pub privilege_delete: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::roles::Entity",
        from = "Column::RoleId",
        to = "super::roles::Column::Id"
    )]
    Role,
    #[sea_orm(
        belongs_to = "super::features::Entity",
        from = "Column::FeatureId",
        to = "super::features::Column::Id"
    )]
    Feature,
}

impl Related<super::roles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Role.def()
    }
}

impl Related<super::features::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Feature.def()
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
                "role" => {
                    if let Some(v) = value.as_int() {
                        self.role_id = Set(v);
                    }
                }
                "feature" => {
                    if let Some(v) = value.as_int() {
                        self.feature_id = Set(v);
                    }
                }
                "privilegeCreate" => {
                    if let Some(v) = value.as_flag() {
                        self.privilege_create = Set(v);
                    }
                }
                "privilegeRead" => {
                    if let Some(v) = value.as_flag() {
                        self.privilege_read = Set(v);
                    }
                }
                "privilegeUpdate" => {
                    if let Some(v) = value.as_flag() {
                        self.privilege_update = Set(v);
                    }
                }
                "privilegeDelete" => {
                    if let Some(v) = value.as_flag() {
                        self.privilege_delete = Set(v);
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
            privilege_create: Set(false),
            privilege_read: Set(false),
            privilege_update: Set(false),
            privilege_delete: Set(false),
            created_at: Set(Utc::now()),
            ..Default::default()
        };
        model = model.apply_record(input);
        model
    }
}
