//! transaction audit entity for database storage.
//!
//! rows are appended on transaction creation and on every stage, client or
//! currency transition and are never updated afterwards.

use chrono::{DateTime, Utc};
use sea_orm::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use opsdesk_types::RecordInput;

/// transaction history database model.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transaction_histories")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub transaction_id: i64,
    /// null on the initial entry written at transaction creation.
    pub from_stage_id: Option<i64>,
    pub to_stage_id: i64,
    pub from_client_id: Option<i64>,
    pub to_client_id: i64,
    pub from_currency_id: Option<i64>,
    pub to_currency_id: i64,
    pub changed_by_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::transactions::Entity",
        from = "Column::TransactionId",
        to = "super::transactions::Column::Id"
    )]
    Transaction,
    #[sea_orm(
        belongs_to = "super::stages::Entity",
        from = "Column::ToStageId",
        to = "super::stages::Column::Id"
    )]
    ToStage,
    #[sea_orm(
        belongs_to = "super::clients::Entity",
        from = "Column::ToClientId",
        to = "super::clients::Column::Id"
    )]
    ToClient,
    #[sea_orm(
        belongs_to = "super::currencies::Entity",
        from = "Column::ToCurrencyId",
        to = "super::currencies::Column::Id"
    )]
    ToCurrency,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::ChangedById",
        to = "super::users::Column::Id"
    )]
    ChangedBy,
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transaction.def()
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
                "transaction" => {
                    if let Some(v) = value.as_int() {
                        self.transaction_id = Set(v);
                    }
                }
                "fromStage" => self.from_stage_id = Set(value.as_int()),
                "toStage" => {
                    if let Some(v) = value.as_int() {
                        self.to_stage_id = Set(v);
                    }
                }
                "fromClient" => self.from_client_id = Set(value.as_int()),
                "toClient" => {
                    if let Some(v) = value.as_int() {
                        self.to_client_id = Set(v);
                    }
                }
                "fromCurrency" => self.from_currency_id = Set(value.as_int()),
                "toCurrency" => {
                    if let Some(v) = value.as_int() {
                        self.to_currency_id = Set(v);
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
