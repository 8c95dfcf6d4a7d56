//! create the billing tables: clients, stages, currencies, transactions and
//! the transaction_histories audit trail.

use sea_orm_migration::prelude::*;

use super::m20250801_000001_create_access_control::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

fn timestamps(table: &mut TableCreateStatement) -> &mut TableCreateStatement {
    table
        .col(
            ColumnDef::new(Alias::new("created_at"))
                .timestamp_with_time_zone()
                .not_null(),
        )
        .col(
            ColumnDef::new(Alias::new("updated_at"))
                .timestamp_with_time_zone()
                .not_null(),
        )
}

fn pk(name: impl IntoIden) -> ColumnDef {
    let mut col = ColumnDef::new(name);
    col.big_integer().not_null().auto_increment().primary_key();
    col
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                timestamps(
                    Table::create()
                        .table(Clients::Table)
                        .if_not_exists()
                        .col(pk(Clients::Id))
                        .col(ColumnDef::new(Clients::Name).string().not_null())
                        .col(ColumnDef::new(Clients::Email).string().null())
                        .col(ColumnDef::new(Clients::Phone).string().null())
                        .col(ColumnDef::new(Clients::Country).string().null())
                        .col(ColumnDef::new(Clients::State).string().null())
                        .col(ColumnDef::new(Clients::City).string().null())
                        .col(ColumnDef::new(Clients::Zip).string().null())
                        .col(ColumnDef::new(Clients::Address).string().null()),
                )
                .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_clients_email")
                    .table(Clients::Table)
                    .col(Clients::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                timestamps(
                    Table::create()
                        .table(Stages::Table)
                        .if_not_exists()
                        .col(pk(Stages::Id))
                        .col(ColumnDef::new(Stages::DataOrder).big_integer().null())
                        .col(ColumnDef::new(Stages::Name).string().not_null())
                        .col(ColumnDef::new(Alias::new("name_en")).string().null())
                        .col(ColumnDef::new(Alias::new("name_de")).string().null())
                        .col(ColumnDef::new(Alias::new("name_nl")).string().null())
                        .col(ColumnDef::new(Alias::new("name_id")).string().null())
                        .col(ColumnDef::new(Alias::new("name_ph")).string().null())
                        .col(ColumnDef::new(Stages::Color).string().null()),
                )
                .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_stages_name")
                    .table(Stages::Table)
                    .col(Stages::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                timestamps(
                    Table::create()
                        .table(Currencies::Table)
                        .if_not_exists()
                        .col(pk(Currencies::Id))
                        .col(ColumnDef::new(Currencies::Name).string().not_null())
                        .col(ColumnDef::new(Currencies::Symbol).string().not_null()),
                )
                .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_currencies_name")
                    .table(Currencies::Table)
                    .col(Currencies::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                timestamps(
                    Table::create()
                        .table(Transactions::Table)
                        .if_not_exists()
                        .col(pk(Transactions::Id))
                        .col(ColumnDef::new(Transactions::Name).string().not_null())
                        .col(
                            ColumnDef::new(Transactions::UserId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Transactions::ClientId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Transactions::StageId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Transactions::CurrencyId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Transactions::Amount)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Transactions::TransactionDate)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_transactions_user")
                                .from(Transactions::Table, Transactions::UserId)
                                .to(Users::Table, Users::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_transactions_client")
                                .from(Transactions::Table, Transactions::ClientId)
                                .to(Clients::Table, Clients::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_transactions_stage")
                                .from(Transactions::Table, Transactions::StageId)
                                .to(Stages::Table, Stages::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_transactions_currency")
                                .from(Transactions::Table, Transactions::CurrencyId)
                                .to(Currencies::Table, Currencies::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        ),
                )
                .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_transactions_client_id")
                    .table(Transactions::Table)
                    .col(Transactions::ClientId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_transactions_stage_id")
                    .table(Transactions::Table)
                    .col(Transactions::StageId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                timestamps(
                    Table::create()
                        .table(TransactionHistories::Table)
                        .if_not_exists()
                        .col(pk(TransactionHistories::Id))
                        .col(
                            ColumnDef::new(TransactionHistories::Name)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(TransactionHistories::TransactionId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(TransactionHistories::FromStageId)
                                .big_integer()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(TransactionHistories::ToStageId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(TransactionHistories::FromClientId)
                                .big_integer()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(TransactionHistories::ToClientId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(TransactionHistories::FromCurrencyId)
                                .big_integer()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(TransactionHistories::ToCurrencyId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(TransactionHistories::ChangedById)
                                .big_integer()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_transaction_histories_transaction")
                                .from(
                                    TransactionHistories::Table,
                                    TransactionHistories::TransactionId,
                                )
                                .to(Transactions::Table, Transactions::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_transaction_histories_changed_by")
                                .from(
                                    TransactionHistories::Table,
                                    TransactionHistories::ChangedById,
                                )
                                .to(Users::Table, Users::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        ),
                )
                .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_transaction_histories_name")
                    .table(TransactionHistories::Table)
                    .col(TransactionHistories::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_transaction_histories_transaction_id")
                    .table(TransactionHistories::Table)
                    .col(TransactionHistories::TransactionId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TransactionHistories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Currencies::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Stages::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Clients::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Clients {
    Table,
    Id,
    Name,
    Email,
    Phone,
    Country,
    State,
    City,
    Zip,
    Address,
}

#[derive(DeriveIden)]
pub enum Stages {
    Table,
    Id,
    DataOrder,
    Name,
    Color,
}

#[derive(DeriveIden)]
pub enum Currencies {
    Table,
    Id,
    Name,
    Symbol,
}

#[derive(DeriveIden)]
pub enum Transactions {
    Table,
    Id,
    Name,
    UserId,
    ClientId,
    StageId,
    CurrencyId,
    Amount,
    TransactionDate,
}

#[derive(DeriveIden)]
pub enum TransactionHistories {
    Table,
    Id,
    Name,
    TransactionId,
    FromStageId,
    ToStageId,
    FromClientId,
    ToClientId,
    FromCurrencyId,
    ToCurrencyId,
    ChangedById,
}
