//! create the calendar tables: events and schedules.

use sea_orm_migration::prelude::*;

use super::m20250801_000001_create_access_control::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (table, fk, idx) in [
            (Calendar::Events, "fk_events_user", "idx_events_user_id"),
            (
                Calendar::Schedules,
                "fk_schedules_user",
                "idx_schedules_user_id",
            ),
        ] {
            manager
                .create_table(
                    Table::create()
                        .table(table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Calendar::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Calendar::Title).string().not_null())
                        .col(ColumnDef::new(Calendar::UserId).big_integer().not_null())
                        .col(
                            ColumnDef::new(Calendar::DataDate)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Calendar::StartTime).string().not_null())
                        .col(ColumnDef::new(Calendar::EndTime).string().not_null())
                        .col(
                            ColumnDef::new(Calendar::StartDateTime)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(Calendar::EndDateTime)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(Calendar::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Calendar::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name(fk)
                                .from(table, Calendar::UserId)
                                .to(Users::Table, Users::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;
            // day views filter by owner and date
            manager
                .create_index(
                    Index::create()
                        .name(idx)
                        .table(table)
                        .col(Calendar::UserId)
                        .col(Calendar::DataDate)
                        .to_owned(),
                )
                .await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Calendar::Schedules).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Calendar::Events).to_owned())
            .await?;
        Ok(())
    }
}

/// both calendar tables share one column set.
#[derive(DeriveIden, Clone, Copy)]
pub enum Calendar {
    Events,
    Schedules,
    Id,
    Title,
    UserId,
    DataDate,
    StartTime,
    EndTime,
    StartDateTime,
    EndDateTime,
    CreatedAt,
    UpdatedAt,
}
