//! create the task-board tables: priorities, phases, tasks and the
//! task_histories audit trail.

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

fn locale_names(table: &mut TableCreateStatement) -> &mut TableCreateStatement {
    table
        .col(ColumnDef::new(Alias::new("name_en")).string().null())
        .col(ColumnDef::new(Alias::new("name_de")).string().null())
        .col(ColumnDef::new(Alias::new("name_nl")).string().null())
        .col(ColumnDef::new(Alias::new("name_id")).string().null())
        .col(ColumnDef::new(Alias::new("name_ph")).string().null())
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                timestamps(locale_names(
                    Table::create()
                        .table(Priorities::Table)
                        .if_not_exists()
                        .col(pk(Priorities::Id))
                        .col(ColumnDef::new(Priorities::Name).string().not_null()),
                ))
                .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_priorities_name")
                    .table(Priorities::Table)
                    .col(Priorities::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                timestamps(locale_names(
                    Table::create()
                        .table(Phases::Table)
                        .if_not_exists()
                        .col(pk(Phases::Id))
                        .col(ColumnDef::new(Phases::Name).string().not_null()),
                ))
                .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_phases_name")
                    .table(Phases::Table)
                    .col(Phases::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                timestamps(
                    Table::create()
                        .table(Tasks::Table)
                        .if_not_exists()
                        .col(pk(Tasks::Id))
                        .col(ColumnDef::new(Tasks::Name).string().not_null())
                        .col(ColumnDef::new(Tasks::Description).text().null())
                        .col(ColumnDef::new(Tasks::AuthorId).big_integer().not_null())
                        .col(ColumnDef::new(Tasks::AssigneeId).big_integer().null())
                        .col(ColumnDef::new(Tasks::PriorityId).big_integer().not_null())
                        .col(ColumnDef::new(Tasks::PhaseId).big_integer().not_null())
                        .col(
                            ColumnDef::new(Tasks::Start)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(Tasks::Deadline)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(ColumnDef::new(Tasks::Image).string().null())
                        .col(ColumnDef::new(Tasks::Document).string().null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_tasks_author")
                                .from(Tasks::Table, Tasks::AuthorId)
                                .to(Users::Table, Users::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_tasks_assignee")
                                .from(Tasks::Table, Tasks::AssigneeId)
                                .to(Users::Table, Users::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_tasks_priority")
                                .from(Tasks::Table, Tasks::PriorityId)
                                .to(Priorities::Table, Priorities::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_tasks_phase")
                                .from(Tasks::Table, Tasks::PhaseId)
                                .to(Phases::Table, Phases::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        ),
                )
                .to_owned(),
            )
            .await?;
        // board queries filter by phase and priority
        manager
            .create_index(
                Index::create()
                    .name("idx_tasks_phase_id")
                    .table(Tasks::Table)
                    .col(Tasks::PhaseId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_tasks_priority_id")
                    .table(Tasks::Table)
                    .col(Tasks::PriorityId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                timestamps(
                    Table::create()
                        .table(TaskHistories::Table)
                        .if_not_exists()
                        .col(pk(TaskHistories::Id))
                        .col(ColumnDef::new(TaskHistories::Name).string().not_null())
                        .col(
                            ColumnDef::new(TaskHistories::TaskId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(TaskHistories::FromPhaseId)
                                .big_integer()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(TaskHistories::ToPhaseId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(TaskHistories::ChangedById)
                                .big_integer()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_task_histories_task")
                                .from(TaskHistories::Table, TaskHistories::TaskId)
                                .to(Tasks::Table, Tasks::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_task_histories_from_phase")
                                .from(TaskHistories::Table, TaskHistories::FromPhaseId)
                                .to(Phases::Table, Phases::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_task_histories_to_phase")
                                .from(TaskHistories::Table, TaskHistories::ToPhaseId)
                                .to(Phases::Table, Phases::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_task_histories_changed_by")
                                .from(TaskHistories::Table, TaskHistories::ChangedById)
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
                    .name("idx_task_histories_name")
                    .table(TaskHistories::Table)
                    .col(TaskHistories::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_task_histories_task_id")
                    .table(TaskHistories::Table)
                    .col(TaskHistories::TaskId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TaskHistories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tasks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Phases::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Priorities::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Priorities {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
pub enum Phases {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
pub enum Tasks {
    Table,
    Id,
    Name,
    Description,
    AuthorId,
    AssigneeId,
    PriorityId,
    PhaseId,
    Start,
    Deadline,
    Image,
    Document,
}

#[derive(DeriveIden)]
pub enum TaskHistories {
    Table,
    Id,
    Name,
    TaskId,
    FromPhaseId,
    ToPhaseId,
    ChangedById,
}
