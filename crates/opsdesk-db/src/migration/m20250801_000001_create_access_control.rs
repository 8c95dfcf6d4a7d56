//! create the access-control tables: roles, features, privileges, users and
//! the token revocation list.
//!
//! every `unique`-flagged schema field gets a database-level unique index and
//! every foreign-key field a real constraint - the application-level checks
//! are only the user-friendly fast path.

use sea_orm_migration::prelude::*;

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
                        .table(Roles::Table)
                        .if_not_exists()
                        .col(pk(Roles::Id))
                        .col(ColumnDef::new(Roles::Name).string().not_null())
                        .col(ColumnDef::new(Roles::Description).string().not_null())
                        .col(
                            ColumnDef::new(Roles::Status)
                                .boolean()
                                .not_null()
                                .default(true),
                        ),
                )
                .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_roles_name")
                    .table(Roles::Table)
                    .col(Roles::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                timestamps(
                    Table::create()
                        .table(Features::Table)
                        .if_not_exists()
                        .col(pk(Features::Id))
                        .col(ColumnDef::new(Features::Name).string().not_null())
                        .col(ColumnDef::new(Features::Description).string().not_null())
                        .col(
                            ColumnDef::new(Features::FeatureCreate)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(Features::FeatureRead)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(Features::FeatureUpdate)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(Features::FeatureDelete)
                                .boolean()
                                .not_null()
                                .default(false),
                        ),
                )
                .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_features_name")
                    .table(Features::Table)
                    .col(Features::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                timestamps(
                    Table::create()
                        .table(Privileges::Table)
                        .if_not_exists()
                        .col(pk(Privileges::Id))
                        .col(ColumnDef::new(Privileges::Name).string().not_null())
                        .col(ColumnDef::new(Privileges::RoleId).big_integer().not_null())
                        .col(
                            ColumnDef::new(Privileges::FeatureId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Privileges::PrivilegeCreate)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(Privileges::PrivilegeRead)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(Privileges::PrivilegeUpdate)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(Privileges::PrivilegeDelete)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_privileges_role")
                                .from(Privileges::Table, Privileges::RoleId)
                                .to(Roles::Table, Roles::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_privileges_feature")
                                .from(Privileges::Table, Privileges::FeatureId)
                                .to(Features::Table, Features::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        ),
                )
                .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_privileges_name")
                    .table(Privileges::Table)
                    .col(Privileges::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;
        // at most one privilege row per (role, feature) pair
        manager
            .create_index(
                Index::create()
                    .name("idx_privileges_role_feature")
                    .table(Privileges::Table)
                    .col(Privileges::RoleId)
                    .col(Privileges::FeatureId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                timestamps(
                    Table::create()
                        .table(Users::Table)
                        .if_not_exists()
                        .col(pk(Users::Id))
                        .col(ColumnDef::new(Users::Photo).string().null())
                        .col(ColumnDef::new(Users::RoleId).big_integer().not_null())
                        .col(ColumnDef::new(Users::Name).string().not_null())
                        .col(ColumnDef::new(Users::Email).string().not_null())
                        .col(ColumnDef::new(Users::Password).string().not_null())
                        .col(ColumnDef::new(Users::Phone).string().not_null())
                        .col(ColumnDef::new(Users::Address).string().null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_users_role")
                                .from(Users::Table, Users::RoleId)
                                .to(Roles::Table, Roles::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        ),
                )
                .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_users_email")
                    .table(Users::Table)
                    .col(Users::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                timestamps(
                    Table::create()
                        .table(Blacklists::Table)
                        .if_not_exists()
                        .col(pk(Blacklists::Id))
                        .col(ColumnDef::new(Blacklists::Token).text().not_null()),
                )
                .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_blacklists_token")
                    .table(Blacklists::Table)
                    .col(Blacklists::Token)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Blacklists::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Privileges::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Features::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Roles::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Roles {
    Table,
    Id,
    Name,
    Description,
    Status,
}

#[derive(DeriveIden)]
pub enum Features {
    Table,
    Id,
    Name,
    Description,
    FeatureCreate,
    FeatureRead,
    FeatureUpdate,
    FeatureDelete,
}

#[derive(DeriveIden)]
pub enum Privileges {
    Table,
    Id,
    Name,
    RoleId,
    FeatureId,
    PrivilegeCreate,
    PrivilegeRead,
    PrivilegeUpdate,
    PrivilegeDelete,
}

#[derive(DeriveIden)]
pub enum Users {
    Table,
    Id,
    Photo,
    RoleId,
    Name,
    Email,
    Password,
    Phone,
    Address,
}

#[derive(DeriveIden)]
pub enum Blacklists {
    Table,
    Id,
    Token,
}
