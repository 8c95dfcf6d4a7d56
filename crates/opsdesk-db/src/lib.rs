//! database layer for opsdesk.
//!
//! this crate provides persistent storage for the business entities
//! (roles, features, privileges, users, tasks, events, schedules,
//! transactions, clients and their reference data) plus the token
//! revocation list and the append-only audit tables.
//!
//! the [`Db`] handle is constructed explicitly at process start and passed
//! down - there is no module-level connection state. entity-generic gateway
//! methods (`count`, `page`, `find_by_id`, `find_first`, `insert`, `update`,
//! `delete_by_id`, `delete_many`) carry the whole CRUD engine; the few
//! domain-specific queries the authorization path needs live beside them.

#![warn(missing_docs)]

/// sea-orm entities, one module per table.
pub mod entity;
mod error;
mod migration;

pub use error::Error;
pub use migration::Migrator;

use std::collections::HashMap;
use std::str::FromStr;

use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, Condition, ConnectOptions,
    Database as SeaOrmDatabase, DatabaseConnection, EntityTrait, IntoActiveModel, PaginatorTrait,
    PrimaryKeyTrait, QueryFilter, QuerySelect, Select,
};
use sea_orm_migration::MigratorTrait;
use serde::Serialize;
use tracing::info;

/// result type for database operations.
pub type Result<T> = std::result::Result<T, Error>;

/// resolve a snake_case column name against an entity.
pub fn column<E>(name: &str) -> Result<E::Column>
where
    E: EntityTrait,
    E::Column: FromStr,
{
    E::Column::from_str(name).map_err(|_| Error::UnknownColumn(name.to_string()))
}

/// handle to the persistence gateway.
#[derive(Clone)]
pub struct Db {
    conn: DatabaseConnection,
}

impl Db {
    /// connect to the database at `url` (sqlite path or postgres url).
    pub async fn connect(url: &str) -> Result<Self> {
        let mut options = ConnectOptions::new(url.to_string());
        options.sqlx_logging(false);
        let conn = SeaOrmDatabase::connect(options).await?;
        info!(url, "connected to database");
        Ok(Self { conn })
    }

    /// in-memory sqlite database for tests.
    ///
    /// pinned to a single pooled connection - each sqlite `:memory:`
    /// connection is its own database, so a larger pool would scatter state.
    pub async fn new_in_memory() -> Result<Self> {
        let mut options = ConnectOptions::new("sqlite::memory:");
        options.max_connections(1).sqlx_logging(false);
        let conn = SeaOrmDatabase::connect(options).await?;
        Ok(Self { conn })
    }

    /// run all pending migrations.
    pub async fn migrate(&self) -> Result<()> {
        Migrator::up(&self.conn, None).await?;
        Ok(())
    }

    /// ping the database to verify connectivity.
    pub async fn ping(&self) -> Result<()> {
        self.conn.ping().await?;
        Ok(())
    }

    /// close the connection pool. part of the explicit lifecycle: open at
    /// process start, close on shutdown.
    pub async fn close(self) -> Result<()> {
        self.conn.close().await?;
        Ok(())
    }

    /// raw connection for callers that build their own statements.
    pub fn connection(&self) -> &DatabaseConnection {
        &self.conn
    }

    // ─── Generic Gateway ─────────────────────────────────────────────────────

    /// count the rows a select would return, ignoring pagination.
    pub async fn count<E>(&self, select: Select<E>) -> Result<u64>
    where
        E: EntityTrait,
        E::Model: Send + Sync,
    {
        Ok(select.count(&self.conn).await?)
    }

    /// execute a select with a pagination window.
    pub async fn page<E: EntityTrait>(
        &self,
        select: Select<E>,
        skip: u64,
        take: u64,
    ) -> Result<Vec<E::Model>> {
        Ok(select.offset(skip).limit(take).all(&self.conn).await?)
    }

    /// fetch one row by primary key.
    pub async fn find_by_id<E>(&self, id: i64) -> Result<Option<E::Model>>
    where
        E: EntityTrait,
        <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<i64>,
    {
        Ok(E::find_by_id(id).one(&self.conn).await?)
    }

    /// fetch the first row matching a condition.
    pub async fn find_first<E: EntityTrait>(&self, filter: Condition) -> Result<Option<E::Model>> {
        Ok(E::find().filter(filter).one(&self.conn).await?)
    }

    /// fetch every row matching a condition.
    pub async fn find_all<E: EntityTrait>(&self, filter: Condition) -> Result<Vec<E::Model>> {
        Ok(E::find().filter(filter).all(&self.conn).await?)
    }

    /// insert an active model, returning the stored row.
    pub async fn insert<A>(&self, model: A) -> Result<<A::Entity as EntityTrait>::Model>
    where
        A: ActiveModelTrait + ActiveModelBehavior + Send,
        <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
    {
        Ok(model.insert(&self.conn).await?)
    }

    /// update an active model (primary key must be set), returning the row.
    pub async fn update<A>(&self, model: A) -> Result<<A::Entity as EntityTrait>::Model>
    where
        A: ActiveModelTrait + ActiveModelBehavior + Send,
        <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
    {
        Ok(model.update(&self.conn).await?)
    }

    /// delete one row by primary key, returning the affected-row count.
    pub async fn delete_by_id<E>(&self, id: i64) -> Result<u64>
    where
        E: EntityTrait,
        <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<i64>,
    {
        Ok(E::delete_by_id(id).exec(&self.conn).await?.rows_affected)
    }

    /// delete every row matching a condition, returning the affected count.
    pub async fn delete_many<E: EntityTrait>(&self, filter: Condition) -> Result<u64> {
        Ok(E::delete_many()
            .filter(filter)
            .exec(&self.conn)
            .await?
            .rows_affected)
    }

    // ─── Foreign-Key Includes ────────────────────────────────────────────────

    /// batch-load parent rows by id for one of the joinable entities,
    /// keyed by id and serialized to wire JSON.
    pub async fn load_parents(
        &self,
        parent: &str,
        ids: &[i64],
    ) -> Result<HashMap<i64, serde_json::Value>> {
        match parent {
            "users" => self.parent_map::<entity::users::Entity>(ids).await,
            "roles" => self.parent_map::<entity::roles::Entity>(ids).await,
            "features" => self.parent_map::<entity::features::Entity>(ids).await,
            "priorities" => self.parent_map::<entity::priorities::Entity>(ids).await,
            "phases" => self.parent_map::<entity::phases::Entity>(ids).await,
            "tasks" => self.parent_map::<entity::tasks::Entity>(ids).await,
            "clients" => self.parent_map::<entity::clients::Entity>(ids).await,
            "stages" => self.parent_map::<entity::stages::Entity>(ids).await,
            "currencies" => self.parent_map::<entity::currencies::Entity>(ids).await,
            "transactions" => self.parent_map::<entity::transactions::Entity>(ids).await,
            other => Err(Error::UnknownParent(other.to_string())),
        }
    }

    /// true when the referenced parent row exists.
    pub async fn parent_exists(&self, parent: &str, id: i64) -> Result<bool> {
        Ok(!self.load_parents(parent, &[id]).await?.is_empty())
    }

    async fn parent_map<E>(&self, ids: &[i64]) -> Result<HashMap<i64, serde_json::Value>>
    where
        E: EntityTrait,
        E::Column: FromStr,
        E::Model: Serialize,
    {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let id_col = column::<E>("id")?;
        let rows = E::find()
            .filter(id_col.is_in(ids.iter().copied()))
            .all(&self.conn)
            .await?;
        let mut map = HashMap::with_capacity(rows.len());
        for row in rows {
            let json = serde_json::to_value(&row)?;
            if let Some(id) = json.get("id").and_then(serde_json::Value::as_i64) {
                map.insert(id, json);
            }
        }
        Ok(map)
    }

    /// resolve a parent row id from its display name.
    ///
    /// transition endpoints accept either a numeric id or a display name for
    /// the target value; this is the name half of that lookup.
    pub async fn parent_id_by_name(&self, parent: &str, name: &str) -> Result<Option<i64>> {
        match parent {
            "priorities" => Ok(entity::priorities::Entity::find()
                .filter(entity::priorities::Column::Name.eq(name))
                .one(&self.conn)
                .await?
                .map(|m| m.id)),
            "phases" => Ok(entity::phases::Entity::find()
                .filter(entity::phases::Column::Name.eq(name))
                .one(&self.conn)
                .await?
                .map(|m| m.id)),
            "stages" => Ok(entity::stages::Entity::find()
                .filter(entity::stages::Column::Name.eq(name))
                .one(&self.conn)
                .await?
                .map(|m| m.id)),
            "clients" => Ok(entity::clients::Entity::find()
                .filter(entity::clients::Column::Name.eq(name))
                .one(&self.conn)
                .await?
                .map(|m| m.id)),
            "currencies" => Ok(entity::currencies::Entity::find()
                .filter(entity::currencies::Column::Name.eq(name))
                .one(&self.conn)
                .await?
                .map(|m| m.id)),
            other => Err(Error::UnknownParent(other.to_string())),
        }
    }

    // ─── Authorization Queries ───────────────────────────────────────────────

    /// fetch a user by id.
    pub async fn user_by_id(&self, id: i64) -> Result<Option<entity::users::Model>> {
        Ok(entity::users::Entity::find_by_id(id).one(&self.conn).await?)
    }

    /// fetch a user by e-mail address.
    pub async fn user_by_email(&self, email: &str) -> Result<Option<entity::users::Model>> {
        Ok(entity::users::Entity::find()
            .filter(entity::users::Column::Email.eq(email))
            .one(&self.conn)
            .await?)
    }

    /// fetch a role by id.
    pub async fn role_by_id(&self, id: i64) -> Result<Option<entity::roles::Model>> {
        Ok(entity::roles::Entity::find_by_id(id).one(&self.conn).await?)
    }

    /// fetch the full privilege set of a role with each privilege's feature.
    pub async fn role_privileges(
        &self,
        role_id: i64,
    ) -> Result<Vec<(entity::privileges::Model, Option<entity::features::Model>)>> {
        Ok(entity::privileges::Entity::find()
            .filter(entity::privileges::Column::RoleId.eq(role_id))
            .find_also_related(entity::features::Entity)
            .all(&self.conn)
            .await?)
    }

    /// true when the presented authorization header is on the revocation list.
    pub async fn is_token_revoked(&self, header: &str) -> Result<bool> {
        Ok(entity::blacklists::Entity::find()
            .filter(entity::blacklists::Column::Token.eq(header))
            .one(&self.conn)
            .await?
            .is_some())
    }

    /// add the presented authorization header to the revocation list.
    ///
    /// insert-only; a duplicate insert (token revoked twice) is not an error.
    pub async fn revoke_token(&self, header: &str) -> Result<()> {
        use sea_orm::Set;
        let now = chrono::Utc::now();
        let row = entity::blacklists::ActiveModel {
            token: Set(header.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        match row.insert(&self.conn).await {
            Ok(_) => Ok(()),
            Err(e) if e.to_string().to_ascii_lowercase().contains("unique") => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
