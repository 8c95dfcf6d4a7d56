//! database migrations for opsdesk.

pub use sea_orm_migration::prelude::*;

mod m20250801_000001_create_access_control;
mod m20250801_000002_create_task_boards;
mod m20250801_000003_create_calendars;
mod m20250801_000004_create_billing;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250801_000001_create_access_control::Migration),
            Box::new(m20250801_000002_create_task_boards::Migration),
            Box::new(m20250801_000003_create_calendars::Migration),
            Box::new(m20250801_000004_create_billing::Migration),
        ]
    }
}
