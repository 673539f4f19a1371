//! Migrator registering entity-specific migrations in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240301_000001_create_user;
mod m20240301_000002_create_todo;
mod m20240301_000003_create_habit;
mod m20240301_000004_create_deadline;
mod m20240301_000005_create_exercise;
mod m20240301_000006_create_user_on_exercise;
mod m20240301_000007_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240301_000001_create_user::Migration),
            Box::new(m20240301_000002_create_todo::Migration),
            Box::new(m20240301_000003_create_habit::Migration),
            Box::new(m20240301_000004_create_deadline::Migration),
            Box::new(m20240301_000005_create_exercise::Migration),
            Box::new(m20240301_000006_create_user_on_exercise::Migration),
            // Indexes should always be applied last
            Box::new(m20240301_000007_add_indexes::Migration),
        ]
    }
}
