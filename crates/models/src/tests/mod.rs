/// Entity helper tests against an in-memory SQLite schema
pub mod crud_tests;

/// Constraint classification (unique, foreign key, cascade)
pub mod constraint_tests;

use migration::MigratorTrait;
use sea_orm::DatabaseConnection;

/// Fresh migrated database per test.
pub(crate) async fn setup_test_db() -> anyhow::Result<DatabaseConnection> {
    let db = crate::db::connect_in_memory().await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}
