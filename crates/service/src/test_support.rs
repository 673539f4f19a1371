#![cfg(test)]
use std::sync::Arc;

use migration::MigratorTrait;
use sea_orm::DatabaseConnection;

use configs::{AuthConfig, PasswordHashConfig};

use crate::auth::{CredentialHasher, TokenIssuer};
use crate::input::UserInput;
use crate::repository::memory::{MemoryStore, MemoryUsers};
use crate::repository::UserRepository;
use crate::services::UserService;

/// Fresh in-memory SQLite database with every migration applied.
pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    let db = models::db::connect_in_memory().await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

/// Auth settings with the cheapest argon2 cost the library accepts.
pub fn test_auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: "test-secret".into(),
        password: PasswordHashConfig { memory_kib: 64, iterations: 1, parallelism: 1 },
        ..AuthConfig::default()
    }
}

pub fn user_service<R: UserRepository>(repo: Arc<R>) -> UserService<R> {
    let cfg = test_auth_config();
    let hasher = CredentialHasher::new(&cfg.password).expect("test argon2 params");
    UserService::new(repo, hasher, TokenIssuer::new(&cfg))
}

pub fn memory_users() -> (Arc<MemoryStore>, UserService<MemoryUsers>) {
    let store = MemoryStore::new();
    let svc = user_service(Arc::new(store.users()));
    (store, svc)
}

pub fn user_input(email: &str) -> UserInput {
    UserInput {
        first_name: "A".into(),
        last_name: "B".into(),
        email: email.into(),
        password: "pw123456".into(),
        todos_ids: vec![],
        habits_ids: vec![],
        deadlines_ids: vec![],
    }
}
