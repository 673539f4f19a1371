use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tracing::info;

use configs::{AppConfig, AuthConfig};

use crate::auth::{CredentialHasher, TokenIssuer};
use crate::errors::ServiceError;
use crate::repository::seaorm::{
    SeaOrmDeadlineRepository, SeaOrmExerciseRepository, SeaOrmHabitRepository, SeaOrmTodoRepository,
    SeaOrmUserExerciseRepository, SeaOrmUserRepository,
};
use crate::services::{CrudService, UserExerciseService, UserService};

pub type TodoService = CrudService<SeaOrmTodoRepository>;
pub type HabitService = CrudService<SeaOrmHabitRepository>;
pub type DeadlineService = CrudService<SeaOrmDeadlineRepository>;
pub type ExerciseService = CrudService<SeaOrmExerciseRepository>;

/// Every domain service wired to one connection pool. Built once at startup
/// and handed to the boundary layer.
#[derive(Clone)]
pub struct AppContext {
    pub db: DatabaseConnection,
    pub users: Arc<UserService<SeaOrmUserRepository>>,
    pub todos: Arc<TodoService>,
    pub habits: Arc<HabitService>,
    pub deadlines: Arc<DeadlineService>,
    pub exercises: Arc<ExerciseService>,
    pub user_exercises: Arc<UserExerciseService<SeaOrmUserExerciseRepository>>,
    pub tokens: TokenIssuer,
}

impl AppContext {
    pub fn new(db: DatabaseConnection, auth: &AuthConfig) -> Result<Self, ServiceError> {
        let hasher = CredentialHasher::new(&auth.password)?;
        let tokens = TokenIssuer::new(auth);
        Ok(Self {
            users: Arc::new(UserService::new(
                Arc::new(SeaOrmUserRepository::new(db.clone())),
                hasher,
                tokens.clone(),
            )),
            todos: Arc::new(CrudService::new(Arc::new(SeaOrmTodoRepository::new(db.clone())))),
            habits: Arc::new(CrudService::new(Arc::new(SeaOrmHabitRepository::new(db.clone())))),
            deadlines: Arc::new(CrudService::new(Arc::new(SeaOrmDeadlineRepository::new(db.clone())))),
            exercises: Arc::new(CrudService::new(Arc::new(SeaOrmExerciseRepository::new(db.clone())))),
            user_exercises: Arc::new(UserExerciseService::new(Arc::new(SeaOrmUserExerciseRepository::new(
                db.clone(),
            )))),
            tokens,
            db,
        })
    }

    /// Open the pool described by `cfg` and build the services on it.
    pub async fn connect(cfg: &AppConfig) -> anyhow::Result<Self> {
        let db = models::db::connect_with_config(&cfg.database).await?;
        let ctx = Self::new(db, &cfg.auth)?;
        info!("service context ready");
        Ok(ctx)
    }
}
