use async_trait::async_trait;
use sea_orm::{DatabaseConnection, EntityTrait};
use tracing::debug;

use models::errors::ModelError;
use models::{exercise, user_on_exercise};

use crate::domain::{Exercise, RepMaxes, UserOnExercise};
use crate::input::PairKey;
use crate::repository::UserExerciseRepository;

pub struct SeaOrmUserExerciseRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmUserExerciseRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }

    async fn exists(&self, key: PairKey) -> Result<bool, ModelError> {
        Ok(user_on_exercise::Entity::find_by_id((key.user_id, key.exercise_id))
            .one(&self.db)
            .await?
            .is_some())
    }
}

#[async_trait]
impl UserExerciseRepository for SeaOrmUserExerciseRepository {
    async fn find(&self, key: PairKey) -> Result<Option<UserOnExercise>, ModelError> {
        let found = user_on_exercise::Entity::find_by_id((key.user_id, key.exercise_id))
            .find_also_related(exercise::Entity)
            .one(&self.db)
            .await?;
        Ok(found.map(|(row, ex)| UserOnExercise { exercise: ex.map(Exercise::from), ..UserOnExercise::from(row) }))
    }

    async fn insert(&self, key: PairKey, metrics: RepMaxes) -> Result<UserOnExercise, ModelError> {
        match user_on_exercise::insert(&self.db, key.user_id, key.exercise_id, metrics.into()).await {
            Ok(row) => Ok(row.into()),
            // Some drivers report a duplicate primary key without a unique-violation code.
            Err(ModelError::Db(detail)) => {
                if self.exists(key).await? {
                    debug!(%detail, "duplicate pair reported as generic error");
                    return Err(ModelError::UniqueViolation(detail));
                }
                Err(ModelError::Db(detail))
            }
            Err(e) => Err(e),
        }
    }

    async fn update(&self, key: PairKey, metrics: RepMaxes) -> Result<UserOnExercise, ModelError> {
        Ok(user_on_exercise::update_metrics(&self.db, key.user_id, key.exercise_id, metrics.into()).await?.into())
    }

    async fn delete(&self, key: PairKey) -> Result<bool, ModelError> {
        user_on_exercise::delete(&self.db, key.user_id, key.exercise_id).await
    }
}
