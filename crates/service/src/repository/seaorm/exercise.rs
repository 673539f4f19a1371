use async_trait::async_trait;
use sea_orm::{DatabaseConnection, EntityTrait, LoaderTrait, QueryOrder};

use models::errors::ModelError;
use models::{exercise, user_on_exercise};

use crate::domain::{Exercise, UserOnExercise};
use crate::include::{Include, Relation};
use crate::input::ExerciseDraft;
use crate::repository::CrudRepository;

pub struct SeaOrmExerciseRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmExerciseRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }

    async fn hydrate(&self, rows: Vec<exercise::Model>, include: &Include) -> Result<Vec<Exercise>, ModelError> {
        if !include.contains(Relation::Performers) {
            return Ok(rows.into_iter().map(Exercise::from).collect());
        }
        let performers = rows
            .load_many(
                user_on_exercise::Entity::find().order_by_asc(user_on_exercise::Column::UserId),
                &self.db,
            )
            .await?;
        Ok(rows
            .into_iter()
            .zip(performers)
            .map(|(row, users)| Exercise {
                users: users.into_iter().map(UserOnExercise::from).collect(),
                ..Exercise::from(row)
            })
            .collect())
    }
}

#[async_trait]
impl CrudRepository for SeaOrmExerciseRepository {
    type Record = Exercise;
    type Draft = ExerciseDraft;

    async fn find_all(&self, include: &Include) -> Result<Vec<Exercise>, ModelError> {
        let rows = exercise::Entity::find().order_by_asc(exercise::Column::Id).all(&self.db).await?;
        self.hydrate(rows, include).await
    }

    async fn find_by_id(&self, id: i64, include: &Include) -> Result<Option<Exercise>, ModelError> {
        let rows: Vec<exercise::Model> = exercise::Entity::find_by_id(id).one(&self.db).await?.into_iter().collect();
        Ok(self.hydrate(rows, include).await?.pop())
    }

    async fn create(&self, d: ExerciseDraft) -> Result<Exercise, ModelError> {
        Ok(exercise::create(&self.db, &d.name, &d.img).await?.into())
    }

    async fn update(&self, id: i64, d: ExerciseDraft) -> Result<Exercise, ModelError> {
        Ok(exercise::update(&self.db, id, &d.name, &d.img).await?.into())
    }

    async fn delete(&self, id: i64) -> Result<bool, ModelError> {
        exercise::delete(&self.db, id).await
    }
}
