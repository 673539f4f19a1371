use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::{exercise, user};

/// Junction row carrying a user's rep-max metrics for one exercise.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_on_exercise")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: i64,
    #[sea_orm(primary_key, auto_increment = false)]
    pub exercise_id: i64,
    pub eight_rep_max: i32,
    pub ten_rep_max: i32,
    pub twelve_rep_max: i32,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    User,
    Exercise,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::User => Entity::belongs_to(user::Entity)
                .from(Column::UserId)
                .to(user::Column::Id)
                .into(),
            Relation::Exercise => Entity::belongs_to(exercise::Entity)
                .from(Column::ExerciseId)
                .to(exercise::Column::Id)
                .into(),
        }
    }
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef { Relation::User.def() }
}

impl Related<exercise::Entity> for Entity {
    fn to() -> RelationDef { Relation::Exercise.def() }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Metrics {
    pub eight_rep_max: i32,
    pub ten_rep_max: i32,
    pub twelve_rep_max: i32,
}

fn check(metrics: Metrics) -> Result<(), ModelError> {
    if metrics.eight_rep_max < 0 || metrics.ten_rep_max < 0 || metrics.twelve_rep_max < 0 {
        return Err(ModelError::Validation("rep-max metrics must not be negative".into()));
    }
    Ok(())
}

/// Single-statement insert; a second row for the same pair violates the primary key.
pub async fn insert<C: ConnectionTrait>(db: &C, user_id: i64, exercise_id: i64, metrics: Metrics) -> Result<Model, ModelError> {
    check(metrics)?;
    let am = ActiveModel {
        user_id: Set(user_id),
        exercise_id: Set(exercise_id),
        eight_rep_max: Set(metrics.eight_rep_max),
        ten_rep_max: Set(metrics.ten_rep_max),
        twelve_rep_max: Set(metrics.twelve_rep_max),
    };
    Ok(am.insert(db).await?)
}

/// Replace all three metrics in one statement.
pub async fn update_metrics<C: ConnectionTrait>(db: &C, user_id: i64, exercise_id: i64, metrics: Metrics) -> Result<Model, ModelError> {
    check(metrics)?;
    let am = ActiveModel {
        user_id: Set(user_id),
        exercise_id: Set(exercise_id),
        eight_rep_max: Set(metrics.eight_rep_max),
        ten_rep_max: Set(metrics.ten_rep_max),
        twelve_rep_max: Set(metrics.twelve_rep_max),
    };
    Ok(am.update(db).await?)
}

pub async fn delete<C: ConnectionTrait>(db: &C, user_id: i64, exercise_id: i64) -> Result<bool, ModelError> {
    let res = Entity::delete_by_id((user_id, exercise_id)).exec(db).await?;
    Ok(res.rows_affected > 0)
}

impl Model {
    pub fn metrics(&self) -> Metrics {
        Metrics {
            eight_rep_max: self.eight_rep_max,
            ten_rep_max: self.ten_rep_max,
            twelve_rep_max: self.twelve_rep_max,
        }
    }
}
