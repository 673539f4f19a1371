use sea_orm::{entity::prelude::*, ConnectionTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::{deadline, habit, todo, user_on_exercise};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Todos,
    Habits,
    Deadlines,
    Performances,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Todos => Entity::has_many(todo::Entity).into(),
            Relation::Habits => Entity::has_many(habit::Entity).into(),
            Relation::Deadlines => Entity::has_many(deadline::Entity).into(),
            Relation::Performances => Entity::has_many(user_on_exercise::Entity).into(),
        }
    }
}

impl Related<todo::Entity> for Entity {
    fn to() -> RelationDef { Relation::Todos.def() }
}

impl Related<habit::Entity> for Entity {
    fn to() -> RelationDef { Relation::Habits.def() }
}

impl Related<deadline::Entity> for Entity {
    fn to() -> RelationDef { Relation::Deadlines.def() }
}

impl Related<user_on_exercise::Entity> for Entity {
    fn to() -> RelationDef { Relation::Performances.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn create<C: ConnectionTrait>(
    db: &C,
    first_name: &str,
    last_name: &str,
    email: &str,
    password_hash: &str,
) -> Result<Model, ModelError> {
    if password_hash.trim().is_empty() {
        return Err(ModelError::Validation("password hash required".into()));
    }
    let am = ActiveModel {
        first_name: Set(first_name.to_string()),
        last_name: Set(last_name.to_string()),
        email: Set(email.to_string()),
        password_hash: Set(password_hash.to_string()),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}

/// Replace every column of an existing row.
pub async fn update<C: ConnectionTrait>(
    db: &C,
    id: i64,
    first_name: &str,
    last_name: &str,
    email: &str,
    password_hash: &str,
) -> Result<Model, ModelError> {
    if password_hash.trim().is_empty() {
        return Err(ModelError::Validation("password hash required".into()));
    }
    let am = ActiveModel {
        id: Set(id),
        first_name: Set(first_name.to_string()),
        last_name: Set(last_name.to_string()),
        email: Set(email.to_string()),
        password_hash: Set(password_hash.to_string()),
    };
    Ok(am.update(db).await?)
}

pub async fn find_by_email<C: ConnectionTrait>(db: &C, email: &str) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find().filter(Column::Email.eq(email)).one(db).await?)
}

/// Physical delete; children go with it through `ON DELETE CASCADE`.
pub async fn delete<C: ConnectionTrait>(db: &C, id: i64) -> Result<bool, ModelError> {
    let res = Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}
