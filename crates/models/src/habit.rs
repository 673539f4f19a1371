use chrono::Utc;
use sea_orm::{entity::prelude::*, sea_query::Expr, ConnectionTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::user;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "habit")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub streak: i32,
    pub updated_at: DateTimeUtc,
    pub user_id: i64,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { User }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::User => Entity::belongs_to(user::Entity)
                .from(Column::UserId)
                .to(user::Column::Id)
                .into(),
        }
    }
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef { Relation::User.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn create<C: ConnectionTrait>(
    db: &C,
    name: &str,
    description: &str,
    streak: i32,
    user_id: i64,
) -> Result<Model, ModelError> {
    if streak < 0 {
        return Err(ModelError::Validation("streak must not be negative".into()));
    }
    let am = ActiveModel {
        name: Set(name.to_string()),
        description: Set(description.to_string()),
        streak: Set(streak),
        updated_at: Set(Utc::now()),
        user_id: Set(user_id),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}

pub async fn update<C: ConnectionTrait>(
    db: &C,
    id: i64,
    name: &str,
    description: &str,
    streak: i32,
    user_id: i64,
) -> Result<Model, ModelError> {
    if streak < 0 {
        return Err(ModelError::Validation("streak must not be negative".into()));
    }
    let am = ActiveModel {
        id: Set(id),
        name: Set(name.to_string()),
        description: Set(description.to_string()),
        streak: Set(streak),
        updated_at: Set(Utc::now()),
        user_id: Set(user_id),
    };
    Ok(am.update(db).await?)
}

pub async fn assign_owner<C: ConnectionTrait>(db: &C, ids: &[i64], user_id: i64) -> Result<u64, ModelError> {
    if ids.is_empty() {
        return Ok(0);
    }
    let res = Entity::update_many()
        .col_expr(Column::UserId, Expr::value(user_id))
        .filter(Column::Id.is_in(ids.iter().copied()))
        .exec(db)
        .await?;
    Ok(res.rows_affected)
}

pub async fn delete<C: ConnectionTrait>(db: &C, id: i64) -> Result<bool, ModelError> {
    let res = Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}
