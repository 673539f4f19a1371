use sea_orm::{entity::prelude::*, sea_query::Expr, ConnectionTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::user;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "deadline")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub subject: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub end_date: DateTimeUtc,
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

/// Column values shared by insert and full-row update.
#[derive(Clone, Debug)]
pub struct Fields<'a> {
    pub name: &'a str,
    pub subject: &'a str,
    pub description: &'a str,
    pub end_date: DateTimeUtc,
    pub user_id: i64,
}

pub async fn create<C: ConnectionTrait>(db: &C, fields: Fields<'_>) -> Result<Model, ModelError> {
    let am = ActiveModel {
        name: Set(fields.name.to_string()),
        subject: Set(fields.subject.to_string()),
        description: Set(fields.description.to_string()),
        end_date: Set(fields.end_date),
        user_id: Set(fields.user_id),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}

pub async fn update<C: ConnectionTrait>(db: &C, id: i64, fields: Fields<'_>) -> Result<Model, ModelError> {
    let am = ActiveModel {
        id: Set(id),
        name: Set(fields.name.to_string()),
        subject: Set(fields.subject.to_string()),
        description: Set(fields.description.to_string()),
        end_date: Set(fields.end_date),
        user_id: Set(fields.user_id),
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
