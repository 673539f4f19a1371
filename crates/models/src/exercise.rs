use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::user_on_exercise;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "exercise")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub img: String,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Performances }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Performances => Entity::has_many(user_on_exercise::Entity).into(),
        }
    }
}

impl Related<user_on_exercise::Entity> for Entity {
    fn to() -> RelationDef { Relation::Performances.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn create<C: ConnectionTrait>(db: &C, name: &str, img: &str) -> Result<Model, ModelError> {
    let am = ActiveModel {
        name: Set(name.to_string()),
        img: Set(img.to_string()),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}

pub async fn update<C: ConnectionTrait>(db: &C, id: i64, name: &str, img: &str) -> Result<Model, ModelError> {
    let am = ActiveModel {
        id: Set(id),
        name: Set(name.to_string()),
        img: Set(img.to_string()),
    };
    Ok(am.update(db).await?)
}

pub async fn delete<C: ConnectionTrait>(db: &C, id: i64) -> Result<bool, ModelError> {
    let res = Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}
