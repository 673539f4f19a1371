//! Gateways for the user-owned kinds: Todo, Habit and Deadline.

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, EntityTrait, LoaderTrait, QueryOrder};

use models::errors::ModelError;
use models::{deadline, habit, todo, user};

use crate::domain::{Deadline, Habit, Todo, UserSummary};
use crate::include::{Include, Relation};
use crate::input::{DeadlineDraft, HabitDraft, TodoDraft};
use crate::repository::CrudRepository;

pub struct SeaOrmTodoRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmTodoRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }

    async fn hydrate(&self, rows: Vec<todo::Model>, include: &Include) -> Result<Vec<Todo>, ModelError> {
        if !include.contains(Relation::Owner) {
            return Ok(rows.into_iter().map(Todo::from).collect());
        }
        let owners = rows.load_one(user::Entity, &self.db).await?;
        Ok(rows
            .into_iter()
            .zip(owners)
            .map(|(row, owner)| Todo { owner: owner.map(UserSummary::from), ..Todo::from(row) })
            .collect())
    }
}

#[async_trait]
impl CrudRepository for SeaOrmTodoRepository {
    type Record = Todo;
    type Draft = TodoDraft;

    async fn find_all(&self, include: &Include) -> Result<Vec<Todo>, ModelError> {
        let rows = todo::Entity::find().order_by_asc(todo::Column::Id).all(&self.db).await?;
        self.hydrate(rows, include).await
    }

    async fn find_by_id(&self, id: i64, include: &Include) -> Result<Option<Todo>, ModelError> {
        let rows: Vec<todo::Model> = todo::Entity::find_by_id(id).one(&self.db).await?.into_iter().collect();
        Ok(self.hydrate(rows, include).await?.pop())
    }

    async fn create(&self, d: TodoDraft) -> Result<Todo, ModelError> {
        Ok(todo::create(&self.db, &d.name, &d.description, d.user_id).await?.into())
    }

    async fn update(&self, id: i64, d: TodoDraft) -> Result<Todo, ModelError> {
        Ok(todo::update(&self.db, id, &d.name, &d.description, d.user_id).await?.into())
    }

    async fn delete(&self, id: i64) -> Result<bool, ModelError> {
        todo::delete(&self.db, id).await
    }
}

pub struct SeaOrmHabitRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmHabitRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }

    async fn hydrate(&self, rows: Vec<habit::Model>, include: &Include) -> Result<Vec<Habit>, ModelError> {
        if !include.contains(Relation::Owner) {
            return Ok(rows.into_iter().map(Habit::from).collect());
        }
        let owners = rows.load_one(user::Entity, &self.db).await?;
        Ok(rows
            .into_iter()
            .zip(owners)
            .map(|(row, owner)| Habit { owner: owner.map(UserSummary::from), ..Habit::from(row) })
            .collect())
    }
}

#[async_trait]
impl CrudRepository for SeaOrmHabitRepository {
    type Record = Habit;
    type Draft = HabitDraft;

    async fn find_all(&self, include: &Include) -> Result<Vec<Habit>, ModelError> {
        let rows = habit::Entity::find().order_by_asc(habit::Column::Id).all(&self.db).await?;
        self.hydrate(rows, include).await
    }

    async fn find_by_id(&self, id: i64, include: &Include) -> Result<Option<Habit>, ModelError> {
        let rows: Vec<habit::Model> = habit::Entity::find_by_id(id).one(&self.db).await?.into_iter().collect();
        Ok(self.hydrate(rows, include).await?.pop())
    }

    async fn create(&self, d: HabitDraft) -> Result<Habit, ModelError> {
        Ok(habit::create(&self.db, &d.name, &d.description, d.streak, d.user_id).await?.into())
    }

    async fn update(&self, id: i64, d: HabitDraft) -> Result<Habit, ModelError> {
        Ok(habit::update(&self.db, id, &d.name, &d.description, d.streak, d.user_id).await?.into())
    }

    async fn delete(&self, id: i64) -> Result<bool, ModelError> {
        habit::delete(&self.db, id).await
    }
}

pub struct SeaOrmDeadlineRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmDeadlineRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }

    async fn hydrate(&self, rows: Vec<deadline::Model>, include: &Include) -> Result<Vec<Deadline>, ModelError> {
        if !include.contains(Relation::Owner) {
            return Ok(rows.into_iter().map(Deadline::from).collect());
        }
        let owners = rows.load_one(user::Entity, &self.db).await?;
        Ok(rows
            .into_iter()
            .zip(owners)
            .map(|(row, owner)| Deadline { owner: owner.map(UserSummary::from), ..Deadline::from(row) })
            .collect())
    }
}

fn fields(d: &DeadlineDraft) -> deadline::Fields<'_> {
    deadline::Fields {
        name: &d.name,
        subject: &d.subject,
        description: &d.description,
        end_date: d.end_date,
        user_id: d.user_id,
    }
}

#[async_trait]
impl CrudRepository for SeaOrmDeadlineRepository {
    type Record = Deadline;
    type Draft = DeadlineDraft;

    async fn find_all(&self, include: &Include) -> Result<Vec<Deadline>, ModelError> {
        let rows = deadline::Entity::find().order_by_asc(deadline::Column::Id).all(&self.db).await?;
        self.hydrate(rows, include).await
    }

    async fn find_by_id(&self, id: i64, include: &Include) -> Result<Option<Deadline>, ModelError> {
        let rows: Vec<deadline::Model> = deadline::Entity::find_by_id(id).one(&self.db).await?.into_iter().collect();
        Ok(self.hydrate(rows, include).await?.pop())
    }

    async fn create(&self, d: DeadlineDraft) -> Result<Deadline, ModelError> {
        Ok(deadline::create(&self.db, fields(&d)).await?.into())
    }

    async fn update(&self, id: i64, d: DeadlineDraft) -> Result<Deadline, ModelError> {
        Ok(deadline::update(&self.db, id, fields(&d)).await?.into())
    }

    async fn delete(&self, id: i64) -> Result<bool, ModelError> {
        deadline::delete(&self.db, id).await
    }
}
