use async_trait::async_trait;
use sea_orm::{ConnectionTrait, DatabaseConnection, EntityTrait, LoaderTrait, QueryOrder, TransactionTrait};

use models::errors::ModelError;
use models::{deadline, habit, todo, user};

use crate::domain::{Deadline, Habit, Todo, User};
use crate::include::{Include, Relation};
use crate::input::{ChildLinks, UserDraft};
use crate::repository::UserRepository;

pub struct SeaOrmUserRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }

    async fn hydrate(&self, rows: Vec<user::Model>, include: &Include) -> Result<Vec<User>, ModelError> {
        let todos = if include.contains(Relation::Todos) {
            rows.load_many(todo::Entity::find().order_by_asc(todo::Column::Id), &self.db).await?
        } else {
            vec![Vec::new(); rows.len()]
        };
        let habits = if include.contains(Relation::Habits) {
            rows.load_many(habit::Entity::find().order_by_asc(habit::Column::Id), &self.db).await?
        } else {
            vec![Vec::new(); rows.len()]
        };
        let deadlines = if include.contains(Relation::Deadlines) {
            rows.load_many(deadline::Entity::find().order_by_asc(deadline::Column::Id), &self.db).await?
        } else {
            vec![Vec::new(); rows.len()]
        };

        Ok(rows
            .into_iter()
            .zip(todos)
            .zip(habits)
            .zip(deadlines)
            .map(|(((row, todos), habits), deadlines)| User {
                todos: todos.into_iter().map(Todo::from).collect(),
                habits: habits.into_iter().map(Habit::from).collect(),
                deadlines: deadlines.into_iter().map(Deadline::from).collect(),
                ..User::from(row)
            })
            .collect())
    }
}

fn expect_linked(kind: &str, ids: &[i64], matched: u64) -> Result<(), ModelError> {
    if matched == ids.len() as u64 {
        return Ok(());
    }
    Err(ModelError::NotFound(format!("one or more {kind} ids in {ids:?} do not exist")))
}

/// Re-point listed children at `user_id`; any id that matched no row fails.
async fn link_children<C: ConnectionTrait>(db: &C, user_id: i64, links: &ChildLinks) -> Result<(), ModelError> {
    expect_linked("todo", &links.todos, todo::assign_owner(db, &links.todos, user_id).await?)?;
    expect_linked("habit", &links.habits, habit::assign_owner(db, &links.habits, user_id).await?)?;
    expect_linked("deadline", &links.deadlines, deadline::assign_owner(db, &links.deadlines, user_id).await?)
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn find_all(&self, include: &Include) -> Result<Vec<User>, ModelError> {
        let rows = user::Entity::find().order_by_asc(user::Column::Id).all(&self.db).await?;
        self.hydrate(rows, include).await
    }

    async fn find_by_id(&self, id: i64, include: &Include) -> Result<Option<User>, ModelError> {
        let Some(row) = user::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };
        Ok(self.hydrate(vec![row], include).await?.pop())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ModelError> {
        Ok(user::find_by_email(&self.db, email).await?.map(User::from))
    }

    async fn create(&self, draft: UserDraft) -> Result<User, ModelError> {
        let txn = self.db.begin().await?;
        let row = user::create(&txn, &draft.first_name, &draft.last_name, &draft.email, &draft.password_hash).await?;
        link_children(&txn, row.id, &draft.links).await?;
        txn.commit().await?;
        Ok(User::from(row))
    }

    async fn update(&self, id: i64, draft: UserDraft) -> Result<User, ModelError> {
        let txn = self.db.begin().await?;
        let row =
            user::update(&txn, id, &draft.first_name, &draft.last_name, &draft.email, &draft.password_hash).await?;
        link_children(&txn, id, &draft.links).await?;
        txn.commit().await?;
        Ok(User::from(row))
    }

    async fn delete(&self, id: i64) -> Result<bool, ModelError> {
        user::delete(&self.db, id).await
    }
}
