//! In-memory gateways with the same integrity rules as the relational schema:
//! unique email, unique association pair, foreign keys and cascading deletes.
//!
//! Every gateway call is counted, so callers can prove that a rejected input
//! never reached storage.
//!
//! ```
//! use service::repository::memory::MemoryStore;
//! use service::repository::CrudRepository;
//! use service::input::ExerciseDraft;
//! use service::include::Include;
//!
//! let store = MemoryStore::new();
//! let exercises = store.exercises();
//! let squat = tokio_test::block_on(exercises.create(ExerciseDraft { name: "Squat".into(), img: "squat.png".into() })).unwrap();
//! let found = tokio_test::block_on(exercises.find_by_id(squat.id, &Include::none())).unwrap();
//! assert_eq!(found.unwrap().name, "Squat");
//! assert_eq!(store.operations(), 2);
//! ```

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;

use models::errors::ModelError;
use models::{deadline, exercise, habit, todo, user, user_on_exercise};

use super::{CrudRepository, UserExerciseRepository, UserRepository};
use crate::domain::{Deadline, Exercise, Habit, RepMaxes, Todo, User, UserOnExercise, UserSummary};
use crate::include::{Include, Relation};
use crate::input::{ChildLinks, DeadlineDraft, ExerciseDraft, HabitDraft, PairKey, TodoDraft, UserDraft};

#[derive(Default)]
struct Sequences {
    user: i64,
    todo: i64,
    habit: i64,
    deadline: i64,
    exercise: i64,
}

fn next(seq: &mut i64) -> i64 {
    *seq += 1;
    *seq
}

#[derive(Default)]
struct Tables {
    seq: Sequences,
    users: BTreeMap<i64, user::Model>,
    todos: BTreeMap<i64, todo::Model>,
    habits: BTreeMap<i64, habit::Model>,
    deadlines: BTreeMap<i64, deadline::Model>,
    exercises: BTreeMap<i64, exercise::Model>,
    performances: BTreeMap<(i64, i64), user_on_exercise::Model>,
}

impl Tables {
    fn email_taken(&self, email: &str, except: Option<i64>) -> bool {
        self.users.values().any(|u| u.email == email && Some(u.id) != except)
    }

    fn require_user(&self, user_id: i64) -> Result<(), ModelError> {
        if self.users.contains_key(&user_id) {
            Ok(())
        } else {
            Err(ModelError::ForeignKeyViolation(format!("user {user_id} is not referenced by any row")))
        }
    }

    fn check_links(&self, links: &ChildLinks) -> Result<(), ModelError> {
        fn missing<V>(kind: &str, ids: &[i64], table: &BTreeMap<i64, V>) -> Result<(), ModelError> {
            match ids.iter().find(|id| !table.contains_key(*id)) {
                Some(id) => Err(ModelError::NotFound(format!("{kind} {id} does not exist"))),
                None => Ok(()),
            }
        }
        missing("todo", &links.todos, &self.todos)?;
        missing("habit", &links.habits, &self.habits)?;
        missing("deadline", &links.deadlines, &self.deadlines)
    }

    fn link(&mut self, user_id: i64, links: &ChildLinks) {
        for id in &links.todos {
            if let Some(row) = self.todos.get_mut(id) {
                row.user_id = user_id;
            }
        }
        for id in &links.habits {
            if let Some(row) = self.habits.get_mut(id) {
                row.user_id = user_id;
            }
        }
        for id in &links.deadlines {
            if let Some(row) = self.deadlines.get_mut(id) {
                row.user_id = user_id;
            }
        }
    }

    fn owner(&self, user_id: i64, include: &Include) -> Option<UserSummary> {
        if !include.contains(Relation::Owner) {
            return None;
        }
        self.users.get(&user_id).cloned().map(UserSummary::from)
    }

    fn user_record(&self, row: &user::Model, include: &Include) -> User {
        let mut user = User::from(row.clone());
        if include.contains(Relation::Todos) {
            user.todos = self.todos.values().filter(|t| t.user_id == row.id).cloned().map(Todo::from).collect();
        }
        if include.contains(Relation::Habits) {
            user.habits = self.habits.values().filter(|h| h.user_id == row.id).cloned().map(Habit::from).collect();
        }
        if include.contains(Relation::Deadlines) {
            user.deadlines =
                self.deadlines.values().filter(|d| d.user_id == row.id).cloned().map(Deadline::from).collect();
        }
        user
    }

    fn todo_record(&self, row: &todo::Model, include: &Include) -> Todo {
        Todo { owner: self.owner(row.user_id, include), ..Todo::from(row.clone()) }
    }

    fn habit_record(&self, row: &habit::Model, include: &Include) -> Habit {
        Habit { owner: self.owner(row.user_id, include), ..Habit::from(row.clone()) }
    }

    fn deadline_record(&self, row: &deadline::Model, include: &Include) -> Deadline {
        Deadline { owner: self.owner(row.user_id, include), ..Deadline::from(row.clone()) }
    }

    fn exercise_record(&self, row: &exercise::Model, include: &Include) -> Exercise {
        let mut record = Exercise::from(row.clone());
        if include.contains(Relation::Performers) {
            record.users = self
                .performances
                .values()
                .filter(|p| p.exercise_id == row.id)
                .cloned()
                .map(UserOnExercise::from)
                .collect();
        }
        record
    }
}

/// Shared state behind every in-memory gateway handle.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    ops: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> { Arc::new(Self::default()) }

    /// Number of gateway calls served so far.
    pub fn operations(&self) -> usize { self.ops.load(Ordering::SeqCst) }

    fn begin(&self) -> Result<MutexGuard<'_, Tables>, ModelError> {
        self.ops.fetch_add(1, Ordering::SeqCst);
        self.tables.lock().map_err(|_| ModelError::Db("memory store lock poisoned".into()))
    }

    pub fn users(self: &Arc<Self>) -> MemoryUsers { MemoryUsers(self.clone()) }
    pub fn todos(self: &Arc<Self>) -> MemoryTodos { MemoryTodos(self.clone()) }
    pub fn habits(self: &Arc<Self>) -> MemoryHabits { MemoryHabits(self.clone()) }
    pub fn deadlines(self: &Arc<Self>) -> MemoryDeadlines { MemoryDeadlines(self.clone()) }
    pub fn exercises(self: &Arc<Self>) -> MemoryExercises { MemoryExercises(self.clone()) }
    pub fn user_exercises(self: &Arc<Self>) -> MemoryUserExercises { MemoryUserExercises(self.clone()) }
}

pub struct MemoryUsers(Arc<MemoryStore>);
pub struct MemoryTodos(Arc<MemoryStore>);
pub struct MemoryHabits(Arc<MemoryStore>);
pub struct MemoryDeadlines(Arc<MemoryStore>);
pub struct MemoryExercises(Arc<MemoryStore>);
pub struct MemoryUserExercises(Arc<MemoryStore>);

#[async_trait]
impl UserRepository for MemoryUsers {
    async fn find_all(&self, include: &Include) -> Result<Vec<User>, ModelError> {
        let t = self.0.begin()?;
        Ok(t.users.values().map(|u| t.user_record(u, include)).collect())
    }

    async fn find_by_id(&self, id: i64, include: &Include) -> Result<Option<User>, ModelError> {
        let t = self.0.begin()?;
        Ok(t.users.get(&id).map(|u| t.user_record(u, include)))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ModelError> {
        let t = self.0.begin()?;
        Ok(t.users.values().find(|u| u.email == email).cloned().map(User::from))
    }

    async fn create(&self, draft: UserDraft) -> Result<User, ModelError> {
        let mut t = self.0.begin()?;
        if t.email_taken(&draft.email, None) {
            return Err(ModelError::UniqueViolation(format!("user.email {}", draft.email)));
        }
        t.check_links(&draft.links)?;
        let id = next(&mut t.seq.user);
        let row = user::Model {
            id,
            first_name: draft.first_name,
            last_name: draft.last_name,
            email: draft.email,
            password_hash: draft.password_hash,
        };
        t.users.insert(id, row.clone());
        t.link(id, &draft.links);
        Ok(User::from(row))
    }

    async fn update(&self, id: i64, draft: UserDraft) -> Result<User, ModelError> {
        let mut t = self.0.begin()?;
        if !t.users.contains_key(&id) {
            return Err(ModelError::NotFound(format!("user {id} does not exist")));
        }
        if t.email_taken(&draft.email, Some(id)) {
            return Err(ModelError::UniqueViolation(format!("user.email {}", draft.email)));
        }
        t.check_links(&draft.links)?;
        let row = user::Model {
            id,
            first_name: draft.first_name,
            last_name: draft.last_name,
            email: draft.email,
            password_hash: draft.password_hash,
        };
        t.users.insert(id, row.clone());
        t.link(id, &draft.links);
        Ok(User::from(row))
    }

    async fn delete(&self, id: i64) -> Result<bool, ModelError> {
        let mut t = self.0.begin()?;
        if t.users.remove(&id).is_none() {
            return Ok(false);
        }
        t.todos.retain(|_, r| r.user_id != id);
        t.habits.retain(|_, r| r.user_id != id);
        t.deadlines.retain(|_, r| r.user_id != id);
        t.performances.retain(|(u, _), _| *u != id);
        Ok(true)
    }
}

#[async_trait]
impl CrudRepository for MemoryTodos {
    type Record = Todo;
    type Draft = TodoDraft;

    async fn find_all(&self, include: &Include) -> Result<Vec<Todo>, ModelError> {
        let t = self.0.begin()?;
        Ok(t.todos.values().map(|r| t.todo_record(r, include)).collect())
    }

    async fn find_by_id(&self, id: i64, include: &Include) -> Result<Option<Todo>, ModelError> {
        let t = self.0.begin()?;
        Ok(t.todos.get(&id).map(|r| t.todo_record(r, include)))
    }

    async fn create(&self, draft: TodoDraft) -> Result<Todo, ModelError> {
        let mut t = self.0.begin()?;
        t.require_user(draft.user_id)?;
        let id = next(&mut t.seq.todo);
        let row = todo::Model { id, name: draft.name, description: draft.description, user_id: draft.user_id };
        t.todos.insert(id, row.clone());
        Ok(row.into())
    }

    async fn update(&self, id: i64, draft: TodoDraft) -> Result<Todo, ModelError> {
        let mut t = self.0.begin()?;
        if !t.todos.contains_key(&id) {
            return Err(ModelError::NotFound(format!("todo {id} does not exist")));
        }
        t.require_user(draft.user_id)?;
        let row = todo::Model { id, name: draft.name, description: draft.description, user_id: draft.user_id };
        t.todos.insert(id, row.clone());
        Ok(row.into())
    }

    async fn delete(&self, id: i64) -> Result<bool, ModelError> {
        Ok(self.0.begin()?.todos.remove(&id).is_some())
    }
}

#[async_trait]
impl CrudRepository for MemoryHabits {
    type Record = Habit;
    type Draft = HabitDraft;

    async fn find_all(&self, include: &Include) -> Result<Vec<Habit>, ModelError> {
        let t = self.0.begin()?;
        Ok(t.habits.values().map(|r| t.habit_record(r, include)).collect())
    }

    async fn find_by_id(&self, id: i64, include: &Include) -> Result<Option<Habit>, ModelError> {
        let t = self.0.begin()?;
        Ok(t.habits.get(&id).map(|r| t.habit_record(r, include)))
    }

    async fn create(&self, draft: HabitDraft) -> Result<Habit, ModelError> {
        let mut t = self.0.begin()?;
        t.require_user(draft.user_id)?;
        let id = next(&mut t.seq.habit);
        let row = habit::Model {
            id,
            name: draft.name,
            description: draft.description,
            streak: draft.streak,
            updated_at: Utc::now(),
            user_id: draft.user_id,
        };
        t.habits.insert(id, row.clone());
        Ok(row.into())
    }

    async fn update(&self, id: i64, draft: HabitDraft) -> Result<Habit, ModelError> {
        let mut t = self.0.begin()?;
        if !t.habits.contains_key(&id) {
            return Err(ModelError::NotFound(format!("habit {id} does not exist")));
        }
        t.require_user(draft.user_id)?;
        let row = habit::Model {
            id,
            name: draft.name,
            description: draft.description,
            streak: draft.streak,
            updated_at: Utc::now(),
            user_id: draft.user_id,
        };
        t.habits.insert(id, row.clone());
        Ok(row.into())
    }

    async fn delete(&self, id: i64) -> Result<bool, ModelError> {
        Ok(self.0.begin()?.habits.remove(&id).is_some())
    }
}

#[async_trait]
impl CrudRepository for MemoryDeadlines {
    type Record = Deadline;
    type Draft = DeadlineDraft;

    async fn find_all(&self, include: &Include) -> Result<Vec<Deadline>, ModelError> {
        let t = self.0.begin()?;
        Ok(t.deadlines.values().map(|r| t.deadline_record(r, include)).collect())
    }

    async fn find_by_id(&self, id: i64, include: &Include) -> Result<Option<Deadline>, ModelError> {
        let t = self.0.begin()?;
        Ok(t.deadlines.get(&id).map(|r| t.deadline_record(r, include)))
    }

    async fn create(&self, draft: DeadlineDraft) -> Result<Deadline, ModelError> {
        let mut t = self.0.begin()?;
        t.require_user(draft.user_id)?;
        let id = next(&mut t.seq.deadline);
        let row = deadline::Model {
            id,
            name: draft.name,
            subject: draft.subject,
            description: draft.description,
            end_date: draft.end_date,
            user_id: draft.user_id,
        };
        t.deadlines.insert(id, row.clone());
        Ok(row.into())
    }

    async fn update(&self, id: i64, draft: DeadlineDraft) -> Result<Deadline, ModelError> {
        let mut t = self.0.begin()?;
        if !t.deadlines.contains_key(&id) {
            return Err(ModelError::NotFound(format!("deadline {id} does not exist")));
        }
        t.require_user(draft.user_id)?;
        let row = deadline::Model {
            id,
            name: draft.name,
            subject: draft.subject,
            description: draft.description,
            end_date: draft.end_date,
            user_id: draft.user_id,
        };
        t.deadlines.insert(id, row.clone());
        Ok(row.into())
    }

    async fn delete(&self, id: i64) -> Result<bool, ModelError> {
        Ok(self.0.begin()?.deadlines.remove(&id).is_some())
    }
}

#[async_trait]
impl CrudRepository for MemoryExercises {
    type Record = Exercise;
    type Draft = ExerciseDraft;

    async fn find_all(&self, include: &Include) -> Result<Vec<Exercise>, ModelError> {
        let t = self.0.begin()?;
        Ok(t.exercises.values().map(|r| t.exercise_record(r, include)).collect())
    }

    async fn find_by_id(&self, id: i64, include: &Include) -> Result<Option<Exercise>, ModelError> {
        let t = self.0.begin()?;
        Ok(t.exercises.get(&id).map(|r| t.exercise_record(r, include)))
    }

    async fn create(&self, draft: ExerciseDraft) -> Result<Exercise, ModelError> {
        let mut t = self.0.begin()?;
        let id = next(&mut t.seq.exercise);
        let row = exercise::Model { id, name: draft.name, img: draft.img };
        t.exercises.insert(id, row.clone());
        Ok(row.into())
    }

    async fn update(&self, id: i64, draft: ExerciseDraft) -> Result<Exercise, ModelError> {
        let mut t = self.0.begin()?;
        if !t.exercises.contains_key(&id) {
            return Err(ModelError::NotFound(format!("exercise {id} does not exist")));
        }
        let row = exercise::Model { id, name: draft.name, img: draft.img };
        t.exercises.insert(id, row.clone());
        Ok(row.into())
    }

    async fn delete(&self, id: i64) -> Result<bool, ModelError> {
        let mut t = self.0.begin()?;
        if t.exercises.remove(&id).is_none() {
            return Ok(false);
        }
        t.performances.retain(|(_, e), _| *e != id);
        Ok(true)
    }
}

fn performance_row(key: PairKey, metrics: RepMaxes) -> user_on_exercise::Model {
    user_on_exercise::Model {
        user_id: key.user_id,
        exercise_id: key.exercise_id,
        eight_rep_max: metrics.eight_rep_max,
        ten_rep_max: metrics.ten_rep_max,
        twelve_rep_max: metrics.twelve_rep_max,
    }
}

#[async_trait]
impl UserExerciseRepository for MemoryUserExercises {
    async fn find(&self, key: PairKey) -> Result<Option<UserOnExercise>, ModelError> {
        let t = self.0.begin()?;
        Ok(t.performances.get(&(key.user_id, key.exercise_id)).map(|row| UserOnExercise {
            exercise: t.exercises.get(&row.exercise_id).cloned().map(Exercise::from),
            ..UserOnExercise::from(row.clone())
        }))
    }

    async fn insert(&self, key: PairKey, metrics: RepMaxes) -> Result<UserOnExercise, ModelError> {
        let mut t = self.0.begin()?;
        if !t.users.contains_key(&key.user_id) || !t.exercises.contains_key(&key.exercise_id) {
            return Err(ModelError::ForeignKeyViolation(format!(
                "user {} or exercise {} is missing",
                key.user_id, key.exercise_id
            )));
        }
        if t.performances.contains_key(&(key.user_id, key.exercise_id)) {
            return Err(ModelError::UniqueViolation(format!(
                "user_on_exercise ({}, {})",
                key.user_id, key.exercise_id
            )));
        }
        let row = performance_row(key, metrics);
        t.performances.insert((key.user_id, key.exercise_id), row.clone());
        Ok(row.into())
    }

    async fn update(&self, key: PairKey, metrics: RepMaxes) -> Result<UserOnExercise, ModelError> {
        let mut t = self.0.begin()?;
        let Some(slot) = t.performances.get_mut(&(key.user_id, key.exercise_id)) else {
            return Err(ModelError::NotFound(format!(
                "user_on_exercise ({}, {}) does not exist",
                key.user_id, key.exercise_id
            )));
        };
        *slot = performance_row(key, metrics);
        Ok(slot.clone().into())
    }

    async fn delete(&self, key: PairKey) -> Result<bool, ModelError> {
        Ok(self.0.begin()?.performances.remove(&(key.user_id, key.exercise_id)).is_some())
    }
}
