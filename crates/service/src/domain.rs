//! Domain records handed back to callers.
//!
//! Every record is an immutable snapshot built from a storage read; services
//! never patch one in place, an update always yields a fresh snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use models::{deadline, exercise, habit, todo, user, user_on_exercise};

/// Metadata the generic CRUD service needs to name a record kind in errors and logs.
pub trait DomainRecord: Serialize + Clone + Send + Sync + 'static {
    /// Singular, as in "todo 4 does not exist".
    const KIND: &'static str;
    /// Plural, as in "no todos found".
    const PLURAL: &'static str;

    fn id(&self) -> i64;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub todos: Vec<Todo>,
    pub habits: Vec<Habit>,
    pub deadlines: Vec<Deadline>,
}

/// Owner view nested under a child record; never carries credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub user_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<UserSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: i64,
    pub name: String,
    pub description: String,
    /// Caller-managed counter; storage never increments or resets it.
    pub streak: i32,
    pub updated_at: DateTime<Utc>,
    pub user_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<UserSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Deadline {
    pub id: i64,
    pub name: String,
    pub subject: String,
    pub description: String,
    pub end_date: DateTime<Utc>,
    pub user_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<UserSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: i64,
    pub name: String,
    pub img: String,
    /// Filled only when `Relation::Performers` is requested.
    pub users: Vec<UserOnExercise>,
}

/// The three rep-max loads recorded for one user on one exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepMaxes {
    pub eight_rep_max: i32,
    pub ten_rep_max: i32,
    pub twelve_rep_max: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserOnExercise {
    pub user_id: i64,
    pub exercise_id: i64,
    #[serde(flatten)]
    pub metrics: RepMaxes,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exercise: Option<Exercise>,
}

/// A signed bearer credential and the instant it stops being accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl From<user::Model> for User {
    fn from(m: user::Model) -> Self {
        Self {
            id: m.id,
            first_name: m.first_name,
            last_name: m.last_name,
            email: m.email,
            password_hash: m.password_hash,
            todos: Vec::new(),
            habits: Vec::new(),
            deadlines: Vec::new(),
        }
    }
}

impl From<user::Model> for UserSummary {
    fn from(m: user::Model) -> Self {
        Self { id: m.id, first_name: m.first_name, last_name: m.last_name, email: m.email }
    }
}

impl From<todo::Model> for Todo {
    fn from(m: todo::Model) -> Self {
        Self { id: m.id, name: m.name, description: m.description, user_id: m.user_id, owner: None }
    }
}

impl From<habit::Model> for Habit {
    fn from(m: habit::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            description: m.description,
            streak: m.streak,
            updated_at: m.updated_at,
            user_id: m.user_id,
            owner: None,
        }
    }
}

impl From<deadline::Model> for Deadline {
    fn from(m: deadline::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            subject: m.subject,
            description: m.description,
            end_date: m.end_date,
            user_id: m.user_id,
            owner: None,
        }
    }
}

impl From<exercise::Model> for Exercise {
    fn from(m: exercise::Model) -> Self {
        Self { id: m.id, name: m.name, img: m.img, users: Vec::new() }
    }
}

impl From<user_on_exercise::Model> for UserOnExercise {
    fn from(m: user_on_exercise::Model) -> Self {
        Self {
            user_id: m.user_id,
            exercise_id: m.exercise_id,
            metrics: m.metrics().into(),
            exercise: None,
        }
    }
}

impl From<user_on_exercise::Metrics> for RepMaxes {
    fn from(m: user_on_exercise::Metrics) -> Self {
        Self { eight_rep_max: m.eight_rep_max, ten_rep_max: m.ten_rep_max, twelve_rep_max: m.twelve_rep_max }
    }
}

impl From<RepMaxes> for user_on_exercise::Metrics {
    fn from(m: RepMaxes) -> Self {
        Self { eight_rep_max: m.eight_rep_max, ten_rep_max: m.ten_rep_max, twelve_rep_max: m.twelve_rep_max }
    }
}

impl DomainRecord for Todo {
    const KIND: &'static str = "todo";
    const PLURAL: &'static str = "todos";
    fn id(&self) -> i64 { self.id }
}

impl DomainRecord for Habit {
    const KIND: &'static str = "habit";
    const PLURAL: &'static str = "habits";
    fn id(&self) -> i64 { self.id }
}

impl DomainRecord for Deadline {
    const KIND: &'static str = "deadline";
    const PLURAL: &'static str = "deadlines";
    fn id(&self) -> i64 { self.id }
}

impl DomainRecord for Exercise {
    const KIND: &'static str = "exercise";
    const PLURAL: &'static str = "exercises";
    fn id(&self) -> i64 { self.id }
}
