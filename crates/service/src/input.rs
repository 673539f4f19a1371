//! Typed input records and their validated, storage-ready drafts.
//!
//! The boundary layer deserializes a request into one of the `*Input`
//! records; the services turn it into a draft here before storage sees it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::RepMaxes;
use crate::errors::ServiceError;
use crate::ident::{parse_all, RawId};

pub const MIN_PASSWORD_LEN: usize = 8;

fn required(field: &str, value: &str) -> Result<(), ServiceError> {
    if value.trim().is_empty() {
        return Err(ServiceError::Validation(format!("{field} must not be blank")));
    }
    Ok(())
}

fn link_ids(ids: &[RawId]) -> Result<Vec<i64>, ServiceError> {
    let mut parsed = parse_all(ids)?;
    parsed.sort_unstable();
    parsed.dedup();
    Ok(parsed)
}

/// Converts an input record into the draft its gateway stores.
pub trait IntoDraft {
    type Draft: DraftRecord;

    fn into_draft(self) -> Result<Self::Draft, ServiceError>;
}

/// A validated draft ready to be written.
pub trait DraftRecord: Send + Sync + 'static {
    /// The user a child row points at, if the kind has an owner.
    fn owner_id(&self) -> Option<i64> { None }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub todos_ids: Vec<RawId>,
    #[serde(default)]
    pub habits_ids: Vec<RawId>,
    #[serde(default)]
    pub deadlines_ids: Vec<RawId>,
}

/// Existing child rows to re-point at a user, deduplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChildLinks {
    pub todos: Vec<i64>,
    pub habits: Vec<i64>,
    pub deadlines: Vec<i64>,
}

impl ChildLinks {
    pub fn is_empty(&self) -> bool {
        self.todos.is_empty() && self.habits.is_empty() && self.deadlines.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct UserDraft {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub links: ChildLinks,
}

impl UserInput {
    /// Checks the record's shape and parses its link lists. The password is
    /// hashed by the caller, so this stops short of building a draft.
    pub fn validate(&self) -> Result<ChildLinks, ServiceError> {
        required("firstName", &self.first_name)?;
        required("lastName", &self.last_name)?;
        required("email", &self.email)?;
        if !self.email.contains('@') {
            return Err(ServiceError::Validation(format!("email {:?} is not an address", self.email)));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ServiceError::Validation(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        Ok(ChildLinks {
            todos: link_ids(&self.todos_ids)?,
            habits: link_ids(&self.habits_ids)?,
            deadlines: link_ids(&self.deadlines_ids)?,
        })
    }

    pub fn into_draft(self, password_hash: String, links: ChildLinks) -> UserDraft {
        UserDraft {
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            password_hash,
            links,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoInput {
    pub name: String,
    pub description: String,
    pub user_id: RawId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoDraft {
    pub name: String,
    pub description: String,
    pub user_id: i64,
}

impl IntoDraft for TodoInput {
    type Draft = TodoDraft;

    fn into_draft(self) -> Result<TodoDraft, ServiceError> {
        let user_id = self.user_id.parse()?;
        required("name", &self.name)?;
        Ok(TodoDraft { name: self.name, description: self.description, user_id })
    }
}

impl DraftRecord for TodoDraft {
    fn owner_id(&self) -> Option<i64> { Some(self.user_id) }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitInput {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub streak: i32,
    pub user_id: RawId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HabitDraft {
    pub name: String,
    pub description: String,
    pub streak: i32,
    pub user_id: i64,
}

impl IntoDraft for HabitInput {
    type Draft = HabitDraft;

    fn into_draft(self) -> Result<HabitDraft, ServiceError> {
        let user_id = self.user_id.parse()?;
        required("name", &self.name)?;
        if self.streak < 0 {
            return Err(ServiceError::Validation("streak must not be negative".into()));
        }
        Ok(HabitDraft { name: self.name, description: self.description, streak: self.streak, user_id })
    }
}

impl DraftRecord for HabitDraft {
    fn owner_id(&self) -> Option<i64> { Some(self.user_id) }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeadlineInput {
    pub name: String,
    pub subject: String,
    pub description: String,
    pub end_date: DateTime<Utc>,
    pub user_id: RawId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeadlineDraft {
    pub name: String,
    pub subject: String,
    pub description: String,
    pub end_date: DateTime<Utc>,
    pub user_id: i64,
}

impl IntoDraft for DeadlineInput {
    type Draft = DeadlineDraft;

    fn into_draft(self) -> Result<DeadlineDraft, ServiceError> {
        let user_id = self.user_id.parse()?;
        required("name", &self.name)?;
        required("subject", &self.subject)?;
        Ok(DeadlineDraft {
            name: self.name,
            subject: self.subject,
            description: self.description,
            end_date: self.end_date,
            user_id,
        })
    }
}

impl DraftRecord for DeadlineDraft {
    fn owner_id(&self) -> Option<i64> { Some(self.user_id) }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExerciseInput {
    pub name: String,
    pub img: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExerciseDraft {
    pub name: String,
    pub img: String,
}

impl IntoDraft for ExerciseInput {
    type Draft = ExerciseDraft;

    fn into_draft(self) -> Result<ExerciseDraft, ServiceError> {
        required("name", &self.name)?;
        Ok(ExerciseDraft { name: self.name, img: self.img })
    }
}

impl DraftRecord for ExerciseDraft {}

/// Composite identity of a UserOnExercise row, both halves validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PairKey {
    pub user_id: i64,
    pub exercise_id: i64,
}

impl PairKey {
    pub fn new(user_id: i64, exercise_id: i64) -> Self { Self { user_id, exercise_id } }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserExerciseKey {
    pub user_id: RawId,
    pub exercise_id: RawId,
}

impl UserExerciseKey {
    pub fn new(user_id: impl Into<RawId>, exercise_id: impl Into<RawId>) -> Self {
        Self { user_id: user_id.into(), exercise_id: exercise_id.into() }
    }

    pub fn parse(&self) -> Result<PairKey, ServiceError> {
        Ok(PairKey { user_id: self.user_id.parse()?, exercise_id: self.exercise_id.parse()? })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserExerciseInput {
    pub user_id: RawId,
    pub exercise_id: RawId,
    pub eight_rep_max: i32,
    pub ten_rep_max: i32,
    pub twelve_rep_max: i32,
}

impl UserExerciseInput {
    pub fn into_parts(self) -> Result<(PairKey, RepMaxes), ServiceError> {
        let key = UserExerciseKey { user_id: self.user_id, exercise_id: self.exercise_id }.parse()?;
        let metrics = RepMaxes {
            eight_rep_max: self.eight_rep_max,
            ten_rep_max: self.ten_rep_max,
            twelve_rep_max: self.twelve_rep_max,
        };
        metrics.validate()?;
        Ok((key, metrics))
    }
}

impl RepMaxes {
    pub fn validate(&self) -> Result<(), ServiceError> {
        if self.eight_rep_max < 0 || self.ten_rep_max < 0 || self.twelve_rep_max < 0 {
            return Err(ServiceError::Validation("rep-max metrics must not be negative".into()));
        }
        Ok(())
    }
}
