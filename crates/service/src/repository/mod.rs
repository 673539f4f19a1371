//! Persistence gateways.
//!
//! Gateways map stored rows to domain records and hydrate the relations a
//! read asks for. They own no business rules; failures come back as
//! `ModelError` and the services give them domain meaning.

use async_trait::async_trait;

use models::errors::ModelError;

use crate::domain::{DomainRecord, User, UserOnExercise, RepMaxes};
use crate::include::Include;
use crate::input::{DraftRecord, PairKey, UserDraft};

pub mod memory;
pub mod seaorm;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_all(&self, include: &Include) -> Result<Vec<User>, ModelError>;
    async fn find_by_id(&self, id: i64, include: &Include) -> Result<Option<User>, ModelError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ModelError>;
    /// Insert the user and re-point its linked children in one transaction.
    /// An unknown link id rolls everything back with `ModelError::NotFound`.
    async fn create(&self, draft: UserDraft) -> Result<User, ModelError>;
    /// Replace every column; links are added, existing ones are never removed.
    async fn update(&self, id: i64, draft: UserDraft) -> Result<User, ModelError>;
    async fn delete(&self, id: i64) -> Result<bool, ModelError>;
}

/// Id-keyed gateway shared by Todo, Habit, Deadline and Exercise.
#[async_trait]
pub trait CrudRepository: Send + Sync {
    type Record: DomainRecord;
    type Draft: DraftRecord;

    async fn find_all(&self, include: &Include) -> Result<Vec<Self::Record>, ModelError>;
    async fn find_by_id(&self, id: i64, include: &Include) -> Result<Option<Self::Record>, ModelError>;
    async fn create(&self, draft: Self::Draft) -> Result<Self::Record, ModelError>;
    async fn update(&self, id: i64, draft: Self::Draft) -> Result<Self::Record, ModelError>;
    async fn delete(&self, id: i64) -> Result<bool, ModelError>;
}

/// Gateway for the associative entity; every call takes the full pair.
#[async_trait]
pub trait UserExerciseRepository: Send + Sync {
    /// Lookup with the exercise hydrated.
    async fn find(&self, key: PairKey) -> Result<Option<UserOnExercise>, ModelError>;
    /// Single atomic insert; an existing pair is `ModelError::UniqueViolation`.
    async fn insert(&self, key: PairKey, metrics: RepMaxes) -> Result<UserOnExercise, ModelError>;
    async fn update(&self, key: PairKey, metrics: RepMaxes) -> Result<UserOnExercise, ModelError>;
    async fn delete(&self, key: PairKey) -> Result<bool, ModelError>;
}
