//! Lifecycle of the associative entity: a user's rep-max metrics on one exercise.
//!
//! Every operation is keyed by the full `(userId, exerciseId)` pair.

use std::sync::Arc;

use tracing::{debug, field, info, instrument, Span};

use models::errors::ModelError;

use crate::domain::{RepMaxes, UserOnExercise};
use crate::errors::ServiceError;
use crate::input::{PairKey, UserExerciseInput, UserExerciseKey};
use crate::repository::UserExerciseRepository;

pub struct UserExerciseService<R: UserExerciseRepository> {
    repo: Arc<R>,
}

fn record_pair(key: PairKey) {
    let span = Span::current();
    span.record("user_id", key.user_id);
    span.record("exercise_id", key.exercise_id);
}

impl<R: UserExerciseRepository> UserExerciseService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    /// Associate a user with an exercise and return the pair with its
    /// exercise hydrated. An existing pair is never overwritten; it fails
    /// with `DuplicateAssociation`.
    ///
    /// # Examples
    /// ```
    /// use service::repository::memory::MemoryStore;
    /// use service::services::UserExerciseService;
    /// use service::input::UserExerciseInput;
    /// use service::errors::ServiceError;
    /// use std::sync::Arc;
    ///
    /// let store = MemoryStore::new();
    /// let svc = UserExerciseService::new(Arc::new(store.user_exercises()));
    /// let input = UserExerciseInput { user_id: 1.into(), exercise_id: 2.into(), eight_rep_max: 100, ten_rep_max: 90, twelve_rep_max: 80 };
    /// // neither side exists yet
    /// let err = tokio_test::block_on(svc.add(input)).unwrap_err();
    /// assert!(matches!(err, ServiceError::NotFound(_)));
    /// ```
    #[instrument(skip_all, fields(user_id = field::Empty, exercise_id = field::Empty))]
    pub async fn add(&self, input: UserExerciseInput) -> Result<UserOnExercise, ServiceError> {
        let (key, metrics) = input.into_parts()?;
        record_pair(key);
        self.repo.insert(key, metrics).await.map_err(|e| match e {
            ModelError::UniqueViolation(_) => {
                debug!("pair already associated");
                ServiceError::DuplicateAssociation { user_id: key.user_id, exercise_id: key.exercise_id }
            }
            ModelError::ForeignKeyViolation(_) => ServiceError::NotFound(format!(
                "user {} or exercise {} does not exist",
                key.user_id, key.exercise_id
            )),
            other => other.into(),
        })?;
        info!(
            eight_rep_max = metrics.eight_rep_max,
            ten_rep_max = metrics.ten_rep_max,
            twelve_rep_max = metrics.twelve_rep_max,
            "association_added"
        );
        self.find(key).await
    }

    /// The pair's metrics with its exercise hydrated.
    #[instrument(skip_all, fields(user_id = field::Empty, exercise_id = field::Empty))]
    pub async fn get(&self, key: &UserExerciseKey) -> Result<UserOnExercise, ServiceError> {
        let key = key.parse()?;
        record_pair(key);
        self.find(key).await
    }

    async fn find(&self, key: PairKey) -> Result<UserOnExercise, ServiceError> {
        self.repo.find(key).await?.ok_or_else(|| {
            debug!("association_not_found");
            ServiceError::NotFound(format!(
                "user {} is not associated with exercise {}",
                key.user_id, key.exercise_id
            ))
        })
    }

    /// Replace all three metrics at once; the result carries the exercise.
    #[instrument(skip_all, fields(user_id = field::Empty, exercise_id = field::Empty))]
    pub async fn update(&self, key: &UserExerciseKey, metrics: RepMaxes) -> Result<UserOnExercise, ServiceError> {
        let key = key.parse()?;
        record_pair(key);
        metrics.validate()?;
        self.find(key).await?;
        self.repo.update(key, metrics).await?;
        info!("association_updated");
        self.find(key).await
    }

    /// Remove the pair and return its last snapshot.
    #[instrument(skip_all, fields(user_id = field::Empty, exercise_id = field::Empty))]
    pub async fn delete(&self, key: &UserExerciseKey) -> Result<UserOnExercise, ServiceError> {
        let key = key.parse()?;
        record_pair(key);
        let existing = self.find(key).await?;
        if !self.repo.delete(key).await? {
            return Err(ServiceError::NotFound(format!(
                "user {} is not associated with exercise {}",
                key.user_id, key.exercise_id
            )));
        }
        info!("association_deleted");
        Ok(existing)
    }
}
