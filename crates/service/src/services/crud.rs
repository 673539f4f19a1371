//! Id-keyed CRUD shared by Todo, Habit, Deadline and Exercise.

use std::sync::Arc;

use tracing::{debug, field, info, instrument, Span};

use models::errors::ModelError;

use crate::domain::DomainRecord;
use crate::errors::ServiceError;
use crate::ident::RawId;
use crate::include::Include;
use crate::input::{DraftRecord, IntoDraft};
use crate::repository::CrudRepository;

pub struct CrudService<R: CrudRepository> {
    repo: Arc<R>,
}

fn kind<R: CrudRepository>() -> &'static str {
    <R::Record as DomainRecord>::KIND
}

/// Give a foreign-key failure its meaning: the owning user is missing.
fn owner_missing(e: ModelError, owner: Option<i64>) -> ServiceError {
    match (e, owner) {
        (ModelError::ForeignKeyViolation(_), Some(user_id)) => ServiceError::not_found("user", user_id),
        (other, _) => other.into(),
    }
}

impl<R: CrudRepository> CrudService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    /// All rows of the kind; zero rows is `EmptyCollection`.
    #[instrument(skip_all, fields(kind = kind::<R>()))]
    pub async fn list_all(&self, include: &Include) -> Result<Vec<R::Record>, ServiceError> {
        let records = self.repo.find_all(include).await?;
        if records.is_empty() {
            return Err(ServiceError::EmptyCollection(<R::Record as DomainRecord>::PLURAL));
        }
        Ok(records)
    }

    #[instrument(skip_all, fields(kind = kind::<R>(), id = field::Empty))]
    pub async fn get_by_id(&self, id: impl Into<RawId>, include: &Include) -> Result<R::Record, ServiceError> {
        let id = id.into().parse()?;
        Span::current().record("id", id);
        self.repo.find_by_id(id, include).await?.ok_or_else(|| {
            debug!("record_not_found");
            ServiceError::not_found(kind::<R>(), id)
        })
    }

    /// Insert a row; the owner reference is trusted to storage's foreign key.
    #[instrument(skip_all, fields(kind = kind::<R>()))]
    pub async fn create<I>(&self, input: I) -> Result<R::Record, ServiceError>
    where
        I: IntoDraft<Draft = R::Draft>,
    {
        let draft = input.into_draft()?;
        let owner = draft.owner_id();
        let record = self.repo.create(draft).await.map_err(|e| owner_missing(e, owner))?;
        info!(id = record.id(), "record_created");
        Ok(record)
    }

    /// Replace every field of an existing row.
    #[instrument(skip_all, fields(kind = kind::<R>(), id = field::Empty))]
    pub async fn update<I>(&self, id: impl Into<RawId>, input: I) -> Result<R::Record, ServiceError>
    where
        I: IntoDraft<Draft = R::Draft>,
    {
        let id = id.into().parse()?;
        Span::current().record("id", id);
        let draft = input.into_draft()?;
        self.get_by_id(id, &Include::none()).await?;

        let owner = draft.owner_id();
        let record = self.repo.update(id, draft).await.map_err(|e| owner_missing(e, owner))?;
        info!("record_updated");
        Ok(record)
    }

    /// Physically delete a row and return its last snapshot.
    #[instrument(skip_all, fields(kind = kind::<R>(), id = field::Empty))]
    pub async fn delete(&self, id: impl Into<RawId>) -> Result<R::Record, ServiceError> {
        let id = id.into().parse()?;
        Span::current().record("id", id);
        let existing = self.get_by_id(id, &Include::none()).await?;
        if !self.repo.delete(id).await? {
            return Err(ServiceError::not_found(kind::<R>(), id));
        }
        info!("record_deleted");
        Ok(existing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    use crate::include::Relation;
    use crate::input::{DeadlineInput, ExerciseInput, HabitInput, TodoInput};
    use crate::repository::memory::MemoryStore;
    use crate::test_support::{user_input, user_service};

    async fn store_with_user() -> anyhow::Result<(Arc<MemoryStore>, i64)> {
        let store = MemoryStore::new();
        let user = user_service(Arc::new(store.users())).create(user_input("a@x.com")).await?;
        Ok((store, user.id))
    }

    fn todo(name: &str, user_id: impl Into<RawId>) -> TodoInput {
        TodoInput { name: name.into(), description: format!("{name} details"), user_id: user_id.into() }
    }

    #[tokio::test]
    async fn empty_kinds_list_as_failure() {
        let store = MemoryStore::new();
        let todos = CrudService::new(Arc::new(store.todos()));
        let exercises = CrudService::new(Arc::new(store.exercises()));
        assert!(matches!(todos.list_all(&Include::none()).await, Err(ServiceError::EmptyCollection("todos"))));
        assert!(matches!(exercises.list_all(&Include::none()).await, Err(ServiceError::EmptyCollection("exercises"))));
    }

    #[tokio::test]
    async fn todo_lifecycle() -> anyhow::Result<()> {
        let (store, uid) = store_with_user().await?;
        let svc = CrudService::new(Arc::new(store.todos()));

        let created = svc.create(todo("shop", uid)).await?;
        assert_eq!(created.user_id, uid);
        assert!(created.owner.is_none());

        let with_owner = svc.get_by_id(created.id.to_string(), &Include::of([Relation::Owner])).await?;
        assert_eq!(with_owner.owner.map(|o| o.email), Some("a@x.com".to_string()));

        let updated = svc.update(created.id, todo("cook", uid)).await?;
        assert_eq!(updated.name, "cook");
        let fetched = svc.get_by_id(created.id, &Include::none()).await?;
        assert_eq!(fetched, updated);

        let removed = svc.delete(created.id).await?;
        assert_eq!(removed.name, "cook");
        assert!(matches!(svc.get_by_id(created.id, &Include::none()).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn unknown_owner_is_not_found() -> anyhow::Result<()> {
        let (store, _uid) = store_with_user().await?;
        let svc = CrudService::new(Arc::new(store.todos()));
        let err = svc.create(todo("orphan", 404)).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(ref m) if m.contains("user 404")));
        Ok(())
    }

    #[tokio::test]
    async fn malformed_ids_never_reach_storage() -> anyhow::Result<()> {
        let (store, uid) = store_with_user().await?;
        let svc = CrudService::new(Arc::new(store.habits()));
        let before = store.operations();

        assert!(matches!(svc.get_by_id("x1", &Include::none()).await, Err(ServiceError::InvalidIdentifier(_))));
        assert!(matches!(svc.delete("").await, Err(ServiceError::InvalidIdentifier(_))));
        let habit = HabitInput { name: "run".into(), description: "".into(), streak: 0, user_id: "me".into() };
        assert!(matches!(svc.create(habit).await, Err(ServiceError::InvalidIdentifier(_))));
        let habit = HabitInput { name: "run".into(), description: "".into(), streak: 0, user_id: uid.into() };
        assert!(matches!(svc.update("1.5", habit).await, Err(ServiceError::InvalidIdentifier(_))));

        assert_eq!(store.operations(), before);
        Ok(())
    }

    #[tokio::test]
    async fn missing_delete_has_no_side_effect() -> anyhow::Result<()> {
        let (store, uid) = store_with_user().await?;
        let svc = CrudService::new(Arc::new(store.todos()));
        svc.create(todo("keep", uid)).await?;
        assert!(matches!(svc.delete(77).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(svc.update(77, todo("x", uid)).await, Err(ServiceError::NotFound(_))));
        assert_eq!(svc.list_all(&Include::none()).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn habit_streak_is_caller_managed() -> anyhow::Result<()> {
        let (store, uid) = store_with_user().await?;
        let svc = CrudService::new(Arc::new(store.habits()));
        let created = svc
            .create(HabitInput { name: "read".into(), description: "20 pages".into(), streak: 5, user_id: uid.into() })
            .await?;
        assert_eq!(created.streak, 5);

        let reset = svc
            .update(created.id, HabitInput { name: "read".into(), description: "20 pages".into(), streak: 0, user_id: uid.into() })
            .await?;
        assert_eq!(reset.streak, 0);
        assert!(reset.updated_at >= created.updated_at);
        Ok(())
    }

    #[tokio::test]
    async fn deadline_round_trip() -> anyhow::Result<()> {
        let (store, uid) = store_with_user().await?;
        let svc = CrudService::new(Arc::new(store.deadlines()));
        let due = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let input = |name: &str| DeadlineInput {
            name: name.into(),
            subject: "Maths".into(),
            description: "final exam".into(),
            end_date: due,
            user_id: uid.into(),
        };
        let created = svc.create(input("exam")).await?;
        svc.update(created.id, input("retake")).await?;
        let fetched = svc.get_by_id(created.id, &Include::none()).await?;
        assert_eq!((fetched.name.as_str(), fetched.subject.as_str(), fetched.end_date), ("retake", "Maths", due));
        Ok(())
    }

    #[tokio::test]
    async fn exercise_performers_hydrate_on_request() -> anyhow::Result<()> {
        use crate::domain::RepMaxes;
        use crate::input::PairKey;
        use crate::repository::UserExerciseRepository;

        let (store, uid) = store_with_user().await?;
        let svc = CrudService::new(Arc::new(store.exercises()));
        let bench = svc.create(ExerciseInput { name: "Bench".into(), img: "bench.png".into() }).await?;
        store
            .user_exercises()
            .insert(PairKey::new(uid, bench.id), RepMaxes { eight_rep_max: 60, ten_rep_max: 55, twelve_rep_max: 50 })
            .await?;

        assert!(svc.get_by_id(bench.id, &Include::none()).await?.users.is_empty());
        let hydrated = svc.get_by_id(bench.id, &Include::of([Relation::Performers])).await?;
        assert_eq!(hydrated.users.len(), 1);
        assert_eq!(hydrated.users[0].metrics.eight_rep_max, 60);
        assert!(hydrated.users[0].exercise.is_none());
        Ok(())
    }
}
