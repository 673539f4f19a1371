use anyhow::Result;
use sea_orm::{EntityTrait, Set};

use super::setup_test_db;
use crate::errors::ModelError;
use crate::{exercise, todo, user, user_on_exercise};

#[tokio::test]
async fn duplicate_email_is_unique_violation() -> Result<()> {
    let db = setup_test_db().await?;
    user::create(&db, "A", "B", "dup@x.com", "h").await?;
    let err = user::create(&db, "C", "D", "dup@x.com", "h").await.unwrap_err();
    assert!(matches!(err, ModelError::UniqueViolation(_)), "got {err:?}");
    Ok(())
}

#[tokio::test]
async fn unknown_owner_is_foreign_key_violation() -> Result<()> {
    let db = setup_test_db().await?;
    let err = todo::create(&db, "orphan", "", 4242).await.unwrap_err();
    assert!(matches!(err, ModelError::ForeignKeyViolation(_)), "got {err:?}");
    Ok(())
}

#[tokio::test]
async fn update_of_missing_row_is_not_found() -> Result<()> {
    let db = setup_test_db().await?;
    let err = exercise::update(&db, 77, "bench", "img").await.unwrap_err();
    assert!(matches!(err, ModelError::NotFound(_)), "got {err:?}");
    Ok(())
}

#[tokio::test]
async fn duplicate_pair_is_rejected() -> Result<()> {
    let db = setup_test_db().await?;
    let u = user::create(&db, "A", "B", "a@x.com", "h").await?;
    let e = exercise::create(&db, "deadlift", "img").await?;
    let first = user_on_exercise::Metrics { eight_rep_max: 1, ten_rep_max: 1, twelve_rep_max: 1 };
    let second = user_on_exercise::Metrics { eight_rep_max: 2, ten_rep_max: 2, twelve_rep_max: 2 };
    user_on_exercise::insert(&db, u.id, e.id, first).await?;
    assert!(user_on_exercise::insert(&db, u.id, e.id, second).await.is_err());
    let stored = user_on_exercise::Entity::find_by_id((u.id, e.id)).one(&db).await?.unwrap();
    assert_eq!(stored.metrics(), first);
    Ok(())
}

#[tokio::test]
async fn deleting_user_cascades_to_children() -> Result<()> {
    let db = setup_test_db().await?;
    let u = user::create(&db, "A", "B", "a@x.com", "h").await?;
    let t = todo::create(&db, "x", "", u.id).await?;
    let e = exercise::create(&db, "row", "img").await?;
    user_on_exercise::insert(&db, u.id, e.id, user_on_exercise::Metrics { eight_rep_max: 1, ten_rep_max: 1, twelve_rep_max: 1 }).await?;

    assert!(user::delete(&db, u.id).await?);
    assert!(todo::Entity::find_by_id(t.id).one(&db).await?.is_none());
    assert!(user_on_exercise::Entity::find_by_id((u.id, e.id)).one(&db).await?.is_none());
    assert!(exercise::Entity::find_by_id(e.id).one(&db).await?.is_some());
    Ok(())
}

#[tokio::test]
async fn ids_hold_values_past_i32() -> Result<()> {
    let db = setup_test_db().await?;
    let wide: i64 = i64::from(i32::MAX) + 10;
    let row = exercise::ActiveModel {
        id: Set(wide),
        name: Set("clean".into()),
        img: Set("img".into()),
    };
    exercise::Entity::insert(row).exec(&db).await?;
    let stored = exercise::Entity::find_by_id(wide).one(&db).await?.unwrap();
    assert_eq!(stored.id, wide);

    let next = exercise::create(&db, "jerk", "img").await?;
    assert!(next.id > wide);
    Ok(())
}
