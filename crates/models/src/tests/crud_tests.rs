use anyhow::Result;
use chrono::{TimeZone, Utc};
use sea_orm::{EntityTrait, LoaderTrait, QueryOrder};

use super::setup_test_db;
use crate::{deadline, exercise, habit, todo, user, user_on_exercise};

#[tokio::test]
async fn test_user_crud() -> Result<()> {
    let db = setup_test_db().await?;

    let created = user::create(&db, "Ada", "Lovelace", "ada@example.com", "$argon2id$fake").await?;
    assert!(created.id > 0);

    let by_email = user::find_by_email(&db, "ada@example.com").await?.unwrap();
    assert_eq!(by_email.id, created.id);

    let updated = user::update(&db, created.id, "Augusta", "King", "augusta@example.com", "$argon2id$other").await?;
    assert_eq!(updated.first_name, "Augusta");
    assert_eq!(updated.email, "augusta@example.com");
    assert!(user::find_by_email(&db, "ada@example.com").await?.is_none());

    assert!(user::delete(&db, created.id).await?);
    assert!(!user::delete(&db, created.id).await?);
    assert!(user::Entity::find_by_id(created.id).one(&db).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn test_children_load_per_user() -> Result<()> {
    let db = setup_test_db().await?;
    let a = user::create(&db, "A", "B", "a@x.com", "h").await?;
    let b = user::create(&db, "C", "D", "c@x.com", "h").await?;

    todo::create(&db, "laundry", "whites", a.id).await?;
    todo::create(&db, "dishes", "", a.id).await?;
    habit::create(&db, "run", "5k", 3, b.id).await?;
    let due = Utc.with_ymd_and_hms(2030, 1, 31, 12, 0, 0).unwrap();
    deadline::create(&db, deadline::Fields { name: "thesis", subject: "cs", description: "final", end_date: due, user_id: b.id }).await?;

    let users = user::Entity::find().order_by_asc(user::Column::Id).all(&db).await?;
    let todos = users.load_many(todo::Entity, &db).await?;
    let habits = users.load_many(habit::Entity, &db).await?;
    let deadlines = users.load_many(deadline::Entity, &db).await?;

    assert_eq!(todos[0].len(), 2);
    assert!(todos[1].is_empty());
    assert_eq!(habits[1][0].streak, 3);
    assert_eq!(deadlines[1][0].end_date, due);
    Ok(())
}

#[tokio::test]
async fn test_assign_owner_counts_matched_rows() -> Result<()> {
    let db = setup_test_db().await?;
    let a = user::create(&db, "A", "B", "a@x.com", "h").await?;
    let b = user::create(&db, "C", "D", "c@x.com", "h").await?;
    let t1 = todo::create(&db, "one", "", a.id).await?;
    let t2 = todo::create(&db, "two", "", a.id).await?;

    assert_eq!(todo::assign_owner(&db, &[], b.id).await?, 0);
    assert_eq!(todo::assign_owner(&db, &[t1.id, t2.id, 999], b.id).await?, 2);
    let moved = todo::Entity::find_by_id(t1.id).one(&db).await?.unwrap();
    assert_eq!(moved.user_id, b.id);
    Ok(())
}

#[tokio::test]
async fn test_habit_update_stamps_time() -> Result<()> {
    let db = setup_test_db().await?;
    let u = user::create(&db, "A", "B", "a@x.com", "h").await?;
    let h = habit::create(&db, "read", "10 pages", 0, u.id).await?;
    let updated = habit::update(&db, h.id, "read", "20 pages", 4, u.id).await?;
    assert_eq!(updated.streak, 4);
    assert!(updated.updated_at >= h.updated_at);
    assert!(habit::create(&db, "bad", "", -1, u.id).await.is_err());
    Ok(())
}

#[tokio::test]
async fn test_user_on_exercise_crud() -> Result<()> {
    let db = setup_test_db().await?;
    let u = user::create(&db, "A", "B", "a@x.com", "h").await?;
    let e = exercise::create(&db, "squat", "img/squat.png").await?;
    let metrics = user_on_exercise::Metrics { eight_rep_max: 100, ten_rep_max: 90, twelve_rep_max: 80 };

    let row = user_on_exercise::insert(&db, u.id, e.id, metrics).await?;
    assert_eq!(row.metrics(), metrics);

    let found = user_on_exercise::Entity::find_by_id((u.id, e.id))
        .find_also_related(exercise::Entity)
        .one(&db)
        .await?
        .unwrap();
    assert_eq!(found.1.unwrap().name, "squat");

    let heavier = user_on_exercise::Metrics { eight_rep_max: 110, ten_rep_max: 95, twelve_rep_max: 85 };
    let updated = user_on_exercise::update_metrics(&db, u.id, e.id, heavier).await?;
    assert_eq!(updated.metrics(), heavier);

    assert!(user_on_exercise::delete(&db, u.id, e.id).await?);
    assert!(!user_on_exercise::delete(&db, u.id, e.id).await?);
    Ok(())
}
