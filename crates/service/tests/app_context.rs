use migration::MigratorTrait;
use service::errors::ServiceError;
use service::include::Include;
use service::input::{ExerciseInput, LoginInput, UserExerciseInput, UserExerciseKey, UserInput};
use service::AppContext;

use configs::{AppConfig, PasswordHashConfig};

fn config() -> AppConfig {
    let mut cfg = AppConfig::default();
    cfg.database.url = "sqlite::memory:".into();
    cfg.database.max_connections = 1;
    cfg.database.min_connections = 1;
    cfg.auth.jwt_secret = "integration-secret".into();
    cfg.auth.password = PasswordHashConfig { memory_kib: 64, iterations: 1, parallelism: 1 };
    cfg
}

#[tokio::test]
async fn signup_login_and_track_a_lift() -> anyhow::Result<()> {
    let cfg = config();
    let ctx = AppContext::connect(&cfg).await?;
    migration::Migrator::up(&ctx.db, None).await?;

    let user = ctx
        .users
        .create(UserInput {
            first_name: "A".into(),
            last_name: "B".into(),
            email: "a@x.com".into(),
            password: "pw123456".into(),
            todos_ids: vec![],
            habits_ids: vec![],
            deadlines_ids: vec![],
        })
        .await?;

    let issued = ctx.users.authenticate(LoginInput { email: "a@x.com".into(), password: "pw123456".into() }).await?;
    let claims = ctx.tokens.verify(&issued.token)?;
    assert_eq!(claims.sub, "a@x.com");
    assert_eq!(claims.iss, cfg.auth.jwt_issuer);

    let wrong = ctx.users.authenticate(LoginInput { email: "a@x.com".into(), password: "wrong".into() }).await;
    let err = wrong.unwrap_err();
    assert!(matches!(err, ServiceError::InvalidCredentials));
    assert_eq!(err.http_status(), 401);

    let lift = ctx.exercises.create(ExerciseInput { name: "Deadlift".into(), img: "deadlift.png".into() }).await?;
    let input = || UserExerciseInput {
        user_id: user.id.into(),
        exercise_id: lift.id.to_string().into(),
        eight_rep_max: 140,
        ten_rep_max: 130,
        twelve_rep_max: 120,
    };
    ctx.user_exercises.add(input()).await?;
    let dup = ctx.user_exercises.add(input()).await.unwrap_err();
    assert!(matches!(dup, ServiceError::DuplicateAssociation { .. }));

    let pair = ctx.user_exercises.get(&UserExerciseKey::new(user.id, lift.id)).await?;
    assert_eq!(pair.metrics.ten_rep_max, 130);

    assert!(matches!(ctx.todos.list_all(&Include::none()).await, Err(ServiceError::EmptyCollection("todos"))));
    assert!(matches!(ctx.habits.get_by_id("abc", &Include::none()).await, Err(ServiceError::InvalidIdentifier(_))));
    Ok(())
}
