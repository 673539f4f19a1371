use criterion::{criterion_group, criterion_main, Criterion};
use std::sync::Arc;

use configs::AuthConfig;
use service::auth::{CredentialHasher, TokenIssuer};
use service::input::{LoginInput, UserInput};
use service::repository::memory::MemoryStore;
use service::services::UserService;

fn bench_authenticate(c: &mut Criterion) {
    // production argon2 cost, so the numbers reflect a real login
    let cfg = AuthConfig { jwt_secret: "bench-secret".into(), ..AuthConfig::default() };
    let hasher = CredentialHasher::new(&cfg.password).unwrap();
    let svc = UserService::new(Arc::new(MemoryStore::new().users()), hasher, TokenIssuer::new(&cfg));

    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(svc.create(UserInput {
        first_name: "Bench".into(),
        last_name: "User".into(),
        email: "bench@example.com".into(),
        password: "Benchmark1".into(),
        todos_ids: vec![],
        habits_ids: vec![],
        deadlines_ids: vec![],
    }))
    .unwrap();

    c.bench_function("user_authenticate", |b| {
        b.to_async(&rt).iter(|| async {
            svc.authenticate(LoginInput { email: "bench@example.com".into(), password: "Benchmark1".into() })
                .await
                .unwrap()
        });
    });

    c.bench_function("token_issue", |b| {
        let tokens = TokenIssuer::new(&cfg);
        b.to_async(&rt).iter(|| async { tokens.issue("bench@example.com").await.unwrap() });
    });
}

criterion_group!(benches, bench_authenticate);
criterion_main!(benches);
