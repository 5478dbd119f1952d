//! # Hearth-Hub Session Benchmarks
//!
//! | Area | Operation | Target |
//! |------|-----------|--------|
//! | shared-types | UserContext encode/decode | < 10us |
//! | hh-01 Session | token mint + validate | < 50us |
//! | hh-01 Session | registry token lookup (1k sessions) | < 100us |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use hh_01_session::{
    InMemoryAccountStore, LoginApi, LoginService, MapEnvironment, SecurityToken, SessionConfig,
    SessionRegistry, SystemTimeSource, UserContext, UserRole,
};
use shared_types::Persistable;

fn service() -> LoginService<InMemoryAccountStore, SystemTimeSource, MapEnvironment> {
    let config = SessionConfig {
        hmac_secret: [0x42; 32],
        ..SessionConfig::default()
    };
    LoginService::new(
        config,
        InMemoryAccountStore::new(),
        SystemTimeSource,
        MapEnvironment::new(),
    )
}

fn sample_context() -> UserContext {
    let mut ctx = UserContext::logged_in(
        "admin",
        UserRole::SystemAdmin,
        SecurityToken::from_payload(&[0x5A; 64]),
        "/User/Admin/Main",
    );
    for i in 0..9 {
        ctx.set_env_rtv_at(i, format!("value-{i}")).unwrap();
    }
    ctx
}

fn bench_context_persistence(c: &mut Criterion) {
    let mut group = c.benchmark_group("shared-types-envelope");
    let ctx = sample_context();
    let bytes = ctx.to_bytes().unwrap();

    group.bench_function("user_context_encode", |b| {
        b.iter(|| black_box(ctx.to_bytes().unwrap()))
    });
    group.bench_function("user_context_decode", |b| {
        b.iter(|| black_box(UserContext::from_bytes(&bytes).unwrap()))
    });
    group.finish();
}

fn bench_token_lifecycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("hh-01-session-token");
    let service = service();
    let token = service.mint_token().unwrap();

    group.bench_function("mint_token", |b| {
        b.iter(|| black_box(service.mint_token().unwrap()))
    });
    group.bench_function("validate_token", |b| {
        b.iter(|| black_box(service.validate_token(&token).unwrap()))
    });
    group.finish();
}

fn bench_registry_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("hh-01-session-registry");
    let service = service();

    for size in [10, 100, 1_000] {
        let registry = SessionRegistry::new();
        let mut last = SecurityToken::new();
        for _ in 0..size {
            let token = service.mint_token().unwrap();
            last = token.clone();
            registry.open(UserContext::logged_in(
                "user",
                UserRole::NormalUser,
                token,
                "/User",
            ));
        }
        group.bench_with_input(BenchmarkId::new("find_by_token", size), &last, |b, t| {
            b.iter(|| black_box(registry.find_by_token(t)))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_context_persistence,
    bench_token_lifecycle,
    bench_registry_lookup
);
criterion_main!(benches);
