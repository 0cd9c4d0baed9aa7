use criterion::{criterion_group, criterion_main, Criterion};
use std::sync::Arc;

use service::auth::UserId;
use service::refueling::repo::memory::InMemoryRefuelingRepository;
use service::refueling::{RefuelingParams, RefuelingService};

fn bench_validate(c: &mut Criterion) {
    let valid = RefuelingParams::new("42.75", "612.4", "189.90");
    let invalid = RefuelingParams::new("", "abc", "1e400");
    c.bench_function("refueling_validate_ok", |b| b.iter(|| valid.validate().is_ok()));
    c.bench_function("refueling_validate_errors", |b| b.iter(|| invalid.validate().is_err()));
}

fn bench_list(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let svc = RefuelingService::new(Arc::new(InMemoryRefuelingRepository::new()));
    let owner = UserId::new();
    let params = RefuelingParams::new("30", "600", "150");
    rt.block_on(async {
        for _ in 0..500 {
            svc.create(owner, &params).await.unwrap();
            svc.create(UserId::new(), &params).await.unwrap();
        }
    });

    c.bench_function("refueling_list_owner", |b| {
        b.to_async(&rt).iter(|| async { svc.list(owner).await.unwrap().len() });
    });
}

criterion_group!(benches, bench_validate, bench_list);
criterion_main!(benches);
