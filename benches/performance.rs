use chrono::{Duration, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use uuid::Uuid;

use monopoly_bank::auth::{hash_password, verify_password, TokenSigner};
use monopoly_bank::models::{LockedBalance, TransactionRecord, TransferRequest};
use monopoly_bank::observability::LatencyTimer;

fn benchmark_tokens(c: &mut Criterion) {
    let mut group = c.benchmark_group("token");
    let signer = TokenSigner::new("bench-secret", Duration::hours(24));
    let user_id = Uuid::new_v4();
    let now = Utc::now();
    let token = signer.issue(user_id, now).unwrap();

    group.bench_function("issue", |b| {
        b.iter(|| black_box(signer.issue(black_box(user_id), now)));
    });

    group.bench_function("verify", |b| {
        b.iter(|| black_box(signer.verify(black_box(&token), now)));
    });

    group.finish();
}

fn benchmark_password_hashing(c: &mut Criterion) {
    let mut group = c.benchmark_group("password");
    group.sample_size(20);

    for cost in [4u32, 10].iter() {
        group.bench_with_input(BenchmarkId::new("hash", cost), cost, |b, &cost| {
            b.iter(|| black_box(hash_password(black_box("correct horse"), cost)));
        });
    }

    let stored = hash_password("correct horse", 10).unwrap();
    group.bench_function("verify_cost_10", |b| {
        b.iter(|| black_box(verify_password(black_box("correct horse"), &stored)));
    });

    group.finish();
}

fn benchmark_transfer_planning(c: &mut Criterion) {
    let mut group = c.benchmark_group("transfer");
    let from = LockedBalance {
        id: Uuid::new_v4(),
        balance: 1_000_000,
    };
    let to = LockedBalance {
        id: Uuid::new_v4(),
        balance: 0,
    };
    let request = TransferRequest::new(from.id, to.id, 250);

    group.bench_function("validate_and_settle", |b| {
        b.iter(|| {
            let request = black_box(request);
            request.validate().ok();
            black_box(request.lock_order());
            black_box(request.settle(&from, &to).ok())
        });
    });

    group.bench_function("record_pair", |b| {
        b.iter(|| {
            let transfer_id = Uuid::new_v4();
            black_box(TransactionRecord::debit(transfer_id, from.id, 250));
            black_box(TransactionRecord::credit(transfer_id, to.id, 250))
        });
    });

    group.finish();
}

fn benchmark_latency_timer(c: &mut Criterion) {
    c.bench_function("latency_timer", |b| {
        b.iter(|| {
            let timer = LatencyTimer::new();
            black_box(timer.elapsed_ms())
        });
    });
}

criterion_group!(
    benches,
    benchmark_tokens,
    benchmark_password_hashing,
    benchmark_transfer_planning,
    benchmark_latency_timer,
);
criterion_main!(benches);
