use criterion::{black_box, criterion_group, criterion_main, Criterion};
use votelock_escrow::CheckpointSeries;

fn bench_value_at(c: &mut Criterion) {
    let mut series = CheckpointSeries::new();
    for i in 0..100_000u64 {
        series.append(i * 10, (100_000 - i) as u128).unwrap();
    }

    c.bench_function("checkpoint_value_at_100k", |b| {
        b.iter(|| series.value_at(black_box(499_995), 1_000_000).unwrap())
    });

    c.bench_function("checkpoint_current_100k", |b| {
        b.iter(|| black_box(series.current()))
    });
}

fn bench_append(c: &mut Criterion) {
    c.bench_function("checkpoint_append_10k", |b| {
        b.iter(|| {
            let mut series = CheckpointSeries::new();
            for i in 0..10_000u64 {
                series.append(i, i as u128).unwrap();
            }
            series.len()
        })
    });
}

criterion_group!(benches, bench_value_at, bench_append);
criterion_main!(benches);
