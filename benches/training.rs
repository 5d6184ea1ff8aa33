//! Training benchmarks: corpus generation and scaler fit.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use reliability_engine::{data, MetricRecord, StandardScaler};

fn bench_generate(c: &mut Criterion) {
    let mut g = c.benchmark_group("synthetic_corpus");
    for n in [1000usize, 4000, 8000] {
        g.bench_function(format!("generate_{}", n).as_str(), |b| {
            b.iter(|| data::generate(black_box(n), 42))
        });
    }
    g.finish();
}

fn bench_scaler_fit(c: &mut Criterion) {
    let records: Vec<MetricRecord> = data::generate(8000, 42)
        .into_iter()
        .map(|e| e.record)
        .collect();
    c.bench_function("scaler_fit_8000", |b| {
        b.iter(|| StandardScaler::fit(black_box(&records)).unwrap())
    });
}

criterion_group!(benches, bench_generate, bench_scaler_fit);
criterion_main!(benches);
