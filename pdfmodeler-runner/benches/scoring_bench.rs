//! Criterion benchmarks for batch scoring and aggregation.
//!
//! Run with: `cargo bench -p pdfmodeler-runner`
//!
//! These benchmarks measure:
//! - Single-model scoring on growing samples
//! - A full evaluate() over many candidates, parallel vs sequential

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use pdfmodeler_core::scoring::{create_suite, ScoringModel, ScoringModelKind, ScoringSettings};
use pdfmodeler_core::{EstimationResult, FittedDistribution, RvParameters, RvType};
use pdfmodeler_runner::{ModelerConfig, PdfModeler};

/// Deterministic, roughly normal data without a random source.
fn generate_sample(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| {
            let u = (i as f64 + 0.5) / n as f64;
            let x = (u * 12.9898).sin() * 43758.5453;
            (x - x.floor()) * 4.0 - 2.0 + (u - 0.5)
        })
        .collect()
}

fn generate_candidates(count: usize, data: &[f64]) -> Vec<Arc<EstimationResult>> {
    (0..count)
        .map(|i| {
            let params =
                RvParameters::new(RvType::Normal, vec![(i % 7) as f64 * 0.1, 1.0 + (i % 5) as f64 * 0.2])
                    .unwrap();
            Arc::new(EstimationResult::success(
                format!("E{i}"),
                params,
                data.to_vec(),
            ))
        })
        .collect()
}

/// Benchmark each scoring model on one distribution (core hot loop)
fn bench_single_model(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_model");
    let suite = create_suite(&ScoringModelKind::ALL, &ScoringSettings::default()).unwrap();
    let dist = RvParameters::new(RvType::Normal, vec![0.0, 1.2])
        .unwrap()
        .create_distribution()
        .unwrap();

    for size in [100, 1_000, 10_000] {
        let data = generate_sample(size);
        for model in &suite {
            group.bench_with_input(
                BenchmarkId::new(model.name().to_string(), size),
                &data,
                |b, data| {
                    b.iter(|| model.score(black_box(data), &dist as &dyn FittedDistribution));
                },
            );
        }
    }
    group.finish();
}

/// Benchmark a full evaluate() across candidate counts
fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");
    let data = generate_sample(1_000);

    for count in [10, 50, 200] {
        let candidates = generate_candidates(count, &data);
        for parallel in [true, false] {
            let modeler = PdfModeler::new(ModelerConfig::default())
                .unwrap()
                .with_parallelism(parallel);
            let label = if parallel { "parallel" } else { "sequential" };
            group.bench_with_input(BenchmarkId::new(label, count), &candidates, |b, cands| {
                b.iter(|| modeler.evaluate(black_box(cands.clone())).unwrap());
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_single_model, bench_evaluate);
criterion_main!(benches);
