use criterion::{criterion_group, criterion_main, Criterion};
use hud_core::metrics::{closing_expectation, entropy, kl_divergence, margin};
use hud_core::{tokenize, Distribution};
use std::hint::black_box;

fn top_k(k: usize, shift: f64) -> Distribution {
    Distribution::from_pairs((0..k).map(|i| (format!("tok{i}"), -0.3 * i as f64 - shift)))
}

fn bench_metrics_top20(c: &mut Criterion) {
    let baseline = top_k(20, 0.0);
    let perturbed = top_k(20, 0.7);

    c.bench_function("metrics_top20", |b| {
        b.iter(|| {
            black_box(entropy(black_box(&baseline)));
            black_box(margin(black_box(&baseline)));
            black_box(closing_expectation(black_box(&baseline)));
            black_box(kl_divergence(
                black_box(&baseline),
                black_box(&perturbed),
                1e-10,
            ));
        });
    });
}

fn bench_tokenize(c: &mut Criterion) {
    let code = "def calculate(x, y):\n    result = x + y\n    return result\n".repeat(50);

    c.bench_function("tokenize_150_lines", |b| {
        b.iter(|| tokenize(black_box(&code)).count());
    });
}

criterion_group!(benches, bench_metrics_top20, bench_tokenize);
criterion_main!(benches);
