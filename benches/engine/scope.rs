//! Benchmarks for oscilloscope point generation.

use std::hint::black_box;

use binaural_dsp::{
    engine::{OscilloscopeSampler, Viewport},
    graph::AnalyserFrame,
};
use criterion::{BenchmarkId, Criterion};

const TIME_SCALES: &[f32] = &[0.5, 1.0, 4.0];

pub fn bench_scope(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine/scope");
    let sampler = OscilloscopeSampler::default();
    let viewport = Viewport::new(160.0, 40.0);
    let frame = AnalyserFrame::new(
        (0..2048)
            .map(|i| (i as f32 * 0.05).sin() * 0.8)
            .collect(),
    );

    for &scale in TIME_SCALES {
        group.bench_with_input(BenchmarkId::new("playing", scale), &scale, |b, &scale| {
            b.iter(|| sampler.sample(black_box(&frame), scale, viewport, true))
        });
    }

    group.bench_function("idle", |b| {
        b.iter(|| sampler.sample(black_box(&frame), 1.0, viewport, false))
    });

    group.finish();
}
