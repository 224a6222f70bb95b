//! Benchmarks for sine generation.

use std::hint::black_box;

use binaural_dsp::dsp::{LinearRamp, SineOscillator};
use criterion::{BenchmarkId, Criterion};

use crate::BLOCK_SIZES;

const SAMPLE_RATE: f32 = 48_000.0;

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Steady frequency: one sin() per sample
        let mut osc = SineOscillator::new();
        group.bench_with_input(BenchmarkId::new("steady", size), &size, |b, _| {
            b.iter(|| {
                osc.render(black_box(&mut buffer), black_box(200.0), SAMPLE_RATE);
            })
        });

        // Gliding frequency: ramp step per sample on top
        let mut osc = SineOscillator::new();
        let mut frequency = LinearRamp::new(200.0);
        group.bench_with_input(BenchmarkId::new("glide", size), &size, |b, _| {
            b.iter(|| {
                frequency.ramp_to(black_box(204.0), size as u32);
                for sample in buffer.iter_mut() {
                    *sample = osc.next_sample(frequency.next_value(), SAMPLE_RATE);
                }
                frequency.set(200.0);
            })
        });
    }

    group.finish();
}
