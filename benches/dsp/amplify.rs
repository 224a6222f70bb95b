//! Benchmarks for gain application and level metering.

use std::hint::black_box;

use binaural_dsp::dsp::{amplify, LinearRamp};
use criterion::{BenchmarkId, Criterion};

use crate::BLOCK_SIZES;

pub fn bench_amplify(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/amplify");

    for &size in BLOCK_SIZES {
        let signal: Vec<f32> = (0..size)
            .map(|i| (i as f32 / size as f32) * 2.0 - 1.0)
            .collect();

        let mut signal_copy = signal.clone();
        group.bench_with_input(BenchmarkId::new("apply_gain", size), &size, |b, _| {
            b.iter(|| {
                signal_copy.copy_from_slice(&signal);
                amplify::apply_gain(black_box(&mut signal_copy), black_box(0.5))
            })
        });

        let mut signal_copy = signal.clone();
        let mut gain = LinearRamp::new(1.0);
        group.bench_with_input(BenchmarkId::new("apply_gain_ramp", size), &size, |b, _| {
            b.iter(|| {
                signal_copy.copy_from_slice(&signal);
                gain.ramp_to(0.0, size as u32);
                amplify::apply_gain_ramp(black_box(&mut signal_copy), &mut gain);
                gain.set(1.0);
            })
        });

        group.bench_with_input(BenchmarkId::new("peak", size), &size, |b, _| {
            b.iter(|| amplify::peak(black_box(&signal)))
        });

        group.bench_with_input(BenchmarkId::new("rms", size), &size, |b, _| {
            b.iter(|| amplify::rms(black_box(&signal)))
        });
    }

    group.finish();
}
