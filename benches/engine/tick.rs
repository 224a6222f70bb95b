//! Benchmarks for one control-loop pass.
//!
//! Measures LFO evaluation, guard check, gain writes and scope sampling
//! against an in-process graph. Audio rendering is excluded.

use std::{hint::black_box, time::Duration};

use binaural_dsp::{engine::Engine, io::LocalPrimitives, Viewport};
use criterion::{BenchmarkId, Criterion};

use super::ladder;
use crate::CHANNEL_COUNTS;

pub fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine/tick");
    let viewport = Viewport::new(160.0, 40.0);

    for &channels in CHANNEL_COUNTS {
        let Ok(mut engine) = Engine::new(ladder(channels)) else {
            continue;
        };
        if engine
            .start(LocalPrimitives::new(48_000.0), Duration::ZERO)
            .is_err()
        {
            continue;
        }
        engine.set_playing(true);
        if let Some(session) = engine.session_mut() {
            let mut warmup = vec![0.0f32; 4096];
            session.primitives_mut().render(&mut warmup);
        }

        let mut now = Duration::ZERO;
        group.bench_with_input(BenchmarkId::new("playing", channels), &channels, |b, _| {
            b.iter(|| {
                now += Duration::from_micros(16_667);
                black_box(engine.tick(black_box(now), viewport))
            })
        });
    }

    group.finish();
}
