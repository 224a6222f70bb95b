//! Benchmarks for rendering the oscillator bank.
//!
//! Simulates the audio callback: every channel's tone through its gain into
//! the master, with the analyser capturing the mix.

use std::hint::black_box;

use binaural_dsp::graph::{BinauralGraph, Node};
use criterion::{BenchmarkId, Criterion};

use crate::{BLOCK_SIZES, CHANNEL_COUNTS};

fn build(channels: usize) -> BinauralGraph {
    let mut graph = BinauralGraph::new(48_000.0);
    let master = graph.create_gain(0.5);
    let _ = graph.connect(Node::Gain(master), Node::Output);
    for i in 0..channels {
        let osc = graph.create_oscillator(200.0 + i as f32);
        let gain = graph.create_gain(0.2);
        let _ = graph.connect(Node::Oscillator(osc), Node::Gain(gain));
        let _ = graph.connect(Node::Gain(gain), Node::Gain(master));
    }
    graph.create_analyser(2048);
    graph.start();
    graph
}

pub fn bench_graph(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine/graph");

    for &channels in CHANNEL_COUNTS {
        for &size in BLOCK_SIZES {
            let mut graph = build(channels);
            let mut buffer = vec![0.0f32; size];
            group.bench_with_input(
                BenchmarkId::new(format!("{channels}ch"), size),
                &size,
                |b, _| {
                    b.iter(|| graph.render_block(black_box(&mut buffer)));
                },
            );
        }
    }

    group.finish();
}
