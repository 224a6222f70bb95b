//! Benchmarks for the graph and the control loop.

mod graph;
mod scope;
mod tick;

pub use graph::bench_graph;
pub use scope::bench_scope;
pub use tick::bench_tick;

use binaural_dsp::{ChannelConfig, EngineConfig};

/// A config with `channels` voices on a 0, 1, 2, ... ratio ladder.
pub fn ladder(channels: usize) -> EngineConfig {
    EngineConfig {
        channels: (0..channels)
            .map(|i| ChannelConfig {
                lfo_depth: 0.5,
                lfo_rate: 0.2 * (i + 1) as f32,
                ..ChannelConfig::new(&format!("ch{i}"), i as f64)
            })
            .collect(),
        ..EngineConfig::default()
    }
}
