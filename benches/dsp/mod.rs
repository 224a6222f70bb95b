//! Benchmarks for low-level DSP primitives.

mod amplify;
mod oscillator;

pub use amplify::bench_amplify;
pub use oscillator::bench_oscillator;
