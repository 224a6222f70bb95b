//! Per-tick LFO gain modulation.

use crate::{dsp::lfo, engine::params::ChannelMix};

/// Gains computed for one channel in one tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ChannelGain {
    /// Base volume after LFO modulation, ignoring mute/transport.
    pub modulated: f32,
    /// What the gain stage receives: `modulated`, or 0 when muted or stopped.
    pub effective: f32,
}

/// Modulated gain for one channel at `elapsed` seconds past the clock origin.
pub fn channel_gain(mix: &ChannelMix, elapsed: f64, playing: bool) -> ChannelGain {
    let modulated = if mix.lfo_depth == 0.0 {
        mix.base_volume
    } else {
        let value = lfo::lfo_value(mix.lfo_rate, elapsed);
        lfo::modulated_volume(mix.base_volume, mix.lfo_depth, value)
    };
    let effective = if playing && !mix.muted { modulated } else { 0.0 };
    ChannelGain {
        modulated,
        effective,
    }
}

/// Evaluates every channel's LFO from the shared clock.
///
/// Runs every tick whether or not the transport is playing, so unmuting
/// resumes in phase with where the LFO would have been.
#[derive(Debug, Default)]
pub struct ModulationEngine;

impl ModulationEngine {
    pub fn new() -> Self {
        Self
    }

    /// Compute gains for `channels` into `out` (resized to match).
    pub fn compute(
        &self,
        channels: &[ChannelMix],
        elapsed: f64,
        playing: bool,
        out: &mut Vec<ChannelGain>,
    ) {
        out.clear();
        out.extend(
            channels
                .iter()
                .map(|mix| channel_gain(mix, elapsed, playing)),
        );
    }
}
