//! User-editable parameters: channels, master mix.
//!
//! All setters clamp. Nothing here fails on out-of-range input.

use std::ops::RangeInclusive;

use crate::config::ChannelConfig;

/// Per-channel values the modulation loop reads every tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelMix {
    pub base_volume: f32,
    pub muted: bool,
    pub lfo_rate: f32,
    pub lfo_depth: f32,
}

/// One oscillator slot of the bank.
#[derive(Debug, Clone, PartialEq)]
pub struct Channel {
    index: usize,
    label: String,
    ratio: f64,
    mix: ChannelMix,
}

impl Channel {
    pub fn from_config(index: usize, config: &ChannelConfig, lfo_rates: &RangeInclusive<f32>) -> Self {
        let mut channel = Self {
            index,
            label: config.label.clone(),
            ratio: config.ratio,
            mix: ChannelMix {
                base_volume: 0.0,
                muted: config.muted,
                lfo_rate: *lfo_rates.start(),
                lfo_depth: 0.0,
            },
        };
        channel.set_base_volume(config.base_volume);
        channel.set_lfo_rate(config.lfo_rate, lfo_rates);
        channel.set_lfo_depth(config.lfo_depth);
        channel
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    pub fn is_root(&self) -> bool {
        self.ratio == 0.0
    }

    pub fn mix(&self) -> ChannelMix {
        self.mix
    }

    pub fn set_base_volume(&mut self, volume: f32) {
        self.mix.base_volume = clamp_unit(volume);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.mix.muted = muted;
    }

    pub fn set_lfo_rate(&mut self, rate: f32, bounds: &RangeInclusive<f32>) {
        self.mix.lfo_rate = if rate.is_nan() {
            *bounds.start()
        } else {
            rate.clamp(*bounds.start(), *bounds.end())
        };
    }

    pub fn set_lfo_depth(&mut self, depth: f32) {
        self.mix.lfo_depth = clamp_unit(depth);
    }
}

/// Master volume with two distinct writers.
///
/// The user may move it anywhere in [0, 1]. The clipping guard may only pull
/// it down. Both run on the tick thread, so no locking is involved; keeping
/// the entry points separate keeps the "guard never raises" rule checkable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MasterVolume {
    value: f32,
}

impl MasterVolume {
    pub fn new(value: f32) -> Self {
        Self {
            value: clamp_unit(value),
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    /// User input. May raise or lower.
    pub fn set_user_volume(&mut self, value: f32) {
        self.value = clamp_unit(value);
    }

    /// Guard input. Applied only when it lowers the volume; returns whether
    /// it was applied.
    pub fn apply_guard_correction(&mut self, candidate: f32) -> bool {
        let candidate = clamp_unit(candidate);
        if candidate < self.value {
            self.value = candidate;
            true
        } else {
            false
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MixState {
    pub master: MasterVolume,
    pub master_muted: bool,
}

impl MixState {
    pub fn new(master_volume: f32) -> Self {
        Self {
            master: MasterVolume::new(master_volume),
            master_muted: false,
        }
    }

    /// Level the master gain should carry right now.
    pub fn effective_master(&self) -> f32 {
        if self.master_muted {
            0.0
        } else {
            self.master.value()
        }
    }
}

pub(crate) fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
