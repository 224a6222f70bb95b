//! Reactive auto-leveling against clipping.

/*
Clipping Guard
==============

Once per tick the guard looks at the last analysed output frame. If any
sample is louder than the threshold it trims the master volume by a fixed
factor:

    master ← max(floor, master × decay)        (at most once per tick)

    tick   master (decay 0.95, floor 0.1)
    0      0.80
    1      0.76
    2      0.722
    ...
    41     0.10    ← never lower

The correction is geometric, so a loud mix settles over several ticks rather
than jumping. A few ticks of residual clipping are accepted for that.

The frame always reflects the gains of an earlier tick (analyser latency), so
the guard reacts one tick late. It never raises the volume; only the user
does.
*/

use crate::{
    config::EngineConfig,
    engine::params::MasterVolume,
    graph::AnalyserFrame,
};

pub const DEFAULT_CLIP_THRESHOLD: f32 = 0.95;
pub const DEFAULT_GUARD_DECAY: f32 = 0.95;
pub const DEFAULT_GUARD_FLOOR: f32 = 0.1;

/// Whether any sample in `frame` exceeds `threshold` in magnitude.
#[inline]
pub fn is_clipping(frame: &AnalyserFrame, threshold: f32) -> bool {
    frame.exceeds(threshold)
}

#[derive(Debug, Clone)]
pub struct ClippingGuard {
    threshold: f32,
    decay: f32,
    floor: f32,
    corrections: u64,
}

impl ClippingGuard {
    pub fn new(threshold: f32, decay: f32, floor: f32) -> Self {
        Self {
            threshold,
            decay: decay.clamp(0.0, 1.0),
            floor: floor.clamp(0.0, 1.0),
            corrections: 0,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.clip_threshold, config.guard_decay, config.guard_floor)
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn floor(&self) -> f32 {
        self.floor
    }

    /// Total corrections applied since creation.
    pub fn corrections(&self) -> u64 {
        self.corrections
    }

    /// Inspect one frame and trim `master` if it clips. Returns whether a
    /// correction was applied.
    pub fn check(&mut self, frame: &AnalyserFrame, master: &mut MasterVolume) -> bool {
        if master.value() <= self.floor || !is_clipping(frame, self.threshold) {
            return false;
        }
        let candidate = (master.value() * self.decay).max(self.floor);
        let applied = master.apply_guard_correction(candidate);
        if applied {
            self.corrections += 1;
            tracing::debug!(master = master.value(), "clipping detected, master trimmed");
        }
        applied
    }
}

impl Default for ClippingGuard {
    fn default() -> Self {
        Self::new(
            DEFAULT_CLIP_THRESHOLD,
            DEFAULT_GUARD_DECAY,
            DEFAULT_GUARD_FLOOR,
        )
    }
}
