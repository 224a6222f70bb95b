use crate::dsp::{amplify::apply_gain_ramp, ramp::LinearRamp};

/// Controllable attenuator.
///
/// Holds a level in [0.0, 1.0] that is either set instantly (the per-tick LFO
/// writes) or ramped (restores after a phase reset).
pub struct GainNode {
    level: LinearRamp,
}

impl GainNode {
    pub fn new(initial: f32) -> Self {
        Self {
            level: LinearRamp::new(initial.clamp(0.0, 1.0)),
        }
    }

    pub fn set(&mut self, value: f32) {
        self.level.set(value.clamp(0.0, 1.0));
    }

    pub fn ramp_to(&mut self, value: f32, samples: u32) {
        self.level.ramp_to(value.clamp(0.0, 1.0), samples);
    }

    pub fn level(&self) -> f32 {
        self.level.current()
    }

    pub fn target(&self) -> f32 {
        self.level.target()
    }

    /// Attenuate `buffer` in place.
    pub fn process_block(&mut self, buffer: &mut [f32]) {
        apply_gain_ramp(buffer, &mut self.level);
    }
}
