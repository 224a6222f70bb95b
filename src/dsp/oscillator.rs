//! Phase-accumulating sine oscillator.

use std::f32::consts::TAU;

/*
Phase Accumulation
==================

A tone generator does not store "time". It stores where it currently is inside
one cycle of the waveform, as a normalized phase in [0.0, 1.0):

    phase += frequency / sample_rate     (once per sample)
    phase -= 1.0 if phase >= 1.0         (wrap)
    sample = sin(2π × phase)

Because only the increment depends on frequency, the frequency can change
between any two samples without a jump in the output. That property is what
makes click-free frequency ramps possible (see `dsp/ramp.rs`).


Phase Reset
-----------

Several oscillators started at different moments, or nudged through slightly
different frequency ramps, drift apart in phase. Setting every accumulator back
to the same reference value re-aligns them:

    degrees   normalized phase
      0°        0.0
     90°        0.25
    180°        0.5

A phase jump IS a discontinuity. Callers mute the output around the reset so
the jump is never heard.
*/

#[derive(Debug, Clone)]
pub struct SineOscillator {
    phase: f32,
}

impl SineOscillator {
    pub fn new() -> Self {
        Self { phase: 0.0 }
    }

    /// Current normalized phase in [0.0, 1.0).
    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Jump to a phase given in degrees. Values outside [0, 360) wrap.
    pub fn set_phase_degrees(&mut self, degrees: f32) {
        self.phase = (degrees / 360.0).rem_euclid(1.0);
    }

    /// Produce one sample at `frequency` and advance the accumulator.
    #[inline]
    pub fn next_sample(&mut self, frequency: f32, sample_rate: f32) -> f32 {
        let sample = (TAU * self.phase).sin();
        self.phase += frequency / sample_rate;
        if self.phase >= 1.0 {
            self.phase -= self.phase.floor();
        }
        sample
    }

    /// Fill `out` at a constant frequency.
    pub fn render(&mut self, out: &mut [f32], frequency: f32, sample_rate: f32) {
        for sample in out.iter_mut() {
            *sample = self.next_sample(frequency, sample_rate);
        }
    }
}

impl Default for SineOscillator {
    fn default() -> Self {
        Self::new()
    }
}
