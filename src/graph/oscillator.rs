use crate::dsp::{oscillator::SineOscillator, ramp::LinearRamp};
use crate::graph::node::{GraphNode, RenderCtx};

/*
Tone Node
=========

One continuous sine per channel. Unlike a keyboard voice it never starts or
stops on notes; it runs for the whole session and only its frequency and
phase are steered from outside.

  frequency   Set with a ramp so tempo/root edits glide instead of clicking.
              The ramp is linear in Hz over a few tens of milliseconds.

  phase       Set instantly. Only done while the master output is muted.

Example usage:
  let mut tone = ToneNode::new(200.0);
  tone.set_frequency(203.0, ctx.ramp_samples(Duration::from_millis(30)));
  tone.set_phase_degrees(0.0);
*/

pub struct ToneNode {
    osc: SineOscillator,
    frequency: LinearRamp,
}

impl ToneNode {
    pub fn new(frequency: f32) -> Self {
        Self {
            osc: SineOscillator::new(),
            frequency: LinearRamp::new(frequency.max(0.0)),
        }
    }

    /// Glide to `frequency` over `ramp_samples` samples (0 = jump).
    pub fn set_frequency(&mut self, frequency: f32, ramp_samples: u32) {
        self.frequency.ramp_to(frequency.max(0.0), ramp_samples);
    }

    pub fn set_phase_degrees(&mut self, degrees: f32) {
        self.osc.set_phase_degrees(degrees);
    }

    /// Frequency currently being rendered (mid-ramp values included).
    pub fn frequency(&self) -> f32 {
        self.frequency.current()
    }

    /// Frequency the node is heading to.
    pub fn target_frequency(&self) -> f32 {
        self.frequency.target()
    }

    pub fn phase(&self) -> f32 {
        self.osc.phase()
    }
}

impl GraphNode for ToneNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        if !self.frequency.is_ramping() {
            self.osc
                .render(out, self.frequency.current(), ctx.sample_rate);
            return;
        }
        for sample in out.iter_mut() {
            let frequency = self.frequency.next_value();
            *sample = self.osc.next_sample(frequency, ctx.sample_rate);
        }
    }
}
